pub mod match_schema;

use std::path::{Path, PathBuf};

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Double, Nullable, Text};
use diesel::sqlite::Sqlite;

use crate::csv_import::{read_match_csv, MatchRows, ProjectionOptions};
use crate::error::LoaderError;
use crate::logger::info;
use crate::types::{CellValue, ExtraColumnPolicy, MatchFormat, RowLimitPolicy};

use match_schema::{create_table_sql, insert_row_sql};

#[derive(QueryableByName)]
struct CountResult {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// Outcome of one successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub format: MatchFormat,
    pub table: &'static str,
    pub rows_in_source: usize,
    pub rows_inserted: usize,
    pub truncated: bool,
    pub dropped_columns: Vec<String>,
}

/// Owns the SQLite connection of a load run.
///
/// The manager starts disconnected. When `connect()` fails it stays
/// disconnected, and the other operations return `LoaderError::NotConnected`
/// without touching anything.
pub struct CricketDbManager {
    db_path: PathBuf,
    conn: Option<SqliteConnection>,
    pub extra_columns: ExtraColumnPolicy,
    pub row_limit_policy: RowLimitPolicy,
}

impl CricketDbManager {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        CricketDbManager {
            db_path: db_path.into(),
            conn: None,
            extra_columns: ExtraColumnPolicy::default(),
            row_limit_policy: RowLimitPolicy::default(),
        }
    }

    pub fn with_policies(mut self, extra_columns: ExtraColumnPolicy, row_limit_policy: RowLimitPolicy) -> Self {
        self.extra_columns = extra_columns;
        self.row_limit_policy = row_limit_policy;
        self
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Open the database file, creating it when it doesn't exist yet.
    pub fn connect(&mut self) -> Result<(), LoaderError> {
        let db_url = self.db_path.to_str()
            .ok_or_else(|| LoaderError::InvalidDatabasePath(self.db_path.clone()))?;

        let conn = SqliteConnection::establish(db_url)
            .map_err(|e| LoaderError::Connection { path: self.db_path.clone(), source: e })?;

        self.conn = Some(conn);
        info(&format!("Connected to SQLite database {}", self.db_path.display()));
        Ok(())
    }

    /// Drop the connection. Safe to call when never connected.
    pub fn close(&mut self) {
        if self.conn.take().is_some() {
            info("Database connection closed.");
        }
    }

    fn conn(&mut self) -> Result<&mut SqliteConnection, LoaderError> {
        self.conn.as_mut().ok_or(LoaderError::NotConnected)
    }

    /// Create the three match tables if they don't exist.
    ///
    /// Tables are created one statement at a time. When one fails, the ones
    /// before it stay created.
    pub fn create_tables(&mut self) -> Result<(), LoaderError> {
        let conn = self.conn()?;

        for format in MatchFormat::ALL {
            sql_query(create_table_sql(format))
                .execute(conn)
                .map_err(|e| LoaderError::Schema { table: format.table_name(), source: e })?;
        }

        info("Tables created successfully.");
        Ok(())
    }

    /// Read a CSV file and append its first `row_limit` rows to the table of
    /// the format, in one transaction.
    pub fn load(&mut self, format: MatchFormat, csv_path: &Path, row_limit: usize) -> Result<LoadReport, LoaderError> {
        if self.conn.is_none() {
            return Err(LoaderError::NotConnected);
        }

        let options = ProjectionOptions {
            row_limit,
            extra_columns: self.extra_columns,
            row_limit_policy: self.row_limit_policy,
        };
        let match_rows = read_match_csv(csv_path, format, &options)?;

        let rows_in_source = match_rows.rows_in_source;
        let truncated = match_rows.truncated();
        let MatchRows { rows, dropped_columns, .. } = match_rows;

        let rows_inserted = insert_rows(self.conn()?, format, rows)?;

        info(&format!("Inserted {} rows into {} table.", rows_inserted, format.table_name()));

        Ok(LoadReport {
            format,
            table: format.table_name(),
            rows_in_source,
            rows_inserted,
            truncated,
            dropped_columns,
        })
    }

    pub fn row_count(&mut self, format: MatchFormat) -> Result<i64, LoaderError> {
        let conn = self.conn()?;
        let res: CountResult = sql_query(format!("SELECT COUNT(*) AS count FROM {}", format.table_name()))
            .get_result(conn)?;
        Ok(res.count)
    }
}

impl Drop for CricketDbManager {
    fn drop(&mut self) {
        self.close();
    }
}

fn insert_rows(
    conn: &mut SqliteConnection,
    format: MatchFormat,
    rows: Vec<Vec<CellValue>>,
) -> Result<usize, LoaderError> {
    let insert_sql = insert_row_sql(format);
    let table = format.table_name();

    conn.transaction::<_, LoaderError, _>(|conn| {
        let mut inserted = 0;

        for row in rows {
            let mut query = sql_query(insert_sql.as_str()).into_boxed::<Sqlite>();
            for cell in row {
                query = match cell {
                    CellValue::Null => query.bind::<Nullable<Text>, _>(None::<String>),
                    CellValue::Integer(v) => query.bind::<BigInt, _>(v),
                    CellValue::Real(v) => query.bind::<Double, _>(v),
                    CellValue::Text(s) => query.bind::<Text, _>(s),
                };
            }

            inserted += query
                .execute(conn)
                .map_err(|e| LoaderError::Insert { table, source: e })?;
        }

        Ok(inserted)
    })
}
