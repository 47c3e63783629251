use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;

use crate::error::QueryError;
use crate::logger::debug;
use crate::queries::{CatalogQuery, QueryCatalog};
use crate::types::{CellValue, MatchFormat};

/// Rows of one catalog query, columns named as in its SELECT clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl QueryResult {
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

impl From<ValueRef<'_>> for CellValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => CellValue::Null,
            ValueRef::Integer(v) => CellValue::Integer(v),
            ValueRef::Real(v) => CellValue::Real(v),
            ValueRef::Text(b) | ValueRef::Blob(b) => CellValue::Text(String::from_utf8_lossy(b).into_owned()),
        }
    }
}

/// Runs catalog queries by name over a read-only connection.
pub struct QueryRunner<'a> {
    conn: Connection,
    catalog: &'a QueryCatalog,
}

impl<'a> QueryRunner<'a> {
    pub fn open(db_path: &Path, catalog: &'a QueryCatalog) -> Result<Self, QueryError> {
        let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| QueryError::Open { path: db_path.to_path_buf(), source: e })?;

        Ok(QueryRunner { conn, catalog })
    }

    pub fn catalog(&self) -> &QueryCatalog {
        self.catalog
    }

    pub fn run(&self, name: &str) -> Result<QueryResult, QueryError> {
        let query = self.catalog
            .get(name)
            .ok_or_else(|| QueryError::UnknownQuery(name.to_string()))?;

        self.execute(query)
            .map_err(|e| QueryError::Execution { name: name.to_string(), source: e })
    }

    /// Run every catalog query, optionally only those of one format.
    pub fn run_all(&self, format: Option<MatchFormat>) -> Vec<Result<QueryResult, QueryError>> {
        self.catalog
            .iter()
            .filter(|q| format.is_none_or(|f| q.format == f))
            .map(|q| self.run(q.name))
            .collect()
    }

    fn execute(&self, query: &CatalogQuery) -> rusqlite::Result<QueryResult> {
        debug(&format!("Running query {}", query.name));

        let mut stmt = self.conn.prepare(query.sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let column_count = columns.len();

        let rows = stmt
            .query_map([], |row| {
                (0..column_count)
                    .map(|idx| row.get_ref(idx).map(CellValue::from))
                    .collect::<rusqlite::Result<Vec<CellValue>>>()
            })?
            .collect::<rusqlite::Result<Vec<Vec<CellValue>>>>()?;

        Ok(QueryResult {
            name: query.name.to_string(),
            columns,
            rows,
        })
    }
}
