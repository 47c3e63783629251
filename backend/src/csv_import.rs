//! Reading match CSV files into rows ready for insertion.
//!
//! The whole file is read into memory, projected onto the declared columns of
//! the format by exact header name, cut to the row limit and converted to
//! typed cells.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::db::match_schema::{columns_for, MatchColumn};
use crate::error::LoaderError;
use crate::logger::{debug, warn};
use crate::types::{CellValue, ExtraColumnPolicy, MatchFormat, RowLimitPolicy};

/// Projected, row-limited content of one CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRows {
    pub format: MatchFormat,
    pub rows: Vec<Vec<CellValue>>,
    /// Data rows in the source, before the row limit.
    pub rows_in_source: usize,
    /// Source headers that are not declared for the format.
    pub dropped_columns: Vec<String>,
}

impl MatchRows {
    pub fn truncated(&self) -> bool {
        self.rows.len() < self.rows_in_source
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectionOptions {
    pub row_limit: usize,
    pub extra_columns: ExtraColumnPolicy,
    pub row_limit_policy: RowLimitPolicy,
}

pub fn read_match_csv(
    csv_path: &Path,
    format: MatchFormat,
    options: &ProjectionOptions,
) -> Result<MatchRows, LoaderError> {
    if !csv_path.is_file() {
        return Err(LoaderError::SourceNotFound(csv_path.to_path_buf()));
    }

    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(csv_path)
        .map_err(|e| LoaderError::Csv { path: csv_path.to_path_buf(), source: e })?;

    project_records(reader, format, options)
        .map_err(|e| match e {
            ProjectError::Csv(source) => LoaderError::Csv { path: csv_path.to_path_buf(), source },
            ProjectError::Loader(e) => e,
        })
}

#[derive(Debug)]
enum ProjectError {
    Csv(csv::Error),
    Loader(LoaderError),
}

impl From<csv::Error> for ProjectError {
    fn from(e: csv::Error) -> Self {
        ProjectError::Csv(e)
    }
}

impl From<LoaderError> for ProjectError {
    fn from(e: LoaderError) -> Self {
        ProjectError::Loader(e)
    }
}

fn project_records<R: Read>(
    mut reader: csv::Reader<R>,
    format: MatchFormat,
    options: &ProjectionOptions,
) -> Result<MatchRows, ProjectError> {
    let headers = reader.headers()?.clone();
    let declared = columns_for(format);

    // First occurrence wins when a header name repeats
    let mut header_index: HashMap<&str, usize> = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        header_index.entry(name).or_insert(idx);
    }

    let missing: Vec<String> = declared
        .iter()
        .filter(|c| !header_index.contains_key(c.name))
        .map(|c| c.name.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(LoaderError::MissingColumns { format, columns: missing }.into());
    }

    let dropped_columns: Vec<String> = headers
        .iter()
        .filter(|h| !declared.iter().any(|c| c.name == *h))
        .map(|h| h.to_string())
        .collect();

    if !dropped_columns.is_empty() {
        match options.extra_columns {
            ExtraColumnPolicy::Ignore => {}
            ExtraColumnPolicy::Warn => {
                warn(&format!("{}: dropping {} undeclared columns: {}",
                              format.table_name(), dropped_columns.len(), dropped_columns.join(", ")));
            }
            ExtraColumnPolicy::Reject => {
                return Err(LoaderError::UnexpectedColumns { format, columns: dropped_columns }.into());
            }
        }
    }

    let projection: Vec<(usize, &MatchColumn)> = declared
        .iter()
        .map(|c| (header_index[c.name], *c))
        .collect();

    let records = reader
        .records()
        .collect::<Result<Vec<csv::StringRecord>, csv::Error>>()?;
    let rows_in_source = records.len();

    if rows_in_source > options.row_limit {
        match options.row_limit_policy {
            RowLimitPolicy::Truncate => {}
            RowLimitPolicy::Warn => {
                warn(&format!("{}: keeping the first {} of {} rows",
                              format.table_name(), options.row_limit, rows_in_source));
            }
            RowLimitPolicy::Reject => {
                return Err(LoaderError::RowLimitExceeded {
                    format,
                    rows: rows_in_source,
                    limit: options.row_limit,
                }.into());
            }
        }
    }

    let rows: Vec<Vec<CellValue>> = records
        .iter()
        .take(options.row_limit)
        .map(|record| {
            projection
                .iter()
                .map(|(idx, column)| CellValue::from_csv(record.get(*idx).unwrap_or(""), column.column_type))
                .collect()
        })
        .collect();

    debug(&format!("{}: projected {} rows onto {} columns", format.table_name(), rows.len(), projection.len()));

    Ok(MatchRows {
        format,
        rows,
        rows_in_source,
        dropped_columns,
    })
}
