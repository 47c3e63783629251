use std::path::PathBuf;
use thiserror::Error;

use crate::types::MatchFormat;

/// Errors of the schema and load steps.
///
/// Each variant is terminal for one unit of work only: a connection attempt,
/// the table creation step, or the load of one format.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Invalid database path: {}", .0.display())]
    InvalidDatabasePath(PathBuf),

    #[error("Error connecting to database {}: {source}", .path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: diesel::ConnectionError,
    },

    #[error("No database connection.")]
    NotConnected,

    #[error("Error creating table {table}: {source}")]
    Schema {
        table: &'static str,
        #[source]
        source: diesel::result::Error,
    },

    #[error("File not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Error reading CSV {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("missing expected columns: {}", .columns.join(", "))]
    MissingColumns {
        format: MatchFormat,
        columns: Vec<String>,
    },

    #[error("unexpected columns: {}", .columns.join(", "))]
    UnexpectedColumns {
        format: MatchFormat,
        columns: Vec<String>,
    },

    #[error("{rows} rows exceed the row limit of {limit}")]
    RowLimitExceeded {
        format: MatchFormat,
        rows: usize,
        limit: usize,
    },

    #[error("Error inserting rows into {table}: {source}")]
    Insert {
        table: &'static str,
        #[source]
        source: diesel::result::Error,
    },

    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

/// Errors of running catalog queries.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Unknown query: {0}")]
    UnknownQuery(String),

    #[error("Error opening database {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Query {name} failed: {source}")]
    Execution {
        name: String,
        #[source]
        source: rusqlite::Error,
    },
}
