pub mod types;
pub mod error;
pub mod logger;
pub mod app_settings;
pub mod csv_import;
pub mod db;
pub mod batch;
pub mod queries;
pub mod query_runner;

pub use app_settings::LoaderSettings;
pub use batch::{run_load, FormatOutcome, LoadSummary};
pub use db::{CricketDbManager, LoadReport};
pub use error::{LoaderError, QueryError};
pub use queries::{CatalogQuery, QueryCatalog};
pub use query_runner::{QueryResult, QueryRunner};
pub use types::{CellValue, ExtraColumnPolicy, MatchFormat, RowLimitPolicy};
