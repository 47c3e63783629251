use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use dotenvy::dotenv;
use serde::{Serialize, Deserialize};

use crate::logger::warn;
use crate::types::{ExtraColumnPolicy, MatchFormat, RowLimitPolicy};

pub const DEFAULT_DB_PATH: &str = "cricket_data.sqlite";
pub const DEFAULT_DATASETS_DIR: &str = "datasets";
pub const DEFAULT_ROW_LIMIT: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderSettings {
    pub db_path: PathBuf,
    pub datasets_dir: PathBuf,
    pub row_limit: usize,
    pub extra_columns: ExtraColumnPolicy,
    pub row_limit_policy: RowLimitPolicy,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        LoaderSettings {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            datasets_dir: PathBuf::from(DEFAULT_DATASETS_DIR),
            row_limit: DEFAULT_ROW_LIMIT,
            extra_columns: ExtraColumnPolicy::default(),
            row_limit_policy: RowLimitPolicy::default(),
        }
    }
}

impl LoaderSettings {
    /// Settings from the process environment, after loading a `.env` file if there is one.
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Settings from a variable lookup. Empty values count as unset, invalid
    /// values are reported and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());
        let mut settings = LoaderSettings::default();

        if let Some(s) = get("CRICKET_DB_PATH") {
            settings.db_path = PathBuf::from(s);
        }
        if let Some(s) = get("CRICKET_DATASETS_DIR") {
            settings.datasets_dir = PathBuf::from(s);
        }
        if let Some(v) = get("ROW_LIMIT").and_then(|s| parse_or_warn("ROW_LIMIT", &s)) {
            settings.row_limit = v;
        }
        if let Some(v) = get("EXTRA_COLUMNS_POLICY").and_then(|s| parse_or_warn("EXTRA_COLUMNS_POLICY", &s)) {
            settings.extra_columns = v;
        }
        if let Some(v) = get("ROW_LIMIT_POLICY").and_then(|s| parse_or_warn("ROW_LIMIT_POLICY", &s)) {
            settings.row_limit_policy = v;
        }

        settings
    }

    /// Path of the source CSV of a format.
    pub fn csv_path_for(&self, format: MatchFormat) -> PathBuf {
        self.datasets_dir.join(format.csv_file_name())
    }
}

fn parse_or_warn<T: FromStr>(key: &str, value: &str) -> Option<T> {
    match value.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn(&format!("Ignoring invalid {}={}, using the default", key, value));
            None
        }
    }
}
