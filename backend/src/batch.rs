//! The full load run: connect, create tables, load every format, close.

use std::time::Instant;

use crate::app_settings::LoaderSettings;
use crate::db::{CricketDbManager, LoadReport};
use crate::error::LoaderError;
use crate::logger::{error, info, format_duration};
use crate::types::MatchFormat;

#[derive(Debug)]
pub struct FormatOutcome {
    pub format: MatchFormat,
    pub result: Result<LoadReport, LoaderError>,
}

#[derive(Debug)]
pub struct LoadSummary {
    pub connected: bool,
    pub tables_created: bool,
    pub outcomes: Vec<FormatOutcome>,
}

impl LoadSummary {
    pub fn outcome(&self, format: MatchFormat) -> Option<&FormatOutcome> {
        self.outcomes.iter().find(|o| o.format == format)
    }

    pub fn rows_inserted(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|r| r.rows_inserted)
            .sum()
    }

    pub fn failed_formats(&self) -> Vec<MatchFormat> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_err())
            .map(|o| o.format)
            .collect()
    }
}

/// Load all three formats from the datasets directory.
///
/// Errors are logged and recorded per step; a failing format never stops the
/// others.
pub fn run_load(settings: &LoaderSettings) -> LoadSummary {
    info("=== run_load() ===");
    let start_time = Instant::now();

    let mut dbm = CricketDbManager::new(settings.db_path.clone())
        .with_policies(settings.extra_columns, settings.row_limit_policy);

    let connected = match dbm.connect() {
        Ok(()) => true,
        Err(e) => {
            error(&e.to_string());
            false
        }
    };

    let tables_created = match dbm.create_tables() {
        Ok(()) => true,
        Err(e) => {
            error(&e.to_string());
            false
        }
    };

    let mut outcomes = Vec::new();
    for format in MatchFormat::ALL {
        let csv_path = settings.csv_path_for(format);
        let result = dbm.load(format, &csv_path, settings.row_limit);
        if let Err(e) = &result {
            error(&format!("Error inserting data for {}: {}", format, e));
        }
        outcomes.push(FormatOutcome { format, result });
    }

    dbm.close();

    info(&format!("Load finished in {}", format_duration(start_time.elapsed())));

    LoadSummary {
        connected,
        tables_created,
        outcomes,
    }
}
