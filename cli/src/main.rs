use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dotenvy::dotenv;

use cricket_backend::{
    run_load, CellValue, CricketDbManager, ExtraColumnPolicy, LoadSummary, LoaderSettings,
    MatchFormat, QueryCatalog, QueryResult, QueryRunner, RowLimitPolicy,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Load cricket match CSVs into SQLite and run the query catalog", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the SQLite database file.
    /// If not provided, CRICKET_DB_PATH is used, then cricket_data.sqlite.
    #[arg(long, global = true, value_name = "FILE_PATH")]
    db_path: Option<PathBuf>,

    /// Defaults to `load` with settings from the environment.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the tables and load the test, odi and t20 CSV files
    Load {
        /// Directory containing tests_matches.csv, odis_matches.csv and t20s_matches.csv
        #[arg(long, value_name = "DIRECTORY_PATH")]
        datasets_dir: Option<PathBuf>,

        /// Maximum number of leading rows loaded per file
        #[arg(long)]
        row_limit: Option<usize>,

        /// ignore, warn or reject CSV columns not declared for the format
        #[arg(long, value_name = "POLICY")]
        extra_columns: Option<ExtraColumnPolicy>,

        /// truncate, warn or reject files with more rows than the row limit
        #[arg(long, value_name = "POLICY")]
        row_limit_policy: Option<RowLimitPolicy>,
    },

    /// Create the match tables if they don't exist
    CreateTables,

    /// List the catalog queries
    ListQueries {
        /// Only list queries of one format (test, odi, t20)
        #[arg(long)]
        format: Option<MatchFormat>,
    },

    /// Run one catalog query
    #[command(arg_required_else_help = true)]
    Query {
        /// Name of the catalog query
        name: String,

        /// Print the result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Run every catalog query
    Report {
        /// Only run queries of one format (test, odi, t20)
        #[arg(long)]
        format: Option<MatchFormat>,

        /// Print the results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn print_summary(summary: &LoadSummary, settings: &LoaderSettings) {
    for outcome in &summary.outcomes {
        match &outcome.result {
            Ok(report) => {
                let mut line = format!(
                    "{:<4} {:>5} rows inserted into {}",
                    outcome.format.as_str(),
                    report.rows_inserted,
                    report.table
                );
                if report.truncated {
                    line.push_str(&format!(" (first {} of {})", report.rows_inserted, report.rows_in_source));
                }
                println!("{} {}", "ok".green(), line);
            }
            Err(e) => {
                println!("{} {:<4} {}", "failed".red(), outcome.format.as_str(), e);
            }
        }
    }

    if !summary.connected {
        return;
    }

    // Table totals include rows from earlier runs
    let mut dbm = CricketDbManager::new(settings.db_path.clone());
    if dbm.connect().is_ok() {
        for format in MatchFormat::ALL {
            if let Ok(count) = dbm.row_count(format) {
                println!("{:<14} {} rows", format.table_name(), count);
            }
        }
    }
}

fn print_result(result: &QueryResult) {
    println!("{}", result.name.bold());

    let cells: Vec<Vec<String>> = result.rows
        .iter()
        .map(|row| row.iter().map(CellValue::to_string).collect())
        .collect();

    let widths: Vec<usize> = result.columns
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            cells.iter()
                .map(|row| row[idx].chars().count())
                .chain(std::iter::once(col.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = result.columns
        .iter()
        .zip(&widths)
        .map(|(col, w)| format!("{:<w$}", col, w = *w))
        .collect();
    println!("{}", header.join("  ").bold());

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
            .collect();
        println!("{}", line.join("  "));
    }
    println!("({} rows)\n", cells.len());
}

fn print_results(results: &[QueryResult], json: bool) -> Result<()> {
    if json {
        let s = serde_json::to_string_pretty(results).context("Failed to serialize query results")?;
        println!("{}", s);
    } else {
        results.iter().for_each(print_result);
    }
    Ok(())
}

/// Failed formats are reported in the summary, only a missing connection is an error.
fn load(settings: &LoaderSettings) -> Result<()> {
    let summary = run_load(settings);
    print_summary(&summary, settings);
    if summary.connected {
        Ok(())
    } else {
        Err(anyhow::anyhow!("No database connection."))
    }
}

fn list_queries(catalog: &QueryCatalog, format: Option<MatchFormat>) {
    for q in catalog.iter().filter(|q| format.is_none_or(|f| q.format == f)) {
        println!("{:<28} {:<4} {}", q.name, q.format.as_str(), q.description);
    }
}

fn main() {
    // Attempt to load .env file. This might define CRICKET_DB_PATH and the other
    // loader settings if they're not already in the environment.
    if dotenv().is_err() {
        eprintln!("Info: No .env file found or failed to load.");
    }

    let cli = Cli::parse();

    // Precedence:
    // - given with --db-path and the other flags
    // - set with env vars
    // - defaults
    let mut settings = LoaderSettings::from_env();
    if let Some(db_path) = cli.db_path {
        settings.db_path = db_path;
    }

    // The catalog is built once here and passed down by reference
    let catalog = QueryCatalog::new();

    let command_result: Result<()> = match cli.command {
        None => load(&settings),

        Some(Commands::Load { datasets_dir, row_limit, extra_columns, row_limit_policy }) => {
            if let Some(dir) = datasets_dir {
                settings.datasets_dir = dir;
            }
            if let Some(n) = row_limit {
                settings.row_limit = n;
            }
            if let Some(p) = extra_columns {
                settings.extra_columns = p;
            }
            if let Some(p) = row_limit_policy {
                settings.row_limit_policy = p;
            }

            load(&settings)
        }

        Some(Commands::CreateTables) => {
            let mut dbm = CricketDbManager::new(settings.db_path.clone());
            let res = dbm.connect().and_then(|_| dbm.create_tables());
            res.map_err(anyhow::Error::from)
        }

        Some(Commands::ListQueries { format }) => {
            list_queries(&catalog, format);
            Ok(())
        }

        Some(Commands::Query { name, json }) => {
            QueryRunner::open(&settings.db_path, &catalog)
                .and_then(|runner| runner.run(&name))
                .map_err(anyhow::Error::from)
                .and_then(|result| print_results(&[result], json))
        }

        Some(Commands::Report { format, json }) => {
            match QueryRunner::open(&settings.db_path, &catalog) {
                Ok(runner) => {
                    let mut results = Vec::new();
                    for res in runner.run_all(format) {
                        match res {
                            Ok(r) => results.push(r),
                            Err(e) => eprintln!("{} {}", "Error:".red(), e),
                        }
                    }
                    print_results(&results, json)
                }
                Err(e) => Err(e.into()),
            }
        }
    };

    if let Err(e) = command_result {
        eprintln!("Error executing command: {}", e);
        exit(1);
    }
}
