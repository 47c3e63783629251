#![allow(dead_code)]

use std::path::{Path, PathBuf};

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Nullable, Text};

use cricket_backend::db::match_schema::column_names_for;
use cricket_backend::{CricketDbManager, LoaderSettings, MatchFormat};

/// A cell value for a generated fixture row.
pub fn sample_value(column: &str, i: usize) -> String {
    match column {
        "innings" => format!("innings-{}", i),
        "balls_per_over" => "6".to_string(),
        "city" => format!("City {}", i % 12),
        "gender" => if i % 3 == 0 { "female".to_string() } else { "male".to_string() },
        "match_type_number" => (1000 + i).to_string(),
        "outcome_by_runs" => if i % 4 == 0 { String::new() } else { ((i * 37) % 300 + 1).to_string() },
        "outcome_by_wickets" => if i % 5 == 0 { String::new() } else { ((i % 10) + 1).to_string() },
        "outcome_winner" => format!("Team {}", i % 8),
        "overs" => if i % 7 == 0 { "20".to_string() } else { "50".to_string() },
        "player_of_match" => format!("['Player {}']", i % 15),
        "season" => format!("{}", 2000 + i % 20),
        _ => format!("{}-{}", column, i),
    }
}

/// Write a match CSV with the declared columns of `format`, minus `omit`,
/// plus `extra` columns, and `rows` data rows.
pub fn write_match_csv(
    path: &Path,
    format: MatchFormat,
    rows: usize,
    extra: &[&str],
    omit: &[&str],
) -> PathBuf {
    let mut header: Vec<String> = column_names_for(format)
        .into_iter()
        .filter(|c| !omit.contains(c))
        .map(String::from)
        .collect();
    header.extend(extra.iter().map(|s| s.to_string()));

    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV");
    writer.write_record(&header).expect("Failed to write header");
    for i in 0..rows {
        let record: Vec<String> = header.iter().map(|c| sample_value(c, i)).collect();
        writer.write_record(&record).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");

    path.to_path_buf()
}

/// Write the CSV of every format into `datasets_dir` under its default file name.
pub fn write_datasets(datasets_dir: &Path, rows: usize) {
    for format in MatchFormat::ALL {
        write_match_csv(&datasets_dir.join(format.csv_file_name()), format, rows, &[], &[]);
    }
}

pub fn settings_for(dir: &Path) -> LoaderSettings {
    LoaderSettings {
        db_path: dir.join("cricket_data.sqlite"),
        datasets_dir: dir.to_path_buf(),
        ..LoaderSettings::default()
    }
}

pub fn connected_manager(db_path: &Path) -> CricketDbManager {
    let mut dbm = CricketDbManager::new(db_path);
    dbm.connect().expect("Failed to connect");
    dbm.create_tables().expect("Failed to create tables");
    dbm
}

#[derive(QueryableByName, Debug)]
pub struct MatchRow {
    #[diesel(sql_type = BigInt)]
    pub match_id: i64,
    #[diesel(sql_type = Nullable<Text>)]
    pub innings: Option<String>,
}

/// match_id and innings of a table, in insertion order.
pub fn read_innings(db_path: &Path, format: MatchFormat) -> Vec<MatchRow> {
    let mut conn = SqliteConnection::establish(db_path.to_str().expect("db path"))
        .expect("Failed to connect");
    sql_query(format!("SELECT match_id, innings FROM {} ORDER BY match_id", format.table_name()))
        .load::<MatchRow>(&mut conn)
        .expect("Query failed")
}

#[derive(QueryableByName, Debug)]
struct NameRow {
    #[diesel(sql_type = Text)]
    name: String,
}

pub fn table_names(db_path: &Path) -> Vec<String> {
    let mut conn = SqliteConnection::establish(db_path.to_str().expect("db path"))
        .expect("Failed to connect");
    sql_query("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name;")
        .load::<NameRow>(&mut conn)
        .expect("Query failed")
        .into_iter()
        .map(|r| r.name)
        .collect()
}
