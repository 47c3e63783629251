//! Column declarations of the match tables.
//!
//! One canonical column list covers all three formats. Each column names the
//! formats it applies to; the per-format column lists, the `CREATE TABLE`
//! statements and the insert statements are all derived from it.

use crate::types::{ColumnType, MatchFormat};
use crate::types::MatchFormat::{Odi, T20, Test};

/// Surrogate key of every match table, assigned by SQLite on insert.
pub const PRIMARY_KEY_COLUMN: &str = "match_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchColumn {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub formats: &'static [MatchFormat],
}

const ALL_FORMATS: &[MatchFormat] = &[Test, Odi, T20];

const fn column(name: &'static str, column_type: ColumnType, formats: &'static [MatchFormat]) -> MatchColumn {
    MatchColumn { name, column_type, formats }
}

const fn common(name: &'static str, column_type: ColumnType) -> MatchColumn {
    column(name, column_type, ALL_FORMATS)
}

/// Canonical column order. Filtering by format yields each table's layout.
pub const MATCH_COLUMNS: &[MatchColumn] = &[
    common("innings", ColumnType::Text),
    common("data_version", ColumnType::Text),
    common("created", ColumnType::Text),
    common("revision", ColumnType::Text),
    common("balls_per_over", ColumnType::Integer),
    column("city", ColumnType::Text, &[Test, Odi]),
    common("dates", ColumnType::Text),
    common("event_match_number", ColumnType::Text),
    common("event_name", ColumnType::Text),
    common("gender", ColumnType::Text),
    common("match_type", ColumnType::Text),
    common("match_type_number", ColumnType::Integer),
    common("officials_match_referees", ColumnType::Text),
    common("officials_reserve_umpires", ColumnType::Text),
    common("officials_tv_umpires", ColumnType::Text),
    common("officials_umpires", ColumnType::Text),
    column("outcome_by_runs", ColumnType::Integer, &[Test, Odi]),
    column("outcome_by_wickets", ColumnType::Integer, &[T20]),
    common("outcome_winner", ColumnType::Text),
    column("overs", ColumnType::Real, &[Odi, T20]),
    common("player_of_match", ColumnType::Text),
    common("season", ColumnType::Text),
    column("team_type", ColumnType::Text, &[Test, T20]),
];

impl MatchColumn {
    pub fn applies_to(&self, format: MatchFormat) -> bool {
        self.formats.contains(&format)
    }
}

/// Declared columns of a format, in table order.
pub fn columns_for(format: MatchFormat) -> Vec<&'static MatchColumn> {
    MATCH_COLUMNS
        .iter()
        .filter(|c| c.applies_to(format))
        .collect()
}

pub fn column_names_for(format: MatchFormat) -> Vec<&'static str> {
    columns_for(format).into_iter().map(|c| c.name).collect()
}

pub fn create_table_sql(format: MatchFormat) -> String {
    let mut defs = vec![format!("    {} INTEGER PRIMARY KEY AUTOINCREMENT", PRIMARY_KEY_COLUMN)];
    defs.extend(
        columns_for(format)
            .into_iter()
            .map(|c| format!("    {} {}", c.name, c.column_type.as_sql())),
    );

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n);",
        format.table_name(),
        defs.join(",\n")
    )
}

/// Single-row insert with one `?` placeholder per declared column.
pub fn insert_row_sql(format: MatchFormat) -> String {
    let names = column_names_for(format);
    let placeholders = vec!["?"; names.len()];

    format!(
        "INSERT INTO {} ({}) VALUES ({});",
        format.table_name(),
        names.join(", "),
        placeholders.join(", ")
    )
}
