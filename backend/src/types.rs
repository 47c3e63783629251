use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// The three match formats, each loaded into its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MatchFormat {
    /// Multi-day matches
    #[serde(rename = "test")]
    Test,
    /// One-day internationals
    #[serde(rename = "odi")]
    Odi,
    /// Short-form matches
    #[serde(rename = "t20")]
    T20,
}

impl MatchFormat {
    /// Load order of the batch entry point.
    pub const ALL: [MatchFormat; 3] = [MatchFormat::Test, MatchFormat::Odi, MatchFormat::T20];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchFormat::Test => "test",
            MatchFormat::Odi => "odi",
            MatchFormat::T20 => "t20",
        }
    }

    pub fn table_name(&self) -> &'static str {
        match self {
            MatchFormat::Test => "test_matches",
            MatchFormat::Odi => "odi_matches",
            MatchFormat::T20 => "t20_matches",
        }
    }

    /// File name of the source CSV inside the datasets directory.
    pub fn csv_file_name(&self) -> &'static str {
        match self {
            MatchFormat::Test => "tests_matches.csv",
            MatchFormat::Odi => "odis_matches.csv",
            MatchFormat::T20 => "t20s_matches.csv",
        }
    }
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid match format: {0}")]
pub struct ParseMatchFormatError(String);

impl FromStr for MatchFormat {
    type Err = ParseMatchFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "test" => Ok(MatchFormat::Test),
            "odi" => Ok(MatchFormat::Odi),
            "t20" => Ok(MatchFormat::T20),
            _ => Err(ParseMatchFormatError(s.to_string())),
        }
    }
}

/// SQLite storage class declared for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid {kind} value: {value}")]
pub struct ParsePolicyError {
    kind: &'static str,
    value: String,
}

/// What to do with CSV columns that are not declared for the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExtraColumnPolicy {
    #[serde(rename = "ignore")]
    Ignore,
    #[default]
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "reject")]
    Reject,
}

impl FromStr for ExtraColumnPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(ExtraColumnPolicy::Ignore),
            "warn" => Ok(ExtraColumnPolicy::Warn),
            "reject" => Ok(ExtraColumnPolicy::Reject),
            _ => Err(ParsePolicyError { kind: "extra column policy", value: s.to_string() }),
        }
    }
}

/// What to do when the source has more rows than the row limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RowLimitPolicy {
    #[serde(rename = "truncate")]
    Truncate,
    #[default]
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "reject")]
    Reject,
}

impl FromStr for RowLimitPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "truncate" => Ok(RowLimitPolicy::Truncate),
            "warn" => Ok(RowLimitPolicy::Warn),
            "reject" => Ok(RowLimitPolicy::Reject),
            _ => Err(ParsePolicyError { kind: "row limit policy", value: s.to_string() }),
        }
    }
}

/// Cell markers read as missing values, the same set pandas uses by default.
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan",
    "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None",
    "n/a", "nan", "null",
];

/// A single typed value, either parsed from a CSV cell or read back from a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl CellValue {
    /// Convert a raw CSV cell according to the declared column type.
    ///
    /// Values that don't parse as the declared numeric type are kept as text,
    /// SQLite's column affinity stores them as they are.
    pub fn from_csv(raw: &str, column_type: ColumnType) -> CellValue {
        if MISSING_MARKERS.contains(&raw) {
            return CellValue::Null;
        }

        let trimmed = raw.trim();
        match column_type {
            ColumnType::Integer => {
                if let Ok(v) = trimmed.parse::<i64>() {
                    CellValue::Integer(v)
                } else if let Some(v) = trimmed.parse::<f64>().ok().filter(|v| v.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(v)) {
                    // Integer columns with gaps are written out as floats, e.g. "3.0"
                    CellValue::Integer(v as i64)
                } else {
                    CellValue::Text(raw.to_string())
                }
            }
            ColumnType::Real => match trimmed.parse::<f64>() {
                Ok(v) => CellValue::Real(v),
                Err(_) => CellValue::Text(raw.to_string()),
            },
            ColumnType::Text => CellValue::Text(raw.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("NULL"),
            CellValue::Integer(v) => write!(f, "{}", v),
            CellValue::Real(v) => write!(f, "{}", v),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}
