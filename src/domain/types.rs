//! Shared domain types.
//!
//! Everything here is a plain value: built once per run (or once per mode) and
//! never mutated afterwards. Nothing reads the clock or the filesystem.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::domain::catalog::ReportMode;
use crate::error::ReportError;

/// Literal format used for date boundaries inside generated queries.
pub const SQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How stored samples are summarized on a report sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationKind {
    /// Raw value listing, one row per stored sample.
    Value,
    /// One row per calendar day: max, average, min and the end-of-day value.
    Daily,
}

impl AggregationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AggregationKind::Value => "value",
            AggregationKind::Daily => "daily",
        }
    }
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for AggregationKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "value" => Ok(AggregationKind::Value),
            "daily" => Ok(AggregationKind::Daily),
            _ => Err(ReportError::UnsupportedAggregationKind(s.to_string())),
        }
    }
}

/// Half-open interval `[start, end)` of local wall-clock instants.
///
/// The constructor enforces `start < end`, so a `DateRange` in hand is always
/// non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ReportError> {
        if start >= end {
            return Err(ReportError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn start_sql(&self) -> String {
        self.start.format(SQL_DATETIME_FORMAT).to_string()
    }

    pub fn end_sql(&self) -> String {
        self.end.format(SQL_DATETIME_FORMAT).to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start_sql(), self.end_sql())
    }
}

/// Where one data series lives and how to read it.
///
/// Built from the settings document entry for a data name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceConfig {
    pub store_location: PathBuf,
    pub table_name: String,
    /// Free-form table tag carried through from the settings document.
    pub table_type: String,
    pub timestamp_column: String,
    pub value_column: String,
    /// Label for the value column header and the chart series (the data name).
    pub value_label: String,
    /// Value-axis title on charts.
    pub unit: Option<String>,
    /// Convert stored timestamps with SQLite's `'localtime'` modifier.
    pub localize: bool,
}

impl DataSourceConfig {
    /// Presence checks only; names are not looked up in the store.
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.table_name.trim().is_empty() {
            return Err(ReportError::MissingConfig("table_name"));
        }
        if self.timestamp_column.trim().is_empty() {
            return Err(ReportError::MissingConfig("ts_column_name"));
        }
        if self.value_column.trim().is_empty() {
            return Err(ReportError::MissingConfig("column_name"));
        }
        Ok(())
    }
}

/// A resolved, immutable descriptor for one report sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSpec {
    mode: ReportMode,
    range: DateRange,
    source: DataSourceConfig,
    query: String,
}

impl ReportSpec {
    /// Combine a mode, its effective range and the data source, generating the query.
    pub fn new(mode: ReportMode, range: DateRange, source: DataSourceConfig) -> Result<Self, ReportError> {
        let query = crate::query::build(mode.kind(), &source, &range)?;
        Ok(Self {
            mode,
            range,
            source,
            query,
        })
    }

    pub fn mode(&self) -> ReportMode {
        self.mode
    }

    pub fn kind(&self) -> AggregationKind {
        self.mode.kind()
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    pub fn source(&self) -> &DataSourceConfig {
        &self.source
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sheet_name(&self) -> String {
        self.mode.sheet_name()
    }
}

/// Run configuration after CLI parsing.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Requested mode codes, e.g. `"HW"`.
    pub modes: String,
    pub user_start: Option<NaiveDateTime>,
    pub user_end: Option<NaiveDateTime>,
    /// Key into the settings document.
    pub data_name: String,
    pub settings_path: PathBuf,
    pub output_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn date_range_rejects_empty_and_inverted() {
        let t = at(2023, 1, 1, 0);
        assert_eq!(
            DateRange::new(t, t),
            Err(ReportError::InvalidRange { start: t, end: t })
        );
        assert!(DateRange::new(at(2023, 1, 2, 0), t).is_err());
    }

    #[test]
    fn date_range_renders_half_open_bounds() {
        let r = DateRange::new(at(2023, 1, 1, 0), at(2023, 1, 2, 0)).unwrap();
        assert_eq!(r.start_sql(), "2023-01-01 00:00:00");
        assert_eq!(r.end(), at(2023, 1, 2, 0));
        assert_eq!(r.to_string(), "[2023-01-01 00:00:00, 2023-01-02 00:00:00)");
    }

    #[test]
    fn aggregation_kind_parses_known_names_only() {
        assert_eq!("value".parse::<AggregationKind>().unwrap(), AggregationKind::Value);
        assert_eq!(" Daily ".parse::<AggregationKind>().unwrap(), AggregationKind::Daily);
        assert_eq!(
            "hourly".parse::<AggregationKind>(),
            Err(ReportError::UnsupportedAggregationKind("hourly".to_string()))
        );
    }

    #[test]
    fn data_source_requires_names() {
        let mut cfg = DataSourceConfig {
            store_location: PathBuf::from("data.db"),
            table_name: "t".to_string(),
            table_type: String::new(),
            timestamp_column: "stamp".to_string(),
            value_column: "rate".to_string(),
            value_label: "rate".to_string(),
            unit: None,
            localize: true,
        };
        assert!(cfg.validate().is_ok());

        cfg.timestamp_column = "  ".to_string();
        assert_eq!(cfg.validate(), Err(ReportError::MissingConfig("ts_column_name")));
    }
}
