//! SQLite store access.
//!
//! The store is opened read-only once per run and every `ReportSpec` query is
//! executed against it. Rows are decoded into typed sheet data right away so
//! the workbook writer never touches SQL values.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{Connection, OpenFlags, Row};

use crate::domain::{AggregationKind, ReportSpec};
use crate::error::AppError;

const VALUE_TS_FORMAT: &str = "%Y-%m-%d %H:%M";
const DAILY_DATE_FORMAT: &str = "%Y-%m-%d";

/// One sample of a value sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRow {
    pub timestamp: NaiveDateTime,
    pub value: Option<f64>,
}

/// One day of a daily analysis sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub day: NaiveDate,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub min: Option<f64>,
    pub end_of_day: Option<f64>,
}

/// Fetched rows for one sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetData {
    Values(Vec<ValueRow>),
    Daily(Vec<DailyRow>),
}

impl SheetData {
    pub fn len(&self) -> usize {
        match self {
            SheetData::Values(rows) => rows.len(),
            SheetData::Daily(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct Store {
    conn: Connection,
    location: PathBuf,
}

impl Store {
    /// Open an existing store read-only.
    pub fn open(path: &Path) -> Result<Self, AppError> {
        if !path.is_file() {
            return Err(AppError::store(format!("Store '{}' does not exist.", path.display())));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| AppError::store(format!("Failed to open store '{}': {e}", path.display())))?;

        Ok(Self {
            conn,
            location: path.to_path_buf(),
        })
    }

    /// Execute the report's query and decode the rows for its aggregation kind.
    pub fn fetch(&self, spec: &ReportSpec) -> Result<SheetData, AppError> {
        let data = match spec.kind() {
            AggregationKind::Value => SheetData::Values(self.query_rows(spec, decode_value_row)?),
            AggregationKind::Daily => SheetData::Daily(self.query_rows(spec, decode_daily_row)?),
        };
        tracing::info!(
            sheet = %spec.sheet_name(),
            rows = data.len(),
            "fetched report rows"
        );
        Ok(data)
    }

    fn query_rows<T>(&self, spec: &ReportSpec, decode: fn(&Row<'_>) -> rusqlite::Result<T>) -> Result<Vec<T>, AppError> {
        let fail = |e: rusqlite::Error| {
            AppError::store(format!(
                "Query for '{}' failed on '{}': {e}",
                spec.mode().display_name(),
                self.location.display()
            ))
        };

        let mut stmt = self.conn.prepare(spec.query()).map_err(fail)?;
        let rows = stmt.query_map([], decode).map_err(fail)?;
        rows.collect::<rusqlite::Result<Vec<T>>>().map_err(fail)
    }
}

fn decode_value_row(row: &Row<'_>) -> rusqlite::Result<ValueRow> {
    let text: String = row.get(0)?;
    let timestamp = NaiveDateTime::parse_from_str(&text, VALUE_TS_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    Ok(ValueRow {
        timestamp,
        value: row.get(1)?,
    })
}

fn decode_daily_row(row: &Row<'_>) -> rusqlite::Result<DailyRow> {
    let text: String = row.get(0)?;
    let day = NaiveDate::parse_from_str(&text, DAILY_DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    Ok(DailyRow {
        day,
        max: row.get(1)?,
        avg: row.get(2)?,
        min: row.get(3)?,
        end_of_day: row.get(4)?,
    })
}
