//! Error types.
//!
//! - `ReportError`: failures of the pure core (mode lookup, range resolution,
//!   query building, date parsing).
//! - `AppError`: what reaches the process boundary; carries the exit code.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Settings document missing, malformed, or otherwise unusable.
pub const EXIT_CONFIG: u8 = 1;
/// The requested data name has no entry in the settings document.
pub const EXIT_UNKNOWN_DATA: u8 = 2;
/// The store could not be opened or a query failed.
pub const EXIT_STORE: u8 = 3;
/// The workbook could not be written.
pub const EXIT_OUTPUT: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("Unknown report mode '{0}'.")]
    UnknownMode(String),

    #[error("Invalid date range: start {start} is not before end {end}.")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Unsupported aggregation kind '{0}'. Expected 'value' or 'daily'.")]
    UnsupportedAggregationKind(String),

    #[error("Missing data source setting: `{0}` is empty.")]
    MissingConfig(&'static str),

    #[error(
        "Invalid date/time '{0}'. Expected e.g. 2021-12-31 or 2021-12-31 12:25:20."
    )]
    InvalidDateTime(String),
}

/// A failure with the process exit code it maps to.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(EXIT_CONFIG, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(EXIT_STORE, message)
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::new(EXIT_OUTPUT, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        AppError::config(err.to_string())
    }
}
