//! Report mode catalog.
//!
//! Each mode is identified by a one-letter code on the command line. A mode
//! either has a *static* window (computed from "now" only) or a *dynamic* one
//! that `--start-dt` / `--end-dt` may override.
//!
//! | code | name                      | kind  | range   |
//! |------|---------------------------|-------|---------|
//! | `H`  | Values of Last 24 Hours   | value | static  |
//! | `Y`  | Values of Yesterday       | value | static  |
//! | `V`  | Values of Period          | value | dynamic |
//! | `P`  | Analysis of Period        | daily | dynamic |
//! | `S`  | Analysis of 7 Days        | daily | static  |
//! | `W`  | Analysis of Last Week     | daily | static  |

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDateTime};

use crate::domain::types::AggregationKind;
use crate::error::ReportError;

/// Mode selected when `--mode` is not given.
pub const DEFAULT_MODES: &str = "H";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReportMode {
    /// `H`: raw values over the 24 hours before now.
    LastDay,
    /// `Y`: raw values over the previous calendar day.
    Yesterday,
    /// `V`: raw values over a caller-chosen period (default: last 7 days).
    ValuePeriod,
    /// `P`: daily analysis over a caller-chosen period (default: last 7 days).
    DailyPeriod,
    /// `S`: daily analysis over the last 7 days.
    LastSevenDays,
    /// `W`: daily analysis over the previous Monday-to-Monday week.
    LastWeek,
}

impl ReportMode {
    /// Catalog order; sheets are written in this order.
    pub const ALL: [ReportMode; 6] = [
        ReportMode::LastDay,
        ReportMode::Yesterday,
        ReportMode::ValuePeriod,
        ReportMode::DailyPeriod,
        ReportMode::LastSevenDays,
        ReportMode::LastWeek,
    ];

    pub fn code(self) -> char {
        match self {
            ReportMode::LastDay => 'H',
            ReportMode::Yesterday => 'Y',
            ReportMode::ValuePeriod => 'V',
            ReportMode::DailyPeriod => 'P',
            ReportMode::LastSevenDays => 'S',
            ReportMode::LastWeek => 'W',
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ReportMode::LastDay => "Values of Last 24 Hours",
            ReportMode::Yesterday => "Values of Yesterday",
            ReportMode::ValuePeriod => "Values of Period",
            ReportMode::DailyPeriod => "Analysis of Period",
            ReportMode::LastSevenDays => "Analysis of 7 Days",
            ReportMode::LastWeek => "Analysis of Last Week",
        }
    }

    pub fn kind(self) -> AggregationKind {
        match self {
            ReportMode::LastDay | ReportMode::Yesterday | ReportMode::ValuePeriod => AggregationKind::Value,
            ReportMode::DailyPeriod | ReportMode::LastSevenDays | ReportMode::LastWeek => AggregationKind::Daily,
        }
    }

    /// `true` when user-supplied bounds are ignored.
    pub fn uses_fixed_range(self) -> bool {
        !matches!(self, ReportMode::ValuePeriod | ReportMode::DailyPeriod)
    }

    /// Worksheet name: the display name with non-alphanumeric characters removed.
    pub fn sheet_name(self) -> String {
        self.display_name()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect()
    }

    /// Default `(start, end)` bounds relative to `now`.
    ///
    /// `today` is midnight at the start of `now`'s date.
    pub fn default_bounds(self, now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let today = now.date().and_time(chrono::NaiveTime::MIN);
        match self {
            ReportMode::LastDay => (now - Duration::days(1), now),
            ReportMode::Yesterday => (today - Duration::days(1), today),
            ReportMode::ValuePeriod | ReportMode::DailyPeriod | ReportMode::LastSevenDays => {
                (today - Duration::days(7), now)
            }
            ReportMode::LastWeek => {
                let this_monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
                (this_monday - Duration::days(7), this_monday)
            }
        }
    }
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.code())
    }
}

impl FromStr for ReportMode {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s)
    }
}

/// Find a mode by its one-letter code (case-sensitive).
pub fn lookup(code: &str) -> Result<ReportMode, ReportError> {
    let mut chars = code.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => ReportMode::ALL
            .into_iter()
            .find(|m| m.code() == c)
            .ok_or_else(|| ReportError::UnknownMode(code.to_string())),
        _ => Err(ReportError::UnknownMode(code.to_string())),
    }
}

/// Modes whose code occurs anywhere in `selection`, in catalog order.
///
/// Characters that are not catalog codes are ignored, so `"HxW"` selects
/// `H` and `W`.
pub fn requested_modes(selection: &str) -> Vec<ReportMode> {
    for c in selection.chars() {
        let known = ReportMode::ALL.iter().any(|m| m.code() == c);
        if !known && !c.is_whitespace() && c != ',' {
            tracing::debug!(code = %c, "ignoring unknown report mode code");
        }
    }

    ReportMode::ALL
        .into_iter()
        .filter(|m| selection.contains(m.code()))
        .collect()
}
