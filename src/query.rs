//! SQLite query generation for report sheets.
//!
//! Two shapes:
//!
//! - **value**: every sample in the window, timestamp truncated to the minute
//!   → rows `(YYYY-MM-DD HH:MM, value)`
//! - **daily**: one row per calendar day with max/avg/min and the value at the
//!   day's latest timestamp → rows `(YYYY-MM-DD, max, avg, min, end_of_day)`
//!
//! Both filter `start <= ts < end` on the (optionally localized) timestamp.
//! Values are read as REAL so untyped or TEXT columns decode the same way in
//! both shapes.
//! Table and column names come from the settings document and are quoted as
//! identifiers; the date literals are produced by `DateRange` formatting.

use crate::domain::{AggregationKind, DataSourceConfig, DateRange};
use crate::error::ReportError;

/// Build the query for `kind` over `range`.
pub fn build(kind: AggregationKind, config: &DataSourceConfig, range: &DateRange) -> Result<String, ReportError> {
    config.validate()?;
    Ok(match kind {
        AggregationKind::Value => value_query(config, range),
        AggregationKind::Daily => daily_query(config, range),
    })
}

fn value_query(config: &DataSourceConfig, range: &DateRange) -> String {
    let ts = quote_ident(&config.timestamp_column);
    let value = quote_ident(&config.value_column);
    let table = quote_ident(&config.table_name);
    let m = modifier(config.localize);
    let local_ts = format!("datetime({ts}{m})");

    format!(
        "SELECT strftime('%Y-%m-%d %H:%M', {ts}{m}) AS report_ts, CAST({value} AS REAL) AS report_value \
         FROM {table} \
         WHERE {filter} \
         ORDER BY {local_ts}",
        filter = range_filter(&local_ts, range),
    )
}

fn daily_query(config: &DataSourceConfig, range: &DateRange) -> String {
    let ts = quote_ident(&config.timestamp_column);
    let value = quote_ident(&config.value_column);
    let table = quote_ident(&config.table_name);
    let m = modifier(config.localize);
    let local_ts = format!("datetime({ts}{m})");
    let filter = range_filter(&local_ts, range);
    // Keeps fractional seconds so samples within the same second stay distinct.
    let precise_ts = format!("strftime('%Y-%m-%d %H:%M:%f', {ts}{m})");

    format!(
        "SELECT q1.report_day, q1.max_value, q1.avg_value, q1.min_value, q2.eod_value \
         FROM (\
         SELECT strftime('%Y-%m-%d', {ts}{m}) AS report_day, \
         round(max({value}), 2) AS max_value, \
         round(avg({value}), 2) AS avg_value, \
         round(min({value}), 2) AS min_value, \
         max({precise_ts}) AS max_ts \
         FROM {table} \
         WHERE {filter} \
         GROUP BY report_day\
         ) q1 \
         INNER JOIN (\
         SELECT {precise_ts} AS eod_ts, round({value}, 2) AS eod_value \
         FROM {table} \
         WHERE {filter}\
         ) q2 ON q1.max_ts = q2.eod_ts \
         GROUP BY q1.report_day \
         ORDER BY q1.report_day"
    )
}

/// Half-open `[start, end)` predicate.
fn range_filter(local_ts: &str, range: &DateRange) -> String {
    format!(
        "{local_ts} >= datetime('{start}') AND {local_ts} < datetime('{end}')",
        start = range.start_sql(),
        end = range.end_sql(),
    )
}

fn modifier(localize: bool) -> &'static str {
    if localize { ", 'localtime'" } else { "" }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.trim().replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use chrono::NaiveDate;

    fn source() -> DataSourceConfig {
        DataSourceConfig {
            store_location: PathBuf::from("data.db"),
            table_name: "t".to_string(),
            table_type: "type1".to_string(),
            timestamp_column: "stamp".to_string(),
            value_column: "rate".to_string(),
            value_label: "rate".to_string(),
            unit: None,
            localize: true,
        }
    }

    fn day_range() -> DateRange {
        let d = |day| NaiveDate::from_ymd_opt(2023, 1, day).unwrap().and_hms_opt(0, 0, 0).unwrap();
        DateRange::new(d(1), d(2)).unwrap()
    }

    #[test]
    fn value_query_has_boundaries_and_column() {
        let q = build(AggregationKind::Value, &source(), &day_range()).unwrap();
        assert!(q.contains("'2023-01-01 00:00:00'"), "{q}");
        assert!(q.contains("'2023-01-02 00:00:00'"), "{q}");
        assert!(q.contains("CAST(\"rate\" AS REAL) AS report_value"), "{q}");
        assert!(q.contains("FROM \"t\""), "{q}");
    }

    #[test]
    fn value_query_filter_is_half_open() {
        let q = build(AggregationKind::Value, &source(), &day_range()).unwrap();
        assert!(q.contains(
            "datetime(\"stamp\", 'localtime') >= datetime('2023-01-01 00:00:00') \
             AND datetime(\"stamp\", 'localtime') < datetime('2023-01-02 00:00:00')"
        ));
        assert!(!q.contains("<="));
    }

    #[test]
    fn daily_query_is_parameterized_by_range() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 5, 13).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let range = DateRange::new(start, end).unwrap();
        let q = build(AggregationKind::Daily, &source(), &range).unwrap();

        assert!(q.contains("'2024-05-06 00:00:00'"), "{q}");
        assert!(q.contains("'2024-05-13 00:00:00'"), "{q}");
        assert!(!q.contains("2022-08"), "{q}");
        assert!(q.contains("round(max(\"rate\"), 2) AS max_value"));
        assert!(q.contains("round(min(\"rate\"), 2) AS min_value"));
        assert!(q.contains("q1.max_ts = q2.eod_ts"));
        assert!(q.contains("max(strftime('%Y-%m-%d %H:%M:%f', \"stamp\", 'localtime')) AS max_ts"), "{q}");
    }

    #[test]
    fn localize_off_uses_stored_timestamps() {
        let mut cfg = source();
        cfg.localize = false;
        let q = build(AggregationKind::Value, &cfg, &day_range()).unwrap();
        assert!(!q.contains("localtime"));
        assert!(q.contains("datetime(\"stamp\") >= datetime('2023-01-01 00:00:00')"));
    }

    #[test]
    fn identifiers_are_quoted() {
        let mut cfg = source();
        cfg.table_name = "odd\"name".to_string();
        let q = build(AggregationKind::Value, &cfg, &day_range()).unwrap();
        assert!(q.contains("FROM \"odd\"\"name\""));
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut cfg = source();
        cfg.value_column = String::new();
        assert_eq!(
            build(AggregationKind::Daily, &cfg, &day_range()),
            Err(ReportError::MissingConfig("column_name"))
        );

        let mut cfg = source();
        cfg.table_name = " ".to_string();
        assert_eq!(
            build(AggregationKind::Value, &cfg, &day_range()),
            Err(ReportError::MissingConfig("table_name"))
        );
    }
}
