//! Effective date range resolution.
//!
//! `now` is always passed in; nothing here reads the clock.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use crate::domain::catalog::ReportMode;
use crate::domain::types::DateRange;
use crate::error::ReportError;

/// Resolve the effective `[start, end)` window for `mode`.
///
/// - Static modes always use their default window; user bounds are ignored.
/// - Dynamic modes with a user start use it, ending at the user end or `now`.
/// - Dynamic modes without a user start fall back to the default window. A user
///   end given without a start is dropped in that case (kept for compatibility
///   with existing scheduled invocations).
pub fn resolve(
    mode: ReportMode,
    now: NaiveDateTime,
    user_start: Option<NaiveDateTime>,
    user_end: Option<NaiveDateTime>,
) -> Result<DateRange, ReportError> {
    let (start, end) = if mode.uses_fixed_range() {
        mode.default_bounds(now)
    } else {
        match user_start {
            Some(start) => (start, user_end.unwrap_or(now)),
            None => {
                if let Some(end) = user_end {
                    tracing::warn!(
                        mode = %mode.code(),
                        %end,
                        "--end-dt ignored without --start-dt; using the default window"
                    );
                }
                mode.default_bounds(now)
            }
        }
    };

    DateRange::new(start, end)
}

/// Parse a user-supplied date or date-time.
///
/// Date-only inputs map to midnight. Offsets (RFC 3339) are converted to local
/// wall-clock time.
pub fn parse_instant(text: &str) -> Result<NaiveDateTime, ReportError> {
    const DATETIME_FMTS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    const DATE_FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

    let s = text.trim();
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d.and_time(chrono::NaiveTime::MIN));
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }

    Err(ReportError::InvalidDateTime(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn last_24_hours_scenario() {
        let r = resolve(ReportMode::LastDay, at(2023, 3, 10, 10, 0), None, None).unwrap();
        assert_eq!(r.start(), at(2023, 3, 9, 10, 0));
        assert_eq!(r.end(), at(2023, 3, 10, 10, 0));
    }

    #[test]
    fn yesterday_scenario() {
        let r = resolve(ReportMode::Yesterday, at(2023, 3, 10, 15, 30), None, None).unwrap();
        assert_eq!(r.start(), at(2023, 3, 9, 0, 0));
        assert_eq!(r.end(), at(2023, 3, 10, 0, 0));
    }

    #[test]
    fn static_modes_ignore_user_bounds() {
        let now = at(2023, 3, 10, 15, 30);
        let user_start = Some(at(2020, 1, 1, 0, 0));
        let user_end = Some(at(2020, 2, 1, 0, 0));
        for mode in ReportMode::ALL.into_iter().filter(|m| m.uses_fixed_range()) {
            let plain = resolve(mode, now, None, None).unwrap();
            assert_eq!(resolve(mode, now, user_start, user_end).unwrap(), plain);
            assert_eq!(resolve(mode, now, user_start, None).unwrap(), plain);
            assert_eq!(resolve(mode, now, None, user_end).unwrap(), plain);
        }
    }

    #[test]
    fn static_modes_never_produce_empty_ranges() {
        // Two weeks, every 17 minutes, plus exact midnights.
        let mut now = at(2024, 2, 20, 0, 0);
        let stop = at(2024, 3, 5, 0, 0);
        while now < stop {
            for mode in ReportMode::ALL.into_iter().filter(|m| m.uses_fixed_range()) {
                let r = resolve(mode, now, None, None)
                    .unwrap_or_else(|e| panic!("{mode} at {now}: {e}"));
                assert!(r.start() < r.end());
            }
            now += Duration::minutes(17);
        }
        for day in 0..14 {
            let midnight = at(2024, 2, 20, 0, 0) + Duration::days(day);
            for mode in ReportMode::ALL {
                assert!(resolve(mode, midnight, None, None).is_ok(), "{mode} at {midnight}");
            }
        }
    }

    #[test]
    fn dynamic_modes_use_both_user_bounds() {
        let now = at(2023, 3, 10, 15, 30);
        let start = at(2023, 1, 1, 0, 0);
        let end = at(2023, 2, 1, 12, 0);
        for mode in [ReportMode::ValuePeriod, ReportMode::DailyPeriod] {
            let r = resolve(mode, now, Some(start), Some(end)).unwrap();
            assert_eq!((r.start(), r.end()), (start, end));
        }
    }

    #[test]
    fn dynamic_mode_with_start_only_ends_now() {
        let now = at(2023, 1, 5, 0, 0);
        let start = parse_instant("2023-01-01").unwrap();
        let r = resolve(ReportMode::ValuePeriod, now, Some(start), None).unwrap();
        assert_eq!(r.start(), at(2023, 1, 1, 0, 0));
        assert_eq!(r.end(), now);
    }

    #[test]
    fn dynamic_mode_without_start_falls_back_and_drops_end() {
        let now = at(2023, 3, 10, 15, 30);
        let default = resolve(ReportMode::DailyPeriod, now, None, None).unwrap();
        assert_eq!(default.start(), at(2023, 3, 3, 0, 0));
        assert_eq!(default.end(), now);

        let with_end = resolve(ReportMode::DailyPeriod, now, None, Some(at(2023, 3, 4, 0, 0))).unwrap();
        assert_eq!(with_end, default);
    }

    #[test]
    fn inverted_user_bounds_are_rejected() {
        let now = at(2023, 3, 10, 15, 30);
        let err = resolve(
            ReportMode::ValuePeriod,
            now,
            Some(at(2023, 3, 2, 0, 0)),
            Some(at(2023, 3, 1, 0, 0)),
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::InvalidRange { .. }));

        // A start in the future with no end also collapses.
        assert!(resolve(ReportMode::ValuePeriod, now, Some(at(2023, 4, 1, 0, 0)), None).is_err());
    }

    #[test]
    fn parse_instant_accepts_common_forms() {
        assert_eq!(parse_instant("2021-12-31").unwrap(), at(2021, 12, 31, 0, 0));
        assert_eq!(parse_instant("2021-12-31 12:25").unwrap(), at(2021, 12, 31, 12, 25));
        assert_eq!(
            parse_instant(" 2021-12-31 12:25:20 ").unwrap(),
            at(2021, 12, 31, 12, 25) + Duration::seconds(20)
        );
        assert_eq!(parse_instant("2021-12-31T12:25:00").unwrap(), at(2021, 12, 31, 12, 25));
        assert_eq!(parse_instant("31/12/2021").unwrap(), at(2021, 12, 31, 0, 0));
        assert_eq!(parse_instant("31-12-2021").unwrap(), at(2021, 12, 31, 0, 0));
    }

    #[test]
    fn parse_instant_rejects_garbage() {
        assert_eq!(
            parse_instant("last tuesday"),
            Err(ReportError::InvalidDateTime("last tuesday".to_string()))
        );
        assert!(parse_instant("2021-02-30").is_err());
    }
}
