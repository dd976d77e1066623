//! Formatted terminal output.
//!
//! Kept apart from the pipeline so the printed layout can change without
//! touching resolution or rendering code.

use std::time::Duration;

use crate::app::pipeline::{ReportPlan, RunOutput, SkippedMode};
use crate::domain::ReportMode;

/// Workbook file name, per-sheet row counts, skipped modes and elapsed time.
pub fn format_run_summary(run: &RunOutput, elapsed: Duration) -> String {
    let mut out = String::new();

    let file_name = run
        .workbook_path
        .file_name()
        .map_or_else(|| run.workbook_path.display().to_string(), |n| n.to_string_lossy().into_owned());
    out.push_str(&format!("{file_name}\n"));
    for sheet in &run.sheets {
        out.push_str(&format!(
            "  {:<22} {:<5} {}  rows={}\n",
            sheet.mode.sheet_name(),
            sheet.mode.kind(),
            sheet.range,
            sheet.rows
        ));
    }
    out.push_str(&format_skipped(&run.skipped));
    out.push_str(&format!("Program executed in {:.3} seconds", elapsed.as_secs_f64()));

    out
}

/// Resolved specs with their queries (`plan` command).
pub fn format_plan(plan: &ReportPlan) -> String {
    let mut out = String::new();

    if plan.specs.is_empty() {
        out.push_str("No report modes selected.\n");
    }
    for spec in &plan.specs {
        out.push_str(&format!("[{}] {}\n", spec.mode().code(), spec.mode().display_name()));
        out.push_str(&format!("  sheet : {}\n", spec.sheet_name()));
        out.push_str(&format!("  kind  : {}\n", spec.kind()));
        out.push_str(&format!("  range : {}\n", spec.range()));
        out.push_str(&format!("  store : {}\n", spec.source().store_location.display()));
        out.push_str(&format!("  table : {}", spec.source().table_name));
        if !spec.source().table_type.is_empty() {
            out.push_str(&format!(" ({})", spec.source().table_type));
        }
        out.push('\n');
        out.push_str(&format!("  query : {}\n\n", spec.query()));
    }
    out.push_str(&format_skipped(&plan.skipped));

    out.trim_end().to_string()
}

/// The mode catalog as a table (`modes` command).
pub fn format_mode_catalog() -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<4} {:<24} {:<6} {:<7}\n", "code", "name", "kind", "range"));
    out.push_str(&format!("{:-<4} {:-<24} {:-<6} {:-<7}\n", "", "", "", ""));
    for mode in ReportMode::ALL {
        out.push_str(&format!(
            "{:<4} {:<24} {:<6} {}\n",
            mode.code(),
            mode.display_name(),
            mode.kind(),
            if mode.uses_fixed_range() { "static" } else { "dynamic" }
        ));
    }
    out.trim_end().to_string()
}

fn format_skipped(skipped: &[SkippedMode]) -> String {
    skipped
        .iter()
        .map(|s| format!("  (skipped {}) {}\n", s.mode, s.reason))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use chrono::NaiveDate;

    use crate::app::pipeline::SheetSummary;
    use crate::domain::DateRange;

    #[test]
    fn catalog_lists_every_mode() {
        let table = format_mode_catalog();
        for mode in ReportMode::ALL {
            assert!(table.contains(mode.display_name()), "{table}");
        }
        assert!(table.lines().any(|l| l.starts_with("V ") && l.ends_with("dynamic")));
        assert!(table.lines().any(|l| l.starts_with("W ") && l.ends_with("static")));
    }

    #[test]
    fn run_summary_starts_with_file_and_ends_with_elapsed() {
        let d = |day| NaiveDate::from_ymd_opt(2023, 3, day).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let run = RunOutput {
            workbook_path: PathBuf::from("./out").join("Report2303101000.xlsx"),
            sheets: vec![SheetSummary {
                mode: ReportMode::Yesterday,
                range: DateRange::new(d(9), d(10)).unwrap(),
                rows: 42,
            }],
            skipped: vec![SkippedMode {
                mode: ReportMode::ValuePeriod,
                reason: "bad range".to_string(),
            }],
        };

        let text = format_run_summary(&run, Duration::from_millis(1500));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Report2303101000.xlsx");
        assert!(lines[1].contains("ValuesofYesterday") && lines[1].ends_with("rows=42"));
        assert!(lines[2].contains("(skipped Values of Period (V)) bad range"));
        assert_eq!(lines[3], "Program executed in 1.500 seconds");
    }

    #[test]
    fn empty_plan_says_so() {
        assert_eq!(format_plan(&ReportPlan::default()), "No report modes selected.");
    }
}
