//! Shared report pipeline used by the `generate` and `plan` commands.
//!
//! settings -> mode selection -> range resolution -> query building -> fetch -> workbook
//!
//! `plan_reports` is the pure part (no clock, no filesystem); `run_report`
//! adds the settings file, the store and the workbook.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::domain::{
    DataSourceConfig, DateRange, ReportConfig, ReportMode, ReportSpec, requested_modes, resolve,
};
use crate::error::{AppError, ReportError};
use crate::io::settings::load_data_source;
use crate::io::store::{SheetData, Store};
use crate::io::workbook::{workbook_path, write_workbook};

/// A requested mode that produced no sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedMode {
    pub mode: ReportMode,
    pub reason: String,
}

/// Resolved specs for one run, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct ReportPlan {
    pub specs: Vec<ReportSpec>,
    pub skipped: Vec<SkippedMode>,
}

/// What ended up in the workbook.
#[derive(Debug, Clone)]
pub struct SheetSummary {
    pub mode: ReportMode,
    pub range: DateRange,
    pub rows: usize,
}

/// All outputs of a `generate` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub workbook_path: PathBuf,
    pub sheets: Vec<SheetSummary>,
    pub skipped: Vec<SkippedMode>,
}

/// Resolve every requested mode into a `ReportSpec`.
///
/// Unknown mode codes are ignored. A mode whose range comes out empty or
/// inverted is skipped without affecting the others.
pub fn plan_reports(
    config: &ReportConfig,
    source: &DataSourceConfig,
    now: NaiveDateTime,
) -> Result<ReportPlan, ReportError> {
    let mut plan = ReportPlan::default();

    for mode in requested_modes(&config.modes) {
        let range = match resolve(mode, now, config.user_start, config.user_end) {
            Ok(range) => range,
            Err(err @ ReportError::InvalidRange { .. }) => {
                tracing::warn!(mode = %mode.code(), "skipping report: {err}");
                plan.skipped.push(SkippedMode {
                    mode,
                    reason: err.to_string(),
                });
                continue;
            }
            Err(err) => return Err(err),
        };

        let spec = ReportSpec::new(mode, range, source.clone())?;
        tracing::info!(mode = %mode.code(), %range, "resolved report");
        tracing::debug!(query = %spec.query());
        plan.specs.push(spec);
    }

    Ok(plan)
}

/// Load settings, plan, fetch and write the workbook.
pub fn run_report(config: &ReportConfig, now: NaiveDateTime) -> Result<RunOutput, AppError> {
    let source = load_data_source(&config.settings_path, &config.data_name)?;
    let plan = plan_reports(config, &source, now)?;
    run_plan(plan, &source, &config.output_dir, now)
}

/// Execute an already resolved plan.
///
/// Any store failure aborts the run before the workbook is written.
pub fn run_plan(
    plan: ReportPlan,
    source: &DataSourceConfig,
    output_dir: &Path,
    now: NaiveDateTime,
) -> Result<RunOutput, AppError> {
    if plan.specs.is_empty() {
        let mut message = "No report to generate: no requested mode resolved to a valid range.".to_string();
        for s in &plan.skipped {
            message.push_str(&format!("\n  {}: {}", s.mode, s.reason));
        }
        return Err(AppError::config(message));
    }

    let store = Store::open(&source.store_location)?;

    let mut sheets: Vec<(ReportSpec, SheetData)> = Vec::with_capacity(plan.specs.len());
    for spec in plan.specs {
        let data = store.fetch(&spec)?;
        sheets.push((spec, data));
    }

    let path = workbook_path(output_dir, now);
    write_workbook(&path, &sheets)?;

    let summaries = sheets
        .iter()
        .map(|(spec, data)| SheetSummary {
            mode: spec.mode(),
            range: *spec.range(),
            rows: data.len(),
        })
        .collect();

    Ok(RunOutput {
        workbook_path: path,
        sheets: summaries,
        skipped: plan.skipped,
    })
}
