//! XLSX workbook rendering.
//!
//! One worksheet per `ReportSpec`, named after the mode, followed by a line
//! chart of the fetched series:
//!
//! - value sheets: `Date & Time | <data name>`, chart at `C1` on a text axis
//! - daily sheets: `Date | Maximum | Average | Minimum | End of Day`, chart at
//!   `F1` on a date axis (plots the daily maximum)

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rust_xlsxwriter::{
    Chart, ChartFormat, ChartLine, ChartMarker, ChartType, Color, Format, FormatAlign, Workbook, Worksheet, XlsxError,
};

use crate::domain::{AggregationKind, ReportSpec};
use crate::error::AppError;
use crate::io::store::{DailyRow, SheetData, ValueRow};

const FLOAT_FORMAT: &str = "0.00";
const CHART_WIDTH: u32 = 850;
const CHART_HEIGHT: u32 = 490;

/// `Report<yyMMddHHmm>.xlsx`
pub fn workbook_file_name(generated_at: NaiveDateTime) -> String {
    format!("Report{}.xlsx", generated_at.format("%y%m%d%H%M"))
}

/// Full output path for a run started at `generated_at`.
pub fn workbook_path(output_dir: &Path, generated_at: NaiveDateTime) -> PathBuf {
    output_dir.join(workbook_file_name(generated_at))
}

struct SheetFormats {
    bold: Format,
    bold_centered: Format,
    float: Format,
    datetime: Format,
    date: Format,
}

impl SheetFormats {
    fn new() -> Self {
        Self {
            bold: Format::new().set_bold(),
            bold_centered: Format::new().set_bold().set_align(FormatAlign::CenterAcross),
            float: Format::new().set_num_format(FLOAT_FORMAT),
            datetime: Format::new().set_num_format("dd/mm/yy hh:mm").set_align(FormatAlign::Left),
            date: Format::new().set_num_format("dd/mm/yy").set_align(FormatAlign::Left),
        }
    }
}

/// Write all sheets to `path`.
pub fn write_workbook(path: &Path, sheets: &[(ReportSpec, SheetData)]) -> Result<(), AppError> {
    let formats = SheetFormats::new();
    let mut workbook = Workbook::new();

    for (spec, data) in sheets {
        let worksheet = build_worksheet(spec, data, &formats)
            .map_err(|e| AppError::output(format!("Failed to build sheet '{}': {e}", spec.sheet_name())))?;
        workbook.push_worksheet(worksheet);
    }

    workbook
        .save(path)
        .map_err(|e| AppError::output(format!("Failed to write workbook '{}': {e}", path.display())))?;
    Ok(())
}

fn build_worksheet(spec: &ReportSpec, data: &SheetData, formats: &SheetFormats) -> Result<Worksheet, XlsxError> {
    let mut worksheet = Worksheet::new();
    let name = spec.sheet_name();
    worksheet.set_name(&name)?;

    match data {
        SheetData::Values(rows) => write_value_rows(&mut worksheet, spec, rows, formats)?,
        SheetData::Daily(rows) => write_daily_rows(&mut worksheet, rows, formats)?,
    }

    // Nothing to plot without at least one data row.
    if !data.is_empty() {
        let last_row = data.len() as u32;
        let chart = build_chart(spec, &name, last_row);
        let anchor_col = match data {
            SheetData::Values(_) => 2,
            SheetData::Daily(_) => 5,
        };
        worksheet.insert_chart(0, anchor_col, &chart)?;
    }

    Ok(worksheet)
}

fn write_value_rows(
    worksheet: &mut Worksheet,
    spec: &ReportSpec,
    rows: &[ValueRow],
    formats: &SheetFormats,
) -> Result<(), XlsxError> {
    worksheet.set_column_width(0, 16)?;
    worksheet.set_column_width(1, 14)?;
    worksheet.write_string_with_format(0, 0, "Date & Time", &formats.bold)?;
    worksheet.write_string_with_format(0, 1, &spec.source().value_label, &formats.bold_centered)?;

    for (i, r) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        worksheet.write_datetime_with_format(row, 0, &r.timestamp, &formats.datetime)?;
        if let Some(v) = r.value {
            worksheet.write_number_with_format(row, 1, v, &formats.float)?;
        }
    }
    Ok(())
}

fn write_daily_rows(worksheet: &mut Worksheet, rows: &[DailyRow], formats: &SheetFormats) -> Result<(), XlsxError> {
    worksheet.set_column_width(0, 16)?;
    for col in 1..=4 {
        worksheet.set_column_width(col, 19)?;
    }
    worksheet.write_string_with_format(0, 0, "Date", &formats.bold)?;
    for (col, title) in [(1, "Maximum"), (2, "Average"), (3, "Minimum"), (4, "End of Day")] {
        worksheet.write_string_with_format(0, col, title, &formats.bold_centered)?;
    }

    for (i, r) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        worksheet.write_datetime_with_format(row, 0, &r.day, &formats.date)?;
        for (col, value) in [(1, r.max), (2, r.avg), (3, r.min), (4, r.end_of_day)] {
            if let Some(v) = value {
                worksheet.write_number_with_format(row, col, v, &formats.float)?;
            }
        }
    }
    Ok(())
}

fn build_chart(spec: &ReportSpec, sheet_name: &str, last_row: u32) -> Chart {
    let mut chart = Chart::new(ChartType::Line);
    chart.title().set_name(spec.mode().display_name());

    let y_axis = chart.y_axis();
    if let Some(unit) = &spec.source().unit {
        y_axis.set_name(unit);
    }
    y_axis.set_num_format(FLOAT_FORMAT);

    match spec.kind() {
        AggregationKind::Value => {
            chart.x_axis().set_text_axis(true);
        }
        AggregationKind::Daily => {
            chart.x_axis().set_date_axis(true).set_num_format("dd/mm/yyyy");
        }
    }

    chart.legend().set_hidden();
    chart.set_width(CHART_WIDTH).set_height(CHART_HEIGHT);

    chart
        .add_series()
        .set_name(&spec.source().value_label)
        .set_categories((sheet_name, 1, 0, last_row, 0))
        .set_values((sheet_name, 1, 1, last_row, 1))
        .set_format(ChartFormat::new().set_line(ChartLine::new().set_color(Color::Red)))
        .set_marker(ChartMarker::new().set_none());

    chart
}
