//! Metrics report writers.
//!
//! The report is published twice with identical rows: `metrics.csv` for
//! downstream tooling and `metrics.xlsx` (sheet `metrics`) for people. Both
//! are rendered fully in memory and then written atomically.

use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use tracing::debug;

use crate::error::{VarianceError, VarianceResult};
use crate::models::{EmployeeCode, ReportRow};

use super::atomic::write_atomically;

/// Name of the worksheet in the spreadsheet report.
pub const REPORT_SHEET_NAME: &str = "metrics";

/// Number format applied to monetary cells in the spreadsheet report.
const MONEY_NUMBER_FORMAT: &str = "0.00";

/// Renders report rows as CSV.
///
/// The header is always written, even with no rows. Monetary columns keep
/// the two decimal places they were rounded to.
///
/// # Example
///
/// ```
/// use super_variance::io::render_report_csv;
///
/// let csv = render_report_csv(&[])?;
/// assert_eq!(
///     String::from_utf8(csv).unwrap(),
///     "employee_code,year,quarter,total_ote,total_super_payable,total_disbursed,variance\n"
/// );
/// # Ok::<(), super_variance::error::VarianceError>(())
/// ```
pub fn render_report_csv(rows: &[ReportRow]) -> VarianceResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(ReportRow::COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.into_inner().map_err(|e| VarianceError::ReportWriteError {
        path: "<memory>".to_string(),
        message: e.error().to_string(),
    })
}

/// Writes the CSV report to `path`.
pub fn write_report_csv(rows: &[ReportRow], path: &Path) -> VarianceResult<()> {
    let bytes = render_report_csv(rows)?;
    write_atomically(path, &bytes)?;
    debug!(path = %path.display(), rows = rows.len(), "CSV report written");
    Ok(())
}

/// Renders report rows as an `.xlsx` workbook.
///
/// Numeric employee codes are written as numbers and text codes as strings,
/// matching how they read back from the source workbook.
pub fn render_report_xlsx(rows: &[ReportRow]) -> VarianceResult<Vec<u8>> {
    build_workbook(rows)
        .and_then(|mut workbook| workbook.save_to_buffer())
        .map_err(|e| VarianceError::ReportWriteError {
            path: REPORT_SHEET_NAME.to_string(),
            message: e.to_string(),
        })
}

/// Writes the spreadsheet report to `path`.
pub fn write_report_xlsx(rows: &[ReportRow], path: &Path) -> VarianceResult<()> {
    let bytes = render_report_xlsx(rows).map_err(|e| match e {
        VarianceError::ReportWriteError { message, .. } => VarianceError::ReportWriteError {
            path: path.display().to_string(),
            message,
        },
        other => other,
    })?;
    write_atomically(path, &bytes)?;
    debug!(path = %path.display(), rows = rows.len(), "Spreadsheet report written");
    Ok(())
}

fn build_workbook(rows: &[ReportRow]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let money_format = Format::new().set_num_format(MONEY_NUMBER_FORMAT);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(REPORT_SHEET_NAME)?;

    for (col, header) in ReportRow::COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let r = (index + 1) as u32;
        match &row.employee_code {
            EmployeeCode::Numeric(code) => worksheet.write_number(r, 0, *code as f64)?,
            EmployeeCode::Text(code) => worksheet.write_string(r, 0, code.as_str())?,
        };
        worksheet.write_number(r, 1, f64::from(row.year))?;
        worksheet.write_string(r, 2, row.quarter.label())?;

        let money = [
            row.total_ote,
            row.total_super_payable,
            row.total_disbursed,
            row.variance,
        ];
        for (offset, value) in money.into_iter().enumerate() {
            worksheet.write_number_with_format(r, 3 + offset as u16, to_f64(value), &money_format)?;
        }
    }

    worksheet.autofit();
    Ok(workbook)
}

/// Converts a report amount for the spreadsheet. Rounded amounts are always
/// within `f64` range.
fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
