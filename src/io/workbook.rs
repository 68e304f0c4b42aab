//! Spreadsheet extraction.
//!
//! Reads the `Payslips`, `PayCodes` and `Disbursements` sheets of a source
//! workbook and writes each to its own CSV file. Cells are written as text
//! with no interpretation beyond rendering dates in ISO form, so the CSV
//! readers in [`crate::io::tables`] see exactly what the sheet held.

use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use tracing::{debug, info};

use crate::error::{VarianceError, VarianceResult};

use super::atomic::write_atomically;
use super::tables::{DATE_TIME_FORMAT, DISBURSEMENTS_TABLE, PAY_CODES_TABLE, PAYSLIPS_TABLE};

/// The sheets extracted from every source workbook, in extraction order.
pub const SOURCE_SHEETS: [&str; 3] = [PAYSLIPS_TABLE, PAY_CODES_TABLE, DISBURSEMENTS_TABLE];

/// Paths of the CSV files written by [`extract_workbook`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTables {
    /// `Payslips.csv`.
    pub payslips: PathBuf,
    /// `PayCodes.csv`.
    pub pay_codes: PathBuf,
    /// `Disbursements.csv`.
    pub disbursements: PathBuf,
}

impl ExtractedTables {
    /// Returns the CSV paths extraction writes into `target_directory`.
    pub fn in_directory(target_directory: &Path) -> Self {
        Self {
            payslips: sheet_csv_path(target_directory, PAYSLIPS_TABLE),
            pay_codes: sheet_csv_path(target_directory, PAY_CODES_TABLE),
            disbursements: sheet_csv_path(target_directory, DISBURSEMENTS_TABLE),
        }
    }

    /// All three paths, in [`SOURCE_SHEETS`] order.
    pub fn paths(&self) -> Vec<PathBuf> {
        vec![
            self.payslips.clone(),
            self.pay_codes.clone(),
            self.disbursements.clone(),
        ]
    }
}

/// Returns `<target_directory>/<sheet>.csv`.
pub fn sheet_csv_path(target_directory: &Path, sheet: &str) -> PathBuf {
    target_directory.join(format!("{sheet}.csv"))
}

/// Extracts the three source sheets of a workbook to CSV.
///
/// The target directory is created if needed. All sheets are read before any
/// file is written, so a workbook missing a sheet leaves no partial output.
///
/// # Arguments
///
/// * `source_file` - Path to an `.xlsx`, `.xls` or `.ods` workbook
/// * `target_directory` - Directory to write `<sheet>.csv` files into
///
/// # Returns
///
/// The paths written, or `WorkbookError` if the workbook cannot be opened, a
/// sheet is missing, or a cell holds a spreadsheet error value.
pub fn extract_workbook(
    source_file: &Path,
    target_directory: &Path,
) -> VarianceResult<ExtractedTables> {
    let workbook_error = |message: String| VarianceError::WorkbookError {
        path: source_file.display().to_string(),
        message,
    };

    let mut workbook =
        open_workbook_auto(source_file).map_err(|e| workbook_error(e.to_string()))?;
    let available = workbook.sheet_names();

    let mut rendered = Vec::with_capacity(SOURCE_SHEETS.len());
    for sheet in SOURCE_SHEETS {
        if !available.iter().any(|name| name == sheet) {
            return Err(workbook_error(format!("missing sheet '{sheet}'")));
        }
        let range = workbook
            .worksheet_range(sheet)
            .map_err(|e| workbook_error(format!("sheet '{sheet}': {e}")))?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        let mut rows = 0usize;
        for (row_index, row) in range.rows().enumerate() {
            if row.iter().all(|cell| matches!(cell, Data::Empty)) {
                continue;
            }
            let fields = row
                .iter()
                .enumerate()
                .map(|(col_index, cell)| {
                    cell_text(cell).ok_or_else(|| {
                        workbook_error(format!(
                            "sheet '{sheet}' cell ({}, {}) holds error value {cell}",
                            row_index + 1,
                            col_index + 1
                        ))
                    })
                })
                .collect::<VarianceResult<Vec<String>>>()?;
            writer.write_record(&fields)?;
            rows += 1;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| workbook_error(format!("sheet '{sheet}': {}", e.error())))?;

        debug!(sheet, rows, "Sheet read");
        rendered.push((sheet, bytes));
    }

    let tables = ExtractedTables::in_directory(target_directory);
    for (sheet, bytes) in rendered {
        write_atomically(&sheet_csv_path(target_directory, sheet), &bytes)?;
    }

    info!(
        source = %source_file.display(),
        target = %target_directory.display(),
        "Workbook extracted"
    );
    Ok(tables)
}

/// Renders a cell as CSV text. Returns `None` for spreadsheet error cells.
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => value.format(DATE_TIME_FORMAT).to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::Error(_) => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    fn write_source(path: &Path, sheets: &[&str]) {
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        for sheet in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(*sheet).unwrap();
            match *sheet {
                "Payslips" => {
                    for (col, header) in ["employee_code", "code", "amount", "end"].iter().enumerate() {
                        worksheet.write_string(0, col as u16, *header).unwrap();
                    }
                    worksheet.write_number(1, 0, 1115.0).unwrap();
                    worksheet.write_string(1, 1, "C1").unwrap();
                    worksheet.write_number(1, 2, 1000.5).unwrap();
                    let end = ExcelDateTime::from_ymd(2023, 1, 30).unwrap();
                    worksheet.write_datetime_with_format(1, 3, &end, &date_format).unwrap();
                }
                "PayCodes" => {
                    worksheet.write_string(0, 0, "pay_code").unwrap();
                    worksheet.write_string(0, 1, "ote_treament").unwrap();
                    worksheet.write_string(1, 0, "C1").unwrap();
                    worksheet.write_string(1, 1, "OTE").unwrap();
                }
                _ => {
                    worksheet.write_string(0, 0, "employee_code").unwrap();
                    worksheet.write_string(0, 1, "payment_made").unwrap();
                    worksheet.write_string(0, 2, "sgc_amount").unwrap();
                }
            }
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_extracts_all_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.xlsx");
        write_source(&source, &SOURCE_SHEETS);

        let target = dir.path().join("extracted");
        let tables = extract_workbook(&source, &target).unwrap();

        for path in tables.paths() {
            assert!(path.exists(), "{} should exist", path.display());
        }
        let payslips = std::fs::read_to_string(&tables.payslips).unwrap();
        assert_eq!(
            payslips,
            "employee_code,code,amount,end\n1115,C1,1000.5,2023-01-30T00:00:00\n"
        );
        let disbursements = std::fs::read_to_string(&tables.disbursements).unwrap();
        assert_eq!(disbursements, "employee_code,payment_made,sgc_amount\n");
    }

    #[test]
    fn test_missing_sheet_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.xlsx");
        write_source(&source, &["Payslips", "PayCodes"]);

        let target = dir.path().join("extracted");
        match extract_workbook(&source, &target) {
            Err(VarianceError::WorkbookError { message, .. }) => {
                assert!(message.contains("Disbursements"));
            }
            other => panic!("Expected WorkbookError, got {:?}", other),
        }
        assert!(!sheet_csv_path(&target, "Payslips").exists());
    }

    #[test]
    fn test_unreadable_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let result = extract_workbook(&dir.path().join("absent.xlsx"), dir.path());
        assert!(matches!(result, Err(VarianceError::WorkbookError { .. })));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty).unwrap(), "");
        assert_eq!(cell_text(&Data::Int(1118)).unwrap(), "1118");
        assert_eq!(cell_text(&Data::Float(1000.0)).unwrap(), "1000");
        assert_eq!(cell_text(&Data::Float(142.5)).unwrap(), "142.5");
        assert_eq!(cell_text(&Data::String("Not OTE".to_string())).unwrap(), "Not OTE");
        assert!(cell_text(&Data::Error(calamine::CellErrorType::Div0)).is_none());
    }

    #[test]
    fn test_csv_path_layout() {
        let tables = ExtractedTables::in_directory(Path::new("data/extracted"));
        assert_eq!(tables.pay_codes, PathBuf::from("data/extracted/PayCodes.csv"));
    }
}
