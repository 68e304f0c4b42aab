//! File I/O for the variance pipeline.
//!
//! This module covers everything that touches the filesystem: extracting
//! the source workbook's sheets to CSV, reading those CSV tables into typed
//! rows, and publishing the metrics report.

mod atomic;
mod report_writer;
mod tables;
mod workbook;

pub use atomic::{StagedFile, commit_all, stage, write_atomically};
pub use report_writer::{
    REPORT_SHEET_NAME, render_report_csv, render_report_xlsx, write_report_csv, write_report_xlsx,
};
pub use tables::{
    DATE_FORMAT, DATE_TIME_FORMAT, DISBURSEMENTS_TABLE, PAY_CODES_TABLE, PAYSLIPS_TABLE,
    parse_disbursements, parse_pay_codes, parse_pay_lines, read_disbursements, read_pay_codes,
    read_pay_lines,
};
pub use workbook::{ExtractedTables, SOURCE_SHEETS, extract_workbook, sheet_csv_path};
