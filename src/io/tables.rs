//! CSV table readers.
//!
//! This module reads the three extracted input tables into typed rows. Column
//! lookup is by header name, so column order and extra columns do not matter.
//! Any unparseable date or amount aborts the read with the table, row and
//! field it was found in.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use rust_decimal::Decimal;

use crate::error::{VarianceError, VarianceResult};
use crate::models::{Disbursement, EmployeeCode, OteTreatment, PayCode, PayLine};

/// Name of the payslips table (and its workbook sheet).
pub const PAYSLIPS_TABLE: &str = "Payslips";
/// Name of the pay-codes table (and its workbook sheet).
pub const PAY_CODES_TABLE: &str = "PayCodes";
/// Name of the disbursements table (and its workbook sheet).
pub const DISBURSEMENTS_TABLE: &str = "Disbursements";

/// Format of payslip `end` dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Format of disbursement `payment_made` date-times.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A table read into memory with its headers.
struct Table {
    name: &'static str,
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl Table {
    fn read<R: Read>(name: &'static str, reader: R) -> VarianceResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let records = csv_reader.records().collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name,
            headers,
            records,
        })
    }

    /// Returns the index of the first header matching any of `names`.
    fn column(&self, names: &[&str]) -> VarianceResult<usize> {
        names
            .iter()
            .find_map(|name| self.headers.iter().position(|h| h == *name))
            .ok_or_else(|| VarianceError::MissingColumn {
                table: self.name.to_string(),
                column: names[0].to_string(),
            })
    }

    /// Iterates over (one-based row number, record).
    fn rows(&self) -> impl Iterator<Item = (usize, &StringRecord)> {
        self.records.iter().enumerate().map(|(i, r)| (i + 1, r))
    }
}

/// A cell lookup with the context needed for error messages.
struct Cell<'a> {
    table: &'static str,
    row: usize,
    field: &'static str,
    value: &'a str,
}

impl<'a> Cell<'a> {
    fn new(table: &Table, row: usize, record: &'a StringRecord, index: usize, field: &'static str) -> Self {
        Self {
            table: table.name,
            row,
            field,
            value: record.get(index).unwrap_or(""),
        }
    }

    fn text(&self) -> String {
        self.value.to_string()
    }

    fn employee_code(&self) -> EmployeeCode {
        EmployeeCode::parse(self.value)
    }

    fn amount(&self) -> VarianceResult<Decimal> {
        Decimal::from_str(self.value).map_err(|_| VarianceError::InvalidAmount {
            table: self.table.to_string(),
            row: self.row,
            field: self.field.to_string(),
            value: self.value.to_string(),
        })
    }

    fn invalid_date(&self) -> VarianceError {
        VarianceError::InvalidDate {
            table: self.table.to_string(),
            row: self.row,
            field: self.field.to_string(),
            value: self.value.to_string(),
        }
    }

    /// Parses a calendar date. A full date-time is accepted and reduced to its
    /// date, since spreadsheet date cells extract with a time component.
    fn date(&self) -> VarianceResult<NaiveDate> {
        NaiveDate::parse_from_str(self.value, DATE_FORMAT)
            .or_else(|_| {
                NaiveDateTime::parse_from_str(self.value, DATE_TIME_FORMAT).map(|dt| dt.date())
            })
            .map_err(|_| self.invalid_date())
    }

    fn date_time(&self) -> VarianceResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(self.value, DATE_TIME_FORMAT).map_err(|_| self.invalid_date())
    }
}

/// Parses the payslips table from CSV text.
pub fn parse_pay_lines<R: Read>(reader: R) -> VarianceResult<Vec<PayLine>> {
    let table = Table::read(PAYSLIPS_TABLE, reader)?;
    let employee_col = table.column(&["employee_code"])?;
    let code_col = table.column(&["code"])?;
    let amount_col = table.column(&["amount"])?;
    let end_col = table.column(&["end"])?;

    table
        .rows()
        .map(|(row, record)| {
            Ok(PayLine {
                employee_code: Cell::new(&table, row, record, employee_col, "employee_code")
                    .employee_code(),
                code: Cell::new(&table, row, record, code_col, "code").text(),
                amount: Cell::new(&table, row, record, amount_col, "amount").amount()?,
                end: Cell::new(&table, row, record, end_col, "end").date()?,
            })
        })
        .collect()
}

/// Parses the pay-codes table from CSV text.
///
/// The treatment column is looked up as `ote_treament` (the spelling used by
/// the source export) and then `ote_treatment`.
pub fn parse_pay_codes<R: Read>(reader: R) -> VarianceResult<Vec<PayCode>> {
    let table = Table::read(PAY_CODES_TABLE, reader)?;
    let code_col = table.column(&["pay_code"])?;
    let treatment_col = table.column(&["ote_treament", "ote_treatment"])?;

    Ok(table
        .rows()
        .map(|(row, record)| PayCode {
            pay_code: Cell::new(&table, row, record, code_col, "pay_code").text(),
            ote_treatment: OteTreatment::from(
                Cell::new(&table, row, record, treatment_col, "ote_treament").text(),
            ),
        })
        .collect())
}

/// Parses the disbursements table from CSV text.
pub fn parse_disbursements<R: Read>(reader: R) -> VarianceResult<Vec<Disbursement>> {
    let table = Table::read(DISBURSEMENTS_TABLE, reader)?;
    let employee_col = table.column(&["employee_code"])?;
    let paid_col = table.column(&["payment_made"])?;
    let amount_col = table.column(&["sgc_amount"])?;

    table
        .rows()
        .map(|(row, record)| {
            Ok(Disbursement {
                employee_code: Cell::new(&table, row, record, employee_col, "employee_code")
                    .employee_code(),
                payment_made: Cell::new(&table, row, record, paid_col, "payment_made")
                    .date_time()?,
                sgc_amount: Cell::new(&table, row, record, amount_col, "sgc_amount").amount()?,
            })
        })
        .collect()
}

fn open(path: &Path) -> VarianceResult<File> {
    File::open(path).map_err(|e| VarianceError::io(path, e))
}

/// Reads the payslips table from a CSV file.
pub fn read_pay_lines(path: &Path) -> VarianceResult<Vec<PayLine>> {
    parse_pay_lines(open(path)?)
}

/// Reads the pay-codes table from a CSV file.
pub fn read_pay_codes(path: &Path) -> VarianceResult<Vec<PayCode>> {
    parse_pay_codes(open(path)?)
}

/// Reads the disbursements table from a CSV file.
pub fn read_disbursements(path: &Path) -> VarianceResult<Vec<Disbursement>> {
    parse_disbursements(open(path)?)
}
