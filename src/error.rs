//! Error types for the variance engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that aborts a variance run.

use chrono::NaiveDateTime;
use thiserror::Error;

/// The main error type for the variance engine.
///
/// Every error is fatal for the run that raised it: no report file is
/// written once one of these has been returned.
///
/// # Example
///
/// ```
/// use super_variance::error::VarianceError;
///
/// let error = VarianceError::ConfigNotFound {
///     path: "/missing/super.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/super.yaml");
/// ```
#[derive(Debug, Error)]
pub enum VarianceError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value was out of range.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// The source workbook could not be opened or a sheet could not be read.
    #[error("Workbook error in '{path}': {message}")]
    WorkbookError {
        /// Path to the workbook.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// A table is missing a column the pipeline needs.
    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn {
        /// The table name (e.g. "Payslips").
        table: String,
        /// The missing column header.
        column: String,
    },

    /// A date or date-time field could not be parsed.
    #[error("Unparseable date in table '{table}' row {row}, field '{field}': '{value}'")]
    InvalidDate {
        /// The table name.
        table: String,
        /// One-based data row number (header excluded).
        row: usize,
        /// The field that held the value.
        field: String,
        /// The raw text.
        value: String,
    },

    /// A monetary field could not be parsed as a decimal.
    #[error("Unparseable amount in table '{table}' row {row}, field '{field}': '{value}'")]
    InvalidAmount {
        /// The table name.
        table: String,
        /// One-based data row number (header excluded).
        row: usize,
        /// The field that held the value.
        field: String,
        /// The raw text.
        value: String,
    },

    /// A disbursement fell in none of the offset quarter windows.
    #[error("Disbursement for employee '{employee_code}' at {payment_made} matches no fiscal quarter")]
    UnclassifiedDisbursement {
        /// The employee the disbursement was made for.
        employee_code: String,
        /// When the payment was made.
        payment_made: NaiveDateTime,
    },

    /// A filesystem operation failed.
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// The path being accessed.
        path: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A CSV table could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The report could not be written.
    #[error("Failed to write report '{path}': {message}")]
    ReportWriteError {
        /// The report path.
        path: String,
        /// A description of the failure.
        message: String,
    },
}

impl VarianceError {
    /// Builds an [`VarianceError::Io`] for the given path.
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

/// A type alias for Results that return VarianceError.
pub type VarianceResult<T> = Result<T, VarianceError>;
