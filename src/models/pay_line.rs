//! Payslip line and pay-code reference models.
//!
//! This module contains the [`PayLine`] rows read from the payslips table and
//! the [`PayCode`] reference rows that decide which lines are ordinary time
//! earnings.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EmployeeCode;

/// How a pay code is treated for superannuation purposes.
///
/// Only the exact value `"OTE"` marks ordinary time earnings; every other
/// value (including differently-cased spellings) is carried as-is in
/// [`OteTreatment::Other`].
///
/// # Example
///
/// ```
/// use super_variance::models::OteTreatment;
///
/// assert_eq!(OteTreatment::from("OTE".to_string()), OteTreatment::Ote);
/// assert!(!OteTreatment::from("Not OTE".to_string()).is_ote());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OteTreatment {
    /// The pay code counts towards ordinary time earnings.
    Ote,
    /// Any other treatment, kept verbatim.
    Other(String),
}

impl OteTreatment {
    /// The reference-table value that marks ordinary time earnings.
    pub const OTE_VALUE: &'static str = "OTE";

    /// Returns true if the pay code counts towards ordinary time earnings.
    pub fn is_ote(&self) -> bool {
        matches!(self, OteTreatment::Ote)
    }
}

impl From<String> for OteTreatment {
    fn from(value: String) -> Self {
        if value == Self::OTE_VALUE {
            OteTreatment::Ote
        } else {
            OteTreatment::Other(value)
        }
    }
}

impl From<OteTreatment> for String {
    fn from(treatment: OteTreatment) -> Self {
        match treatment {
            OteTreatment::Ote => OteTreatment::OTE_VALUE.to_string(),
            OteTreatment::Other(value) => value,
        }
    }
}

impl fmt::Display for OteTreatment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OteTreatment::Ote => f.write_str(Self::OTE_VALUE),
            OteTreatment::Other(value) => f.write_str(value),
        }
    }
}

/// A row of the pay-codes reference table.
///
/// The reference export spells the treatment column `ote_treament`; that is
/// the serialized name, with the correct spelling accepted as an alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayCode {
    /// The pay-code identifier matched against [`PayLine::code`].
    pub pay_code: String,
    /// Whether lines with this code are ordinary time earnings.
    #[serde(rename = "ote_treament", alias = "ote_treatment")]
    pub ote_treatment: OteTreatment,
}

/// A single payslip line.
///
/// # Example
///
/// ```
/// use super_variance::models::{EmployeeCode, PayLine};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let line = PayLine {
///     employee_code: EmployeeCode::Text("E1".to_string()),
///     code: "C1".to_string(),
///     amount: Decimal::new(1000, 0),
///     end: NaiveDate::from_ymd_opt(2023, 1, 30).unwrap(),
/// };
/// assert_eq!(line.code, "C1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayLine {
    /// The employee who was paid.
    pub employee_code: EmployeeCode,
    /// The pay code of the line.
    pub code: String,
    /// The gross amount of the line.
    pub amount: Decimal,
    /// The last day of the pay period the line belongs to.
    pub end: NaiveDate,
}
