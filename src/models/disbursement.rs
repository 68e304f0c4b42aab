//! Superannuation disbursement model.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EmployeeCode;

/// A superannuation payment made on an employee's behalf.
///
/// `payment_made` is local civil time as recorded by the payroll system; no
/// timezone conversion is applied anywhere in the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disbursement {
    /// The employee the payment was made for.
    pub employee_code: EmployeeCode,
    /// When the payment was made.
    pub payment_made: NaiveDateTime,
    /// The amount paid.
    pub sgc_amount: Decimal,
}
