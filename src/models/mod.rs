//! Core data models for the variance engine.
//!
//! This module contains the input rows, aggregation keys, aggregated rows and
//! audit records used throughout the engine.

mod aggregate;
mod audit;
mod disbursement;
mod employee_code;
mod pay_line;
mod quarter;

pub use aggregate::{DisbursedAggregate, OteAggregate, ReportRow, VarianceRow};
pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use disbursement::Disbursement;
pub use employee_code::EmployeeCode;
pub use pay_line::{OteTreatment, PayCode, PayLine};
pub use quarter::{Quarter, QuarterKey};
