//! Calculation logic for the variance engine.
//!
//! This module contains every pure stage of a variance run: the two quarter
//! classifiers (calendar quarters for pay periods, offset fiscal quarters for
//! disbursements), OTE aggregation with the pay-code join, disbursement
//! aggregation, the payable-versus-disbursed variance join and report
//! refinement.

mod disbursement_aggregation;
mod offset_quarter;
mod ote_aggregation;
mod report;
mod seasonal_quarter;
mod variance;

pub use disbursement_aggregation::aggregate_disbursements;
pub use offset_quarter::{
    FISCAL_YEAR_START_DAY, OFFSET_QUARTER_WINDOWS, QuarterWindow, classify_offset,
    offset_fiscal_year, offset_quarter, offset_quarter_in,
};
pub use ote_aggregation::{OteAggregation, PayCodeJoin, aggregate_ote, join_pay_codes};
pub use report::{MONETARY_DECIMAL_PLACES, refine_report, round_money};
pub use seasonal_quarter::{seasonal_quarter, seasonal_year};
pub use variance::join_variance;
