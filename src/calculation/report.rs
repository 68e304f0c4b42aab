//! Report refinement.
//!
//! This module turns joined variance rows into the published metrics table:
//! flat rows with exactly the report columns, money rounded to cents and a
//! deterministic order.

use rust_decimal::Decimal;

use crate::models::{ReportRow, VarianceRow};

/// Decimal places monetary report columns are rounded to.
pub const MONETARY_DECIMAL_PLACES: u32 = 2;

/// Rounds a monetary value for the report.
///
/// Uses `rust_decimal`'s default rounding, which is round-half-to-even
/// (banker's rounding). The result always carries exactly
/// [`MONETARY_DECIMAL_PLACES`] digits after the point and zero is never
/// negative.
///
/// # Example
///
/// ```
/// use super_variance::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let d = |s: &str| Decimal::from_str(s).unwrap();
/// assert_eq!(round_money(d("1000")).to_string(), "1000.00");
/// assert_eq!(round_money(d("0.125")).to_string(), "0.12");
/// assert_eq!(round_money(d("0.135")).to_string(), "0.14");
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp(MONETARY_DECIMAL_PLACES);
    rounded.rescale(MONETARY_DECIMAL_PLACES);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

/// Projects, rounds and sorts variance rows into report rows.
///
/// Variance is rounded from its unrounded value, not recomputed from the
/// rounded totals. Rows are sorted ascending by (employee, year, quarter).
///
/// # Example
///
/// ```
/// use super_variance::calculation::refine_report;
/// use super_variance::models::{EmployeeCode, Quarter, QuarterKey, VarianceRow};
/// use rust_decimal::Decimal;
///
/// let rows = vec![
///     VarianceRow::new(
///         QuarterKey::new(EmployeeCode::Text("E2".to_string()), 2023, Quarter::Q1),
///         Decimal::ZERO, Decimal::ZERO, Decimal::new(250, 0),
///     ),
///     VarianceRow::new(
///         QuarterKey::new(EmployeeCode::Text("E1".to_string()), 2023, Quarter::Q2),
///         Decimal::new(1500, 0), Decimal::new(1425, 1), Decimal::ZERO,
///     ),
/// ];
///
/// let report = refine_report(&rows);
/// assert_eq!(report[0].employee_code.to_string(), "E1");
/// assert_eq!(report[0].total_super_payable.to_string(), "142.50");
/// assert_eq!(report[1].variance.to_string(), "-250.00");
/// ```
pub fn refine_report(rows: &[VarianceRow]) -> Vec<ReportRow> {
    let mut report: Vec<ReportRow> = rows
        .iter()
        .map(|row| ReportRow {
            employee_code: row.key.employee_code.clone(),
            year: row.key.year,
            quarter: row.key.quarter,
            total_ote: round_money(row.total_ote),
            total_super_payable: round_money(row.total_super_payable),
            total_disbursed: round_money(row.total_disbursed),
            variance: round_money(row.variance),
        })
        .collect();

    report.sort_by(|a, b| {
        (&a.employee_code, a.year, a.quarter).cmp(&(&b.employee_code, b.year, b.quarter))
    });
    report
}
