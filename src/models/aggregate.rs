//! Aggregated row models.
//!
//! This module contains the per-[`QuarterKey`] totals produced by the two
//! aggregators, the joined [`VarianceRow`], and the flat [`ReportRow`] that
//! makes up the published metrics table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EmployeeCode, Quarter, QuarterKey};

/// Ordinary time earnings and super payable for one quarter bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OteAggregate {
    /// The bucket.
    pub key: QuarterKey,
    /// Sum of OTE line amounts.
    pub total_ote: Decimal,
    /// Sum of per-line super payable.
    pub total_super_payable: Decimal,
}

/// Superannuation actually disbursed for one quarter bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisbursedAggregate {
    /// The bucket.
    pub key: QuarterKey,
    /// Sum of disbursement amounts.
    pub total_disbursed: Decimal,
}

/// One row of the payable-versus-disbursed join.
///
/// A side with no data for the key is zero, never absent, so
/// `variance == total_super_payable - total_disbursed` holds for every row.
///
/// # Example
///
/// ```
/// use super_variance::models::{EmployeeCode, Quarter, QuarterKey, VarianceRow};
/// use rust_decimal::Decimal;
///
/// let row = VarianceRow::new(
///     QuarterKey::new(EmployeeCode::Text("E1".to_string()), 2023, Quarter::Q1),
///     Decimal::new(1000, 0),
///     Decimal::new(95, 0),
///     Decimal::new(100, 0),
/// );
/// assert_eq!(row.variance, Decimal::new(-5, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceRow {
    /// The bucket.
    pub key: QuarterKey,
    /// Total ordinary time earnings.
    pub total_ote: Decimal,
    /// Total super payable.
    pub total_super_payable: Decimal,
    /// Total super disbursed.
    pub total_disbursed: Decimal,
    /// Payable minus disbursed. Positive means under-paid.
    pub variance: Decimal,
}

impl VarianceRow {
    /// Builds a row, computing the variance from the two sides.
    pub fn new(
        key: QuarterKey,
        total_ote: Decimal,
        total_super_payable: Decimal,
        total_disbursed: Decimal,
    ) -> Self {
        Self {
            key,
            total_ote,
            total_super_payable,
            total_disbursed,
            variance: total_super_payable - total_disbursed,
        }
    }
}

/// A row of the published metrics table.
///
/// Field order is the column order of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// The employee.
    pub employee_code: EmployeeCode,
    /// The year of the bucket.
    pub year: i32,
    /// The quarter of the bucket.
    pub quarter: Quarter,
    /// Total ordinary time earnings, rounded.
    pub total_ote: Decimal,
    /// Total super payable, rounded.
    pub total_super_payable: Decimal,
    /// Total super disbursed, rounded.
    pub total_disbursed: Decimal,
    /// Payable minus disbursed, rounded.
    pub variance: Decimal,
}

impl ReportRow {
    /// The report column headers, in order.
    pub const COLUMNS: [&'static str; 7] = [
        "employee_code",
        "year",
        "quarter",
        "total_ote",
        "total_super_payable",
        "total_disbursed",
        "variance",
    ];

    /// Returns the bucket this row reports on.
    pub fn key(&self) -> QuarterKey {
        QuarterKey::new(self.employee_code.clone(), self.year, self.quarter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn key() -> QuarterKey {
        QuarterKey::new(EmployeeCode::Numeric(1115), 2023, Quarter::Q2)
    }

    #[test]
    fn test_variance_is_payable_minus_disbursed() {
        let row = VarianceRow::new(key(), dec("1500"), dec("142.5"), dec("0"));
        assert_eq!(row.variance, dec("142.5"));
    }

    #[test]
    fn test_overpayment_gives_negative_variance() {
        let row = VarianceRow::new(key(), dec("0"), dec("0"), dec("200"));
        assert_eq!(row.variance, dec("-200"));
    }

    #[test]
    fn test_report_row_serializes_columns_in_order() {
        let row = ReportRow {
            employee_code: EmployeeCode::Numeric(1115),
            year: 2023,
            quarter: Quarter::Q2,
            total_ote: dec("1500.00"),
            total_super_payable: dec("142.50"),
            total_disbursed: dec("0.00"),
            variance: dec("142.50"),
        };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"employee_code":1115,"year":2023,"quarter":"Q2","total_ote":"1500.00","total_super_payable":"142.50","total_disbursed":"0.00","variance":"142.50"}"#
        );
    }

    #[test]
    fn test_report_row_key() {
        let row = ReportRow {
            employee_code: EmployeeCode::Numeric(1115),
            year: 2023,
            quarter: Quarter::Q2,
            total_ote: Decimal::ZERO,
            total_super_payable: Decimal::ZERO,
            total_disbursed: Decimal::ZERO,
            variance: Decimal::ZERO,
        };
        assert_eq!(row.key(), key());
    }
}
