//! Disbursement aggregation.
//!
//! This module totals superannuation disbursements per employee, offset
//! fiscal year and offset fiscal quarter.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{VarianceError, VarianceResult};
use crate::models::{DisbursedAggregate, Disbursement, Quarter, QuarterKey};

use super::offset_quarter::classify_offset;

/// Totals disbursed super per offset-quarter bucket.
///
/// # Returns
///
/// One row per (employee, fiscal year, quarter) in key order, or
/// `UnclassifiedDisbursement` if any payment date falls in no quarter window.
/// Such a payment is never folded into a neighbouring quarter.
///
/// # Example
///
/// ```
/// use super_variance::calculation::aggregate_disbursements;
/// use super_variance::models::{Disbursement, EmployeeCode, Quarter};
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let disbursements = vec![Disbursement {
///     employee_code: EmployeeCode::Text("E1".to_string()),
///     payment_made: NaiveDateTime::parse_from_str("2023-08-15T00:00:00", "%Y-%m-%dT%H:%M:%S").unwrap(),
///     sgc_amount: Decimal::new(150, 0),
/// }];
///
/// let rows = aggregate_disbursements(&disbursements)?;
/// assert_eq!(rows[0].key.quarter, Quarter::Q3);
/// assert_eq!(rows[0].total_disbursed, Decimal::new(150, 0));
/// # Ok::<(), super_variance::error::VarianceError>(())
/// ```
pub fn aggregate_disbursements(
    disbursements: &[Disbursement],
) -> VarianceResult<Vec<DisbursedAggregate>> {
    aggregate_disbursements_with(disbursements, classify_offset)
}

/// Aggregates with an explicit classifier.
pub(crate) fn aggregate_disbursements_with<F>(
    disbursements: &[Disbursement],
    classify: F,
) -> VarianceResult<Vec<DisbursedAggregate>>
where
    F: Fn(NaiveDateTime) -> Option<(i32, Quarter)>,
{
    let mut buckets: BTreeMap<QuarterKey, Decimal> = BTreeMap::new();

    for disbursement in disbursements {
        let (year, quarter) = classify(disbursement.payment_made).ok_or_else(|| {
            VarianceError::UnclassifiedDisbursement {
                employee_code: disbursement.employee_code.to_string(),
                payment_made: disbursement.payment_made,
            }
        })?;

        let key = QuarterKey::new(disbursement.employee_code.clone(), year, quarter);
        *buckets.entry(key).or_insert(Decimal::ZERO) += disbursement.sgc_amount;
    }

    debug!(
        disbursements = disbursements.len(),
        buckets = buckets.len(),
        "Disbursements aggregated"
    );

    Ok(buckets
        .into_iter()
        .map(|(key, total_disbursed)| DisbursedAggregate {
            key,
            total_disbursed,
        })
        .collect())
}
