//! Payable-versus-disbursed variance join.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{DisbursedAggregate, OteAggregate, QuarterKey, VarianceRow};

#[derive(Default)]
struct Sides {
    total_ote: Decimal,
    total_super_payable: Decimal,
    total_disbursed: Decimal,
}

/// Full-outer-joins the OTE and disbursement aggregates on [`QuarterKey`].
///
/// A key present on only one side gets zero for the other side's totals, so
/// an employee with super payable but nothing disbursed (or the reverse) is a
/// report row with a non-zero variance. Rows are returned in key order.
///
/// # Example
///
/// ```
/// use super_variance::calculation::join_variance;
/// use super_variance::models::{EmployeeCode, OteAggregate, Quarter, QuarterKey};
/// use rust_decimal::Decimal;
///
/// let ote = vec![OteAggregate {
///     key: QuarterKey::new(EmployeeCode::Text("E1".to_string()), 2023, Quarter::Q2),
///     total_ote: Decimal::new(1500, 0),
///     total_super_payable: Decimal::new(1425, 1),
/// }];
///
/// let rows = join_variance(&ote, &[]);
/// assert_eq!(rows[0].total_disbursed, Decimal::ZERO);
/// assert_eq!(rows[0].variance, Decimal::new(1425, 1));
/// ```
pub fn join_variance(ote: &[OteAggregate], disbursed: &[DisbursedAggregate]) -> Vec<VarianceRow> {
    let mut joined: BTreeMap<&QuarterKey, Sides> = BTreeMap::new();

    for row in ote {
        let sides = joined.entry(&row.key).or_default();
        sides.total_ote += row.total_ote;
        sides.total_super_payable += row.total_super_payable;
    }
    for row in disbursed {
        joined.entry(&row.key).or_default().total_disbursed += row.total_disbursed;
    }

    joined
        .into_iter()
        .map(|(key, sides)| {
            VarianceRow::new(
                key.clone(),
                sides.total_ote,
                sides.total_super_payable,
                sides.total_disbursed,
            )
        })
        .collect()
}
