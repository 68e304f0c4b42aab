//! Ordinary-time-earnings aggregation.
//!
//! This module joins payslip lines to the pay-code reference table, keeps the
//! lines whose code is treated as OTE, computes the super payable on each and
//! totals both per employee, calendar year and calendar quarter.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{OteAggregate, OteTreatment, PayCode, PayLine, QuarterKey};

use super::seasonal_quarter::{seasonal_quarter, seasonal_year};

/// The result of joining payslip lines to the pay-code table.
#[derive(Debug, Clone)]
pub struct PayCodeJoin<'a> {
    /// Each line paired with the treatment of a matching pay code. A line
    /// whose code appears more than once in the reference table appears once
    /// per match.
    pub matched: Vec<(&'a PayLine, &'a OteTreatment)>,
    /// Number of lines whose code is absent from the reference table.
    pub unmatched_count: usize,
}

/// Inner-joins payslip lines to pay codes on `PayLine::code == PayCode::pay_code`.
///
/// Lines with no matching pay code are dropped and counted, not reported as
/// errors.
///
/// # Example
///
/// ```
/// use super_variance::calculation::join_pay_codes;
/// use super_variance::models::{EmployeeCode, OteTreatment, PayCode, PayLine};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let lines = vec![
///     PayLine {
///         employee_code: EmployeeCode::Text("E1".to_string()),
///         code: "C1".to_string(),
///         amount: Decimal::new(1000, 0),
///         end: NaiveDate::from_ymd_opt(2023, 1, 30).unwrap(),
///     },
///     PayLine {
///         employee_code: EmployeeCode::Text("E1".to_string()),
///         code: "C9".to_string(),
///         amount: Decimal::new(50, 0),
///         end: NaiveDate::from_ymd_opt(2023, 1, 30).unwrap(),
///     },
/// ];
/// let codes = vec![PayCode { pay_code: "C1".to_string(), ote_treatment: OteTreatment::Ote }];
///
/// let join = join_pay_codes(&lines, &codes);
/// assert_eq!(join.matched.len(), 1);
/// assert_eq!(join.unmatched_count, 1);
/// ```
pub fn join_pay_codes<'a>(pay_lines: &'a [PayLine], pay_codes: &'a [PayCode]) -> PayCodeJoin<'a> {
    let mut by_code: HashMap<&str, Vec<&OteTreatment>> = HashMap::new();
    for pay_code in pay_codes {
        by_code
            .entry(pay_code.pay_code.as_str())
            .or_default()
            .push(&pay_code.ote_treatment);
    }

    let mut matched = Vec::with_capacity(pay_lines.len());
    let mut unmatched_count = 0;

    for line in pay_lines {
        match by_code.get(line.code.as_str()) {
            Some(treatments) => matched.extend(treatments.iter().map(|t| (line, *t))),
            None => unmatched_count += 1,
        }
    }

    PayCodeJoin {
        matched,
        unmatched_count,
    }
}

/// The result of aggregating OTE, including the rows dropped along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OteAggregation {
    /// One row per (employee, year, quarter), in key order.
    pub rows: Vec<OteAggregate>,
    /// Lines dropped because their pay code is not in the reference table.
    pub unmatched_pay_lines: usize,
    /// Joined lines dropped because their pay code is not OTE.
    pub non_ote_lines: usize,
    /// Joined OTE lines that contributed to `rows`.
    pub ote_lines: usize,
}

/// Totals ordinary time earnings and super payable per quarter bucket.
///
/// Each OTE line contributes `amount` to `total_ote` and
/// `amount * ote_super_rate` to `total_super_payable`; both sums are exact.
/// Lines are bucketed by the calendar quarter and year of their `end` date.
///
/// # Arguments
///
/// * `pay_lines` - The payslip lines
/// * `pay_codes` - The pay-code reference table
/// * `ote_super_rate` - Fraction of OTE payable as super
///
/// # Example
///
/// ```
/// use super_variance::calculation::aggregate_ote;
/// use super_variance::config::DEFAULT_OTE_SUPER_RATE;
/// use super_variance::models::{EmployeeCode, OteTreatment, PayCode, PayLine, Quarter};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let lines = vec![PayLine {
///     employee_code: EmployeeCode::Text("E1".to_string()),
///     code: "C1".to_string(),
///     amount: Decimal::new(1000, 0),
///     end: NaiveDate::from_ymd_opt(2023, 1, 30).unwrap(),
/// }];
/// let codes = vec![PayCode { pay_code: "C1".to_string(), ote_treatment: OteTreatment::Ote }];
///
/// let result = aggregate_ote(&lines, &codes, DEFAULT_OTE_SUPER_RATE);
/// assert_eq!(result.rows.len(), 1);
/// assert_eq!(result.rows[0].key.quarter, Quarter::Q1);
/// assert_eq!(result.rows[0].total_super_payable, Decimal::new(95, 0));
/// ```
pub fn aggregate_ote(
    pay_lines: &[PayLine],
    pay_codes: &[PayCode],
    ote_super_rate: Decimal,
) -> OteAggregation {
    let join = join_pay_codes(pay_lines, pay_codes);

    let (ote, non_ote): (Vec<_>, Vec<_>) = join
        .matched
        .iter()
        .partition(|(_, treatment)| treatment.is_ote());

    let mut buckets: BTreeMap<QuarterKey, (Decimal, Decimal)> = BTreeMap::new();
    for (line, _) in &ote {
        let key = QuarterKey::new(
            line.employee_code.clone(),
            seasonal_year(line.end),
            seasonal_quarter(line.end),
        );
        let super_payable = line.amount * ote_super_rate;
        let totals = buckets.entry(key).or_insert((Decimal::ZERO, Decimal::ZERO));
        totals.0 += line.amount;
        totals.1 += super_payable;
    }

    if join.unmatched_count > 0 {
        warn!(
            unmatched_pay_lines = join.unmatched_count,
            "Pay lines dropped: pay code not in reference table"
        );
    }
    debug!(
        pay_lines = pay_lines.len(),
        ote_lines = ote.len(),
        non_ote_lines = non_ote.len(),
        buckets = buckets.len(),
        "OTE aggregated"
    );

    let rows = buckets
        .into_iter()
        .map(|(key, (total_ote, total_super_payable))| OteAggregate {
            key,
            total_ote,
            total_super_payable,
        })
        .collect();

    OteAggregation {
        rows,
        unmatched_pay_lines: join.unmatched_count,
        non_ote_lines: non_ote.len(),
        ote_lines: ote.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    use crate::config::DEFAULT_OTE_SUPER_RATE;
    use crate::models::{EmployeeCode, Quarter};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn line(employee: &str, code: &str, amount: &str, end: &str) -> PayLine {
        PayLine {
            employee_code: EmployeeCode::parse(employee),
            code: code.to_string(),
            amount: dec(amount),
            end: NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap(),
        }
    }

    fn pay_code(code: &str, treatment: &str) -> PayCode {
        PayCode {
            pay_code: code.to_string(),
            ote_treatment: OteTreatment::from(treatment.to_string()),
        }
    }

    fn sample_lines() -> Vec<PayLine> {
        vec![
            line("E1", "C1", "1000", "2023-01-30"),
            line("E2", "C2", "2000", "2023-04-30"),
            line("E1", "C1", "1500", "2023-05-23"),
        ]
    }

    fn sample_codes() -> Vec<PayCode> {
        vec![pay_code("C1", "OTE"), pay_code("C2", "NON-OTE")]
    }

    /// OTE-001: non-OTE codes are excluded
    #[test]
    fn test_excludes_non_ote_lines() {
        let result = aggregate_ote(&sample_lines(), &sample_codes(), DEFAULT_OTE_SUPER_RATE);

        assert_eq!(result.rows.len(), 2);
        assert!(result
            .rows
            .iter()
            .all(|r| r.key.employee_code == EmployeeCode::parse("E1")));
        assert_eq!(result.non_ote_lines, 1);
        assert_eq!(result.ote_lines, 2);
        assert_eq!(result.unmatched_pay_lines, 0);
    }

    /// OTE-002: totals per calendar quarter
    #[test]
    fn test_totals_per_quarter() {
        let result = aggregate_ote(&sample_lines(), &sample_codes(), DEFAULT_OTE_SUPER_RATE);

        let q1 = &result.rows[0];
        assert_eq!(q1.key.year, 2023);
        assert_eq!(q1.key.quarter, Quarter::Q1);
        assert_eq!(q1.total_ote, dec("1000"));
        assert_eq!(q1.total_super_payable, dec("95"));

        let q2 = &result.rows[1];
        assert_eq!(q2.key.quarter, Quarter::Q2);
        assert_eq!(q2.total_ote, dec("1500"));
        assert_eq!(q2.total_super_payable, dec("142.5"));
    }

    /// OTE-003: payable equals total OTE times the rate, exactly
    #[test]
    fn test_super_payable_is_exact_rate_of_total() {
        let lines = vec![
            line("E1", "C1", "1234.57", "2023-02-01"),
            line("E1", "C1", "0.01", "2023-02-14"),
            line("E1", "C1", "987.65", "2023-03-31"),
        ];
        let result = aggregate_ote(&lines, &sample_codes(), DEFAULT_OTE_SUPER_RATE);

        assert_eq!(result.rows.len(), 1);
        let row = &result.rows[0];
        assert_eq!(row.total_ote, dec("2222.23"));
        assert_eq!(row.total_super_payable, row.total_ote * DEFAULT_OTE_SUPER_RATE);
    }

    /// OTE-004: unmatched pay codes are dropped and counted
    #[test]
    fn test_unmatched_codes_are_counted() {
        let lines = vec![
            line("E1", "C1", "100", "2023-01-15"),
            line("E1", "UNKNOWN", "100", "2023-01-15"),
            line("E2", "UNKNOWN", "100", "2023-01-15"),
        ];
        let result = aggregate_ote(&lines, &sample_codes(), DEFAULT_OTE_SUPER_RATE);

        assert_eq!(result.unmatched_pay_lines, 2);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].total_ote, dec("100"));
    }

    #[test]
    fn test_injected_rate_is_used() {
        let lines = vec![line("E1", "C1", "1000", "2023-07-01")];
        let result = aggregate_ote(&lines, &sample_codes(), dec("0.11"));
        assert_eq!(result.rows[0].total_super_payable, dec("110"));
    }

    #[test]
    fn test_only_non_ote_pay_gives_no_rows() {
        let lines = vec![line("E2", "C2", "2000", "2023-04-30")];
        let result = aggregate_ote(&lines, &sample_codes(), DEFAULT_OTE_SUPER_RATE);
        assert!(result.rows.is_empty());
        assert_eq!(result.non_ote_lines, 1);
    }

    #[test]
    fn test_same_quarter_different_years_are_separate() {
        let lines = vec![
            line("E1", "C1", "100", "2022-02-01"),
            line("E1", "C1", "200", "2023-02-01"),
        ];
        let result = aggregate_ote(&lines, &sample_codes(), DEFAULT_OTE_SUPER_RATE);
        let years: Vec<i32> = result.rows.iter().map(|r| r.key.year).collect();
        assert_eq!(years, vec![2022, 2023]);
    }

    #[test]
    fn test_duplicate_reference_rows_match_each_time() {
        let codes = vec![pay_code("C1", "OTE"), pay_code("C1", "OTE")];
        let lines = vec![line("E1", "C1", "100", "2023-01-15")];

        let join = join_pay_codes(&lines, &codes);
        assert_eq!(join.matched.len(), 2);

        let result = aggregate_ote(&lines, &codes, DEFAULT_OTE_SUPER_RATE);
        assert_eq!(result.rows[0].total_ote, dec("200"));
    }

    #[test]
    fn test_rows_are_in_key_order() {
        let lines = vec![
            line("1118", "C1", "100", "2023-01-15"),
            line("1115", "C1", "100", "2023-08-15"),
            line("1115", "C1", "100", "2023-01-15"),
        ];
        let result = aggregate_ote(&lines, &sample_codes(), DEFAULT_OTE_SUPER_RATE);
        let keys: Vec<String> = result.rows.iter().map(|r| r.key.to_string()).collect();
        assert_eq!(keys, vec!["1115/2023/Q1", "1115/2023/Q3", "1118/2023/Q1"]);
    }

    #[test]
    fn test_empty_inputs() {
        let result = aggregate_ote(&[], &[], DEFAULT_OTE_SUPER_RATE);
        assert!(result.rows.is_empty());
        assert_eq!(result.unmatched_pay_lines, 0);
    }
}
