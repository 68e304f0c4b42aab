//! The in-memory metrics computation.
//!
//! Runs the pure stages in order over already-parsed tables and records one
//! audit step per stage. Nothing here touches the filesystem.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;

use crate::calculation::{aggregate_disbursements, aggregate_ote, join_variance, refine_report};
use crate::error::VarianceResult;
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, Disbursement, PayCode, PayLine, QuarterKey, ReportRow,
};

/// Warning code raised when pay lines are dropped by the pay-code join.
pub const UNMATCHED_PAY_CODE: &str = "UNMATCHED_PAY_CODE";

/// Computes the variance report from the three input tables.
///
/// # Arguments
///
/// * `pay_lines` - Payslip lines
/// * `pay_codes` - Pay-code reference table
/// * `disbursements` - Super disbursements
/// * `ote_super_rate` - Rate applied to each OTE line
/// * `trace` - Audit trace the stages are recorded into
///
/// # Returns
///
/// The sorted, rounded report rows, or the first fatal error. Pay lines with
/// no matching pay code are dropped and raise an [`UNMATCHED_PAY_CODE`]
/// warning instead of failing the run.
///
/// # Example
///
/// ```
/// use super_variance::config::DEFAULT_OTE_SUPER_RATE;
/// use super_variance::models::AuditTrace;
/// use super_variance::pipeline::calculate_metrics;
/// use uuid::Uuid;
///
/// let mut trace = AuditTrace::start(Uuid::new_v4());
/// let rows = calculate_metrics(&[], &[], &[], DEFAULT_OTE_SUPER_RATE, &mut trace)?;
/// assert!(rows.is_empty());
/// assert_eq!(trace.steps.len(), 4);
/// # Ok::<(), super_variance::error::VarianceError>(())
/// ```
pub fn calculate_metrics(
    pay_lines: &[PayLine],
    pay_codes: &[PayCode],
    disbursements: &[Disbursement],
    ote_super_rate: Decimal,
    trace: &mut AuditTrace,
) -> VarianceResult<Vec<ReportRow>> {
    let run_id = trace.run_id;

    let ote = aggregate_ote(pay_lines, pay_codes, ote_super_rate);
    trace.record(AuditStep {
        step_number: trace.next_step_number(),
        stage_id: "ote_aggregation".to_string(),
        stage_name: "OTE Aggregation".to_string(),
        input: json!({
            "pay_lines": pay_lines.len(),
            "pay_codes": pay_codes.len(),
            "ote_super_rate": ote_super_rate.to_string(),
        }),
        output: json!({
            "ote_lines": ote.ote_lines,
            "non_ote_lines": ote.non_ote_lines,
            "unmatched_pay_lines": ote.unmatched_pay_lines,
            "buckets": ote.rows.len(),
        }),
        reasoning: format!(
            "{} OTE line(s) grouped into {} calendar quarter(s) at rate {}",
            ote.ote_lines,
            ote.rows.len(),
            ote_super_rate
        ),
    });
    if ote.unmatched_pay_lines > 0 {
        trace.warn(AuditWarning {
            code: UNMATCHED_PAY_CODE.to_string(),
            message: format!(
                "{} pay line(s) had no matching pay code and were dropped",
                ote.unmatched_pay_lines
            ),
            severity: "medium".to_string(),
        });
    }

    let disbursed = aggregate_disbursements(disbursements)?;
    trace.record(AuditStep {
        step_number: trace.next_step_number(),
        stage_id: "disbursement_aggregation".to_string(),
        stage_name: "Disbursement Aggregation".to_string(),
        input: json!({ "disbursements": disbursements.len() }),
        output: json!({ "buckets": disbursed.len() }),
        reasoning: format!(
            "{} disbursement(s) grouped into {} offset fiscal quarter(s)",
            disbursements.len(),
            disbursed.len()
        ),
    });

    let joined = join_variance(&ote.rows, &disbursed);
    // One-sided counts come from bucket presence, not from zero totals.
    let payable_keys: BTreeSet<&QuarterKey> = ote.rows.iter().map(|r| &r.key).collect();
    let disbursed_keys: BTreeSet<&QuarterKey> = disbursed.iter().map(|r| &r.key).collect();
    let payable_only = payable_keys.difference(&disbursed_keys).count();
    let disbursed_only = disbursed_keys.difference(&payable_keys).count();
    trace.record(AuditStep {
        step_number: trace.next_step_number(),
        stage_id: "variance_join".to_string(),
        stage_name: "Variance Join".to_string(),
        input: json!({
            "ote_buckets": ote.rows.len(),
            "disbursed_buckets": disbursed.len(),
        }),
        output: json!({
            "rows": joined.len(),
            "payable_only": payable_only,
            "disbursed_only": disbursed_only,
        }),
        reasoning: format!(
            "Outer join produced {} row(s); missing sides filled with zero",
            joined.len()
        ),
    });

    let report = refine_report(&joined);
    trace.record(AuditStep {
        step_number: trace.next_step_number(),
        stage_id: "report_refinement".to_string(),
        stage_name: "Report Refinement".to_string(),
        input: json!({ "rows": joined.len() }),
        output: json!({ "rows": report.len() }),
        reasoning: "Amounts rounded to cents and rows sorted by employee, year and quarter"
            .to_string(),
    });

    info!(
        run_id = %run_id,
        pay_lines = pay_lines.len(),
        disbursements = disbursements.len(),
        unmatched_pay_lines = ote.unmatched_pay_lines,
        report_rows = report.len(),
        "Metrics calculated"
    );

    Ok(report)
}
