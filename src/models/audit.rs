//! Audit trace models for variance runs.
//!
//! Every pipeline run records what each stage consumed and produced so a
//! report can be traced back to its inputs, including rows that were
//! silently dropped by the pay-code join.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single step in the audit trace recording one pipeline stage.
///
/// # Example
///
/// ```
/// use super_variance::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     stage_id: "ote_aggregation".to_string(),
///     stage_name: "OTE Aggregation".to_string(),
///     input: serde_json::json!({ "pay_lines": 3 }),
///     output: serde_json::json!({ "buckets": 2 }),
///     reasoning: "2 OTE lines grouped into 2 quarters".to_string(),
/// };
/// assert_eq!(step.stage_id, "ote_aggregation");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// Machine-readable stage identifier.
    pub stage_id: String,
    /// Human-readable stage name.
    pub stage_name: String,
    /// Summary of what the stage consumed.
    pub input: serde_json::Value,
    /// Summary of what the stage produced.
    pub output: serde_json::Value,
    /// Human-readable explanation of the result.
    pub reasoning: String,
}

/// A warning raised during a run.
///
/// Warnings never stop a run; they flag data worth a second look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace of one variance run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// Identifier of the run, also attached to every log line.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Stage records, in execution order.
    pub steps: Vec<AuditStep>,
    /// Warnings raised by any stage.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Starts an empty trace for a new run.
    pub fn start(run_id: Uuid) -> Self {
        Self {
            run_id,
            started_at: Utc::now(),
            steps: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Returns the number the next recorded step should carry.
    pub fn next_step_number(&self) -> u32 {
        self.steps.len() as u32 + 1
    }

    /// Appends a step.
    pub fn record(&mut self, step: AuditStep) {
        self.steps.push(step);
    }

    /// Appends a warning.
    pub fn warn(&mut self, warning: AuditWarning) {
        self.warnings.push(warning);
    }
}
