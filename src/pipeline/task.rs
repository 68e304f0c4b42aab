//! The unit of work the scheduler runs.

use std::path::PathBuf;

use crate::error::VarianceResult;
use crate::models::AuditTrace;

/// A pipeline task with file outputs and upstream dependencies.
///
/// A task is complete when every one of its outputs exists. Tasks must be
/// safe to re-run: running a complete task again overwrites its outputs
/// with equivalent contents.
pub trait Task {
    /// Short name used in logs and the run summary.
    fn name(&self) -> String;

    /// Files this task produces.
    fn outputs(&self) -> Vec<PathBuf>;

    /// Tasks that must be complete before this one runs.
    fn requires(&self) -> Vec<Box<dyn Task>> {
        Vec::new()
    }

    /// Produces the outputs, recording stages into `trace`.
    fn run(&self, trace: &mut AuditTrace) -> VarianceResult<()>;

    /// Whether every output already exists.
    fn complete(&self) -> bool {
        let outputs = self.outputs();
        !outputs.is_empty() && outputs.iter().all(|path| path.exists())
    }
}
