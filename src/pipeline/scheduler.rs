//! Local sequential scheduler.
//!
//! Walks a task's dependencies depth-first, running each task whose outputs
//! are missing (or every task when forced). The first failure stops the run.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::VarianceResult;
use crate::models::AuditTrace;

use super::task::Task;

/// What happened to one task during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// The task ran and succeeded.
    Ran,
    /// The task was already complete and was not run.
    Skipped,
}

/// The result of [`run_pipeline`].
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    /// Each task visited, in execution order.
    pub tasks: Vec<(String, TaskStatus)>,
    /// The audit trace collected from every task that ran.
    pub trace: AuditTrace,
}

impl PipelineRun {
    /// Status of the named task, if it was visited.
    pub fn status(&self, name: &str) -> Option<TaskStatus> {
        self.tasks
            .iter()
            .find(|(task, _)| task == name)
            .map(|(_, status)| *status)
    }
}

/// Runs `task` and its dependencies.
///
/// Dependencies run before their dependants. A task that is already
/// complete is skipped unless `force` is set, in which case every task in
/// the graph runs again.
///
/// # Returns
///
/// The per-task outcome and audit trace, or the first task error.
pub fn run_pipeline(task: &dyn Task, force: bool) -> VarianceResult<PipelineRun> {
    let run_id = Uuid::new_v4();
    let start_time = Instant::now();
    info!(run_id = %run_id, task = %task.name(), force, "Pipeline started");

    let mut run = PipelineRun {
        tasks: Vec::new(),
        trace: AuditTrace::start(run_id),
    };

    if let Err(err) = schedule(task, force, &mut run) {
        warn!(run_id = %run_id, error = %err, "Pipeline failed");
        return Err(err);
    }

    info!(
        run_id = %run_id,
        tasks_run = run.tasks.iter().filter(|(_, s)| *s == TaskStatus::Ran).count(),
        warnings = run.trace.warnings.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Pipeline completed"
    );
    Ok(run)
}

fn schedule(task: &dyn Task, force: bool, run: &mut PipelineRun) -> VarianceResult<()> {
    for dependency in task.requires() {
        schedule(dependency.as_ref(), force, run)?;
    }

    let name = task.name();
    if !force && task.complete() {
        info!(run_id = %run.trace.run_id, task = %name, "Task complete, skipping");
        run.tasks.push((name, TaskStatus::Skipped));
        return Ok(());
    }

    let start_time = Instant::now();
    task.run(&mut run.trace)?;
    info!(
        run_id = %run.trace.run_id,
        task = %name,
        duration_us = start_time.elapsed().as_micros(),
        "Task finished"
    );
    run.tasks.push((name, TaskStatus::Ran));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::path::PathBuf;
    use std::rc::Rc;

    use crate::error::VarianceError;

    struct Step {
        name: &'static str,
        output: PathBuf,
        upstream: Option<PathBuf>,
        runs: Rc<Cell<u32>>,
        fail: bool,
    }

    impl Task for Step {
        fn name(&self) -> String {
            self.name.to_string()
        }

        fn outputs(&self) -> Vec<PathBuf> {
            vec![self.output.clone()]
        }

        fn requires(&self) -> Vec<Box<dyn Task>> {
            match &self.upstream {
                Some(path) => vec![Box::new(Step {
                    name: "upstream",
                    output: path.clone(),
                    upstream: None,
                    runs: Rc::clone(&self.runs),
                    fail: false,
                })],
                None => Vec::new(),
            }
        }

        fn run(&self, _trace: &mut AuditTrace) -> VarianceResult<()> {
            self.runs.set(self.runs.get() + 1);
            if self.fail {
                return Err(VarianceError::WorkbookError {
                    path: self.name.to_string(),
                    message: "failed".to_string(),
                });
            }
            std::fs::write(&self.output, b"done").map_err(|e| VarianceError::io(&self.output, e))
        }
    }

    fn chain(dir: &std::path::Path, runs: &Rc<Cell<u32>>, fail: bool) -> Step {
        Step {
            name: "downstream",
            output: dir.join("downstream"),
            upstream: Some(dir.join("upstream")),
            runs: Rc::clone(runs),
            fail,
        }
    }

    #[test]
    fn test_dependencies_run_first() {
        let dir = tempfile::tempdir().unwrap();
        let runs = Rc::new(Cell::new(0));

        let run = run_pipeline(&chain(dir.path(), &runs, false), false).unwrap();

        let names: Vec<&str> = run.tasks.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["upstream", "downstream"]);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_complete_tasks_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let runs = Rc::new(Cell::new(0));
        let task = chain(dir.path(), &runs, false);

        run_pipeline(&task, false).unwrap();
        let second = run_pipeline(&task, false).unwrap();

        assert_eq!(runs.get(), 2);
        assert_eq!(second.status("upstream"), Some(TaskStatus::Skipped));
        assert_eq!(second.status("downstream"), Some(TaskStatus::Skipped));
    }

    #[test]
    fn test_force_reruns_everything() {
        let dir = tempfile::tempdir().unwrap();
        let runs = Rc::new(Cell::new(0));
        let task = chain(dir.path(), &runs, false);

        run_pipeline(&task, false).unwrap();
        let forced = run_pipeline(&task, true).unwrap();

        assert_eq!(runs.get(), 4);
        assert_eq!(forced.status("downstream"), Some(TaskStatus::Ran));
    }

    #[test]
    fn test_failure_stops_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let runs = Rc::new(Cell::new(0));

        let result = run_pipeline(&chain(dir.path(), &runs, true), false);

        assert!(result.is_err());
        assert!(dir.path().join("upstream").exists());
        assert!(!dir.path().join("downstream").exists());
    }

    #[test]
    fn test_each_run_gets_a_new_id() {
        let dir = tempfile::tempdir().unwrap();
        let runs = Rc::new(Cell::new(0));
        let task = chain(dir.path(), &runs, false);

        let first = run_pipeline(&task, false).unwrap();
        let second = run_pipeline(&task, false).unwrap();
        assert_ne!(first.trace.run_id, second.trace.run_id);
    }
}
