//! Pipeline orchestration.
//!
//! A run is two tasks: [`ExtractWorkbook`] turns the source workbook into CSV
//! tables, and [`CalculateMetrics`] (which requires it) computes and publishes
//! the variance report. [`run_pipeline`] executes a task graph, skipping
//! tasks whose outputs already exist.
//!
//! # Example
//!
//! ```no_run
//! use super_variance::config::ConfigLoader;
//! use super_variance::pipeline::{CalculateMetrics, PipelineLayout, run_pipeline};
//!
//! let layout = PipelineLayout::new(".", "sample_data.xlsx");
//! let task = CalculateMetrics::new(layout, ConfigLoader::default());
//! let run = run_pipeline(&task, false)?;
//! println!("{} warning(s)", run.trace.warnings.len());
//! # Ok::<(), super_variance::error::VarianceError>(())
//! ```

mod layout;
mod metrics;
mod scheduler;
mod task;
mod tasks;

pub use layout::{
    EXTRACTED_DATA_DIR, METRICS_DIR, METRICS_FILE, METRICS_WORKBOOK_FILE, PipelineLayout,
    RAW_DATA_DIR,
};
pub use metrics::{UNMATCHED_PAY_CODE, calculate_metrics};
pub use scheduler::{PipelineRun, TaskStatus, run_pipeline};
pub use task::Task;
pub use tasks::{CalculateMetrics, ExtractWorkbook};
