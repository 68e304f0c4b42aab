//! The two pipeline tasks: workbook extraction and metrics calculation.

use std::path::PathBuf;
use std::time::Instant;

use serde_json::json;
use tracing::info;

use crate::config::ConfigLoader;
use crate::error::VarianceResult;
use crate::io::{
    ExtractedTables, SOURCE_SHEETS, commit_all, extract_workbook, read_disbursements,
    read_pay_codes, read_pay_lines, render_report_csv, render_report_xlsx, stage,
};
use crate::models::{AuditStep, AuditTrace};

use super::layout::PipelineLayout;
use super::metrics::calculate_metrics;
use super::task::Task;

/// Extracts the source sheets of a workbook to CSV files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractWorkbook {
    /// The workbook to read.
    pub source_file: PathBuf,
    /// Directory the CSV files are written to.
    pub target_directory: PathBuf,
}

impl ExtractWorkbook {
    /// Creates the extraction task for a layout.
    pub fn for_layout(layout: &PipelineLayout) -> Self {
        Self {
            source_file: layout.source_workbook(),
            target_directory: layout.extracted_dir(),
        }
    }
}

impl Task for ExtractWorkbook {
    fn name(&self) -> String {
        "ExtractWorkbook".to_string()
    }

    fn outputs(&self) -> Vec<PathBuf> {
        ExtractedTables::in_directory(&self.target_directory).paths()
    }

    fn run(&self, trace: &mut AuditTrace) -> VarianceResult<()> {
        let tables = extract_workbook(&self.source_file, &self.target_directory)?;
        trace.record(AuditStep {
            step_number: trace.next_step_number(),
            stage_id: "workbook_extraction".to_string(),
            stage_name: "Workbook Extraction".to_string(),
            input: json!({ "source_file": self.source_file.display().to_string() }),
            output: json!({
                "tables": tables
                    .paths()
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>(),
            }),
            reasoning: format!("Sheets {} written as CSV", SOURCE_SHEETS.join(", ")),
        });
        Ok(())
    }
}

/// Computes the variance report from the extracted tables and publishes it
/// as `metrics.csv` and `metrics.xlsx`.
#[derive(Debug, Clone)]
pub struct CalculateMetrics {
    /// Where inputs are read from and the report is written to.
    pub layout: PipelineLayout,
    /// Supplies the OTE super rate.
    pub config: ConfigLoader,
}

impl CalculateMetrics {
    /// Creates the task.
    pub fn new(layout: PipelineLayout, config: ConfigLoader) -> Self {
        Self { layout, config }
    }
}

impl Task for CalculateMetrics {
    fn name(&self) -> String {
        "CalculateMetrics".to_string()
    }

    fn outputs(&self) -> Vec<PathBuf> {
        vec![self.layout.metrics_csv(), self.layout.metrics_xlsx()]
    }

    fn requires(&self) -> Vec<Box<dyn Task>> {
        vec![Box::new(ExtractWorkbook::for_layout(&self.layout))]
    }

    fn run(&self, trace: &mut AuditTrace) -> VarianceResult<()> {
        let start_time = Instant::now();
        let tables = self.layout.extracted_tables();

        let pay_lines = read_pay_lines(&tables.payslips)?;
        let pay_codes = read_pay_codes(&tables.pay_codes)?;
        let disbursements = read_disbursements(&tables.disbursements)?;

        let report = calculate_metrics(
            &pay_lines,
            &pay_codes,
            &disbursements,
            self.config.ote_super_rate(),
            trace,
        )?;

        // Render both before writing either so a failure leaves no report.
        let csv_bytes = render_report_csv(&report)?;
        let xlsx_bytes = render_report_xlsx(&report)?;
        let csv_path = self.layout.metrics_csv();
        let xlsx_path = self.layout.metrics_xlsx();
        // Both files are published together or not at all.
        let staged_csv = stage(&csv_path, &csv_bytes)?;
        let staged_xlsx = match stage(&xlsx_path, &xlsx_bytes) {
            Ok(staged) => staged,
            Err(e) => {
                staged_csv.discard();
                return Err(e);
            }
        };
        commit_all(vec![staged_csv, staged_xlsx])?;

        trace.record(AuditStep {
            step_number: trace.next_step_number(),
            stage_id: "report_output".to_string(),
            stage_name: "Report Output".to_string(),
            input: json!({ "rows": report.len() }),
            output: json!({
                "csv": csv_path.display().to_string(),
                "xlsx": xlsx_path.display().to_string(),
            }),
            reasoning: format!("{} report row(s) published", report.len()),
        });

        info!(
            run_id = %trace.run_id,
            rows = report.len(),
            duration_us = start_time.elapsed().as_micros(),
            "Metrics report written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_extract_outputs_are_the_three_tables() {
        let layout = PipelineLayout::new("/base", "book.xlsx");
        let task = ExtractWorkbook::for_layout(&layout);
        assert_eq!(task.source_file, Path::new("/base/data/raw/book.xlsx"));
        assert_eq!(task.outputs(), layout.extracted_tables().paths());
    }

    #[test]
    fn test_calculate_metrics_requires_extraction() {
        let layout = PipelineLayout::new("/base", "book.xlsx");
        let task = CalculateMetrics::new(layout.clone(), ConfigLoader::default());

        let requires = task.requires();
        assert_eq!(requires.len(), 1);
        assert_eq!(requires[0].name(), "ExtractWorkbook");
        assert_eq!(requires[0].outputs(), layout.extracted_tables().paths());
    }

    #[test]
    fn test_calculate_metrics_outputs() {
        let layout = PipelineLayout::new("/base", "book.xlsx");
        let task = CalculateMetrics::new(layout, ConfigLoader::default());
        assert_eq!(
            task.outputs(),
            vec![
                PathBuf::from("/base/metrics/metrics.csv"),
                PathBuf::from("/base/metrics/metrics.xlsx")
            ]
        );
    }

    #[test]
    fn test_calculate_metrics_without_inputs_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let layout = PipelineLayout::new(dir.path(), "book.xlsx");
        let task = CalculateMetrics::new(layout.clone(), ConfigLoader::default());

        let mut trace = AuditTrace::start(uuid::Uuid::new_v4());
        assert!(task.run(&mut trace).is_err());
        assert!(!layout.metrics_csv().exists());
        assert!(!layout.metrics_xlsx().exists());
    }
}
