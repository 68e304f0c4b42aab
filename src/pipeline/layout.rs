//! On-disk layout of a pipeline base directory.

use std::path::{Path, PathBuf};

use crate::io::ExtractedTables;

/// Directory holding source workbooks, relative to the base path.
pub const RAW_DATA_DIR: &str = "data/raw";
/// Directory the extracted CSV tables are written to, relative to the base path.
pub const EXTRACTED_DATA_DIR: &str = "data/extracted";
/// Directory the report is written to, relative to the base path.
pub const METRICS_DIR: &str = "metrics";
/// File name of the CSV report.
pub const METRICS_FILE: &str = "metrics.csv";
/// File name of the spreadsheet report.
pub const METRICS_WORKBOOK_FILE: &str = "metrics.xlsx";

/// Resolves every path a run reads or writes under one base directory.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use super_variance::pipeline::PipelineLayout;
///
/// let layout = PipelineLayout::new("/srv/super", "sample_data.xlsx");
/// assert_eq!(layout.source_workbook(), PathBuf::from("/srv/super/data/raw/sample_data.xlsx"));
/// assert_eq!(layout.metrics_csv(), PathBuf::from("/srv/super/metrics/metrics.csv"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineLayout {
    base_path: PathBuf,
    workbook: String,
}

impl PipelineLayout {
    /// Creates a layout for `workbook` (a file name under [`RAW_DATA_DIR`]).
    pub fn new(base_path: impl Into<PathBuf>, workbook: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            workbook: workbook.into(),
        }
    }

    /// The base directory.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// `<base>/data/raw/<workbook>`.
    pub fn source_workbook(&self) -> PathBuf {
        self.base_path.join(RAW_DATA_DIR).join(&self.workbook)
    }

    /// `<base>/data/extracted`.
    pub fn extracted_dir(&self) -> PathBuf {
        self.base_path.join(EXTRACTED_DATA_DIR)
    }

    /// The three extracted CSV tables.
    pub fn extracted_tables(&self) -> ExtractedTables {
        ExtractedTables::in_directory(&self.extracted_dir())
    }

    /// `<base>/metrics/metrics.csv`.
    pub fn metrics_csv(&self) -> PathBuf {
        self.base_path.join(METRICS_DIR).join(METRICS_FILE)
    }

    /// `<base>/metrics/metrics.xlsx`.
    pub fn metrics_xlsx(&self) -> PathBuf {
        self.base_path.join(METRICS_DIR).join(METRICS_WORKBOOK_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracted_tables_live_under_extracted_dir() {
        let layout = PipelineLayout::new("/base", "book.xlsx");
        let tables = layout.extracted_tables();
        assert_eq!(tables.payslips, PathBuf::from("/base/data/extracted/Payslips.csv"));
        assert_eq!(
            tables.disbursements,
            PathBuf::from("/base/data/extracted/Disbursements.csv")
        );
    }

    #[test]
    fn test_reports_share_metrics_dir() {
        let layout = PipelineLayout::new("/base", "book.xlsx");
        assert_eq!(layout.metrics_csv().parent(), layout.metrics_xlsx().parent());
        assert_eq!(layout.metrics_xlsx(), PathBuf::from("/base/metrics/metrics.xlsx"));
    }
}
