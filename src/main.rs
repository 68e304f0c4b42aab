use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super_variance::config::ConfigLoader;
use super_variance::error::{VarianceError, VarianceResult};
use super_variance::io::extract_workbook;
use super_variance::pipeline::{CalculateMetrics, PipelineLayout, run_pipeline};

#[derive(Parser)]
#[command(
    name = "super-variance",
    about = "Reconcile superannuation payable on OTE against super disbursed, per quarter."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the Payslips, PayCodes and Disbursements sheets of a workbook to CSV.
    Extract {
        /// Path to the source workbook
        source: PathBuf,
        /// Directory to write the CSV files into
        target_dir: PathBuf,
    },
    /// Run the full pipeline and write metrics/metrics.csv and metrics/metrics.xlsx.
    Run {
        /// Base directory holding data/raw, data/extracted and metrics
        #[arg(long = "base-path", default_value = ".")]
        base_path: PathBuf,
        /// Workbook file name under <base-path>/data/raw
        #[arg(long)]
        workbook: String,
        /// YAML configuration file (default: statutory rate)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Re-run tasks even if their outputs exist
        #[arg(long)]
        force: bool,
        /// Print the audit trace as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Level used when RUST_LOG is unset or unparseable.
const DEFAULT_LOG_FILTER: &str = "info";

/// Builds the log filter from RUST_LOG directives, falling back to
/// [`DEFAULT_LOG_FILTER`].
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn main() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(directives.as_deref()))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract { source, target_dir } => extract(&source, &target_dir),
        Commands::Run {
            base_path,
            workbook,
            config,
            force,
            json,
        } => run(base_path, workbook, config, force, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn extract(source: &std::path::Path, target_dir: &std::path::Path) -> VarianceResult<()> {
    let tables = extract_workbook(source, target_dir)?;
    for path in tables.paths() {
        println!("{}", path.display());
    }
    Ok(())
}

fn run(
    base_path: PathBuf,
    workbook: String,
    config: Option<PathBuf>,
    force: bool,
    json: bool,
) -> VarianceResult<()> {
    let config = match config {
        Some(path) => ConfigLoader::load(path)?,
        None => ConfigLoader::default(),
    };
    let layout = PipelineLayout::new(base_path, workbook);
    let task = CalculateMetrics::new(layout.clone(), config);

    let run = run_pipeline(&task, force)?;

    if json {
        let rendered = serde_json::to_string_pretty(&run.trace).map_err(|e| {
            VarianceError::ReportWriteError {
                path: "<stdout>".to_string(),
                message: e.to_string(),
            }
        })?;
        println!("{rendered}");
    } else {
        for (name, status) in &run.tasks {
            println!("{name}: {status:?}");
        }
        for warning in &run.trace.warnings {
            println!("warning [{}]: {}", warning.code, warning.message);
        }
        println!("{}", layout.metrics_csv().display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(filter: EnvFilter) -> String {
        filter.to_string().to_lowercase()
    }

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(rendered(log_filter(None)), "info");
    }

    /// A global level in RUST_LOG is kept, not forced back to info.
    #[test]
    fn test_log_filter_keeps_global_level() {
        assert_eq!(rendered(log_filter(Some("warn"))), "warn");
        assert_eq!(rendered(log_filter(Some("debug"))), "debug");
    }
}
