//! Metrics report merging
//!
//! An experiment directory holds, per stage, performance statistics under
//! `experiment_run/` and resource usage under `cache/`. The report puts both
//! side by side per stage and writes `metrics_report/full_report.json`.

use std::fs;
use std::path::{Path, PathBuf};

use mcfg_upgrade::merge_dict;
use serde_json::{json, Map, Value};

/// Directory of non-performance metrics
pub const CACHE_DIR: &str = "cache";
/// Directory of performance statistics
pub const EXPERIMENT_RUN_DIR: &str = "experiment_run";
/// Output directory
pub const REPORT_DIR: &str = "metrics_report";
/// Output file name
pub const REPORT_FILE: &str = "full_report.json";

/// Stage tags and their input files: (tag, non-performance file, performance file)
const STAGES: [(&str, &str, &str); 2] = [
    ("train", "train_metrics.json", "training_statistics.json"),
    ("evaluate", "evaluate_metrics.json", "test_statistics.json"),
];

/// Errors while building a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// IO error reading an input or writing the report
    #[error("io error at {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Input is not valid JSON
    #[error("invalid json in {path}: {source}")]
    Json {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
}

impl ReportError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create JSON error for path
    pub fn json_error(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

fn load_json(path: &Path) -> Result<Value, ReportError> {
    let text = fs::read_to_string(path).map_err(|e| ReportError::io_error(path, e))?;
    serde_json::from_str(&text).map_err(|e| ReportError::json_error(path, e))
}

/// Merge the metrics of an experiment into one report
///
/// Returns the report and the path it was written to.
///
/// # Errors
/// Returns error if an input file is missing or malformed, or the report
/// cannot be written
pub fn create_metrics_report(experiment_dir: &Path) -> Result<(Value, PathBuf), ReportError> {
    let report_dir = experiment_dir.join(REPORT_DIR);
    fs::create_dir_all(&report_dir).map_err(|e| ReportError::io_error(&report_dir, e))?;

    let mut report = Map::new();
    for (tag, non_performance_file, performance_file) in STAGES {
        let non_performance = load_json(&experiment_dir.join(CACHE_DIR).join(non_performance_file))?;
        let performance = load_json(&experiment_dir.join(EXPERIMENT_RUN_DIR).join(performance_file))?;
        let merged = merge_dict(
            &json!({ "performance_metrics": performance }),
            &json!({ "non_performance_metrics": non_performance }),
        );
        report.insert(tag.to_string(), merged);
    }
    let report = Value::Object(report);

    let path = report_dir.join(REPORT_FILE);
    let text = serde_json::to_string_pretty(&report).map_err(|e| ReportError::json_error(&path, e))?;
    fs::write(&path, text).map_err(|e| ReportError::io_error(&path, e))?;
    tracing::info!(path = %path.display(), "metrics report written");

    Ok((report, path))
}
