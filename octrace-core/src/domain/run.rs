//! Run metadata and result tree layout
//!
//! The directory layout is an external contract for downstream tooling:
//! `resultsRoot/<creationTimestamp>_<filterValue>/<app>/<hourString>/<host>/result.txt`.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::hours;

/// Name of the leaf file each fetch task writes into
pub const RESULT_FILE_NAME: &str = "result.txt";

/// Identifying metadata for one end-to-end trace run
///
/// Created once per request; the run id embeds the creation timestamp
/// and the filter value so operators can find a run's output by eye.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    run_id: String,
    results_root: PathBuf,
}

impl RunContext {
    /// Creates the context for a run started at `created_at`
    pub fn new(
        results_root: impl Into<PathBuf>,
        created_at: NaiveDateTime,
        filter_value: &str,
    ) -> Self {
        let run_id = format!("{}_{}", created_at.format("%Y%m%d%H%M%S"), filter_value);
        Self {
            run_id,
            results_root: results_root.into(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn results_root(&self) -> &Path {
        &self.results_root
    }

    /// Top-level directory holding this run's whole result tree
    pub fn run_dir(&self) -> PathBuf {
        self.results_root.join(&self.run_id)
    }

    /// Leaf directory owned by a single `(app, hour, host)` task
    ///
    /// Distinct triples always map to distinct directories, so workers
    /// never share a path.
    pub fn task_dir(&self, app: &str, hour: NaiveDateTime, host: &str) -> PathBuf {
        self.run_dir()
            .join(app)
            .join(hours::hour_stamp(hour))
            .join(host)
    }

    /// Result file written by the task owning `(app, hour, host)`
    pub fn result_file(&self, app: &str, hour: NaiveDateTime, host: &str) -> PathBuf {
        self.task_dir(app, hour, host).join(RESULT_FILE_NAME)
    }
}
