//! Fetch task and run outcome types

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::request::Filter;

/// One unit of remote work: a filtered search of a single app's log for
/// a single hour on a single host
///
/// Fully determined by `(TraceRequest, app, host, hour)` and immutable
/// once constructed. Tasks share no mutable state; each owns its result
/// file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTask {
    pub app: String,
    pub host: String,
    pub hour: NaiveDateTime,
    pub filter: Filter,
    pub remote_log_path: String,
    pub result_file: PathBuf,
}

/// Identity and reason for one failed fetch task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskFailure {
    pub app: String,
    pub host: String,
    /// Hour stamp of the task, e.g. `2022020519`
    pub hour: String,
    pub reason: String,
}

/// Aggregate outcome of one trace run
///
/// A run completes once every worker has finished; individual task
/// failures are reported here instead of failing the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: Vec<TaskFailure>,
}

impl RunSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}
