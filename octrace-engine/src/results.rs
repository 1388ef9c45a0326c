//! Result tree construction
//!
//! One leaf directory per fetch task, created before any worker starts
//! so no two workers ever race on the same path. The layout
//! `resultsRoot/runId/app/hour/host/result.txt` is a stable contract for
//! downstream tooling.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::{debug, error};

use octrace_core::domain::run::RunContext;

use crate::error::EngineError;

/// Creates the leaf directory for one `(app, hour, host)` task and
/// returns the path of its result file
///
/// The result file itself is created empty here so the leaf is present
/// even when the fetch later fails; the worker truncates and rewrites
/// it. `create_dir_all` tolerates already-existing directories; any
/// other failure (permissions, disk full) is fatal for the run and
/// propagated.
pub fn ensure_result_file(
    run: &RunContext,
    app: &str,
    hour: NaiveDateTime,
    host: &str,
) -> Result<PathBuf, EngineError> {
    let dir = run.task_dir(app, hour, host);
    fs::create_dir_all(&dir).map_err(|source| {
        error!("Directory {} can not be created: {}", dir.display(), source);
        EngineError::Directory {
            path: dir.clone(),
            source,
        }
    })?;

    let file = run.result_file(app, hour, host);
    fs::File::create(&file).map_err(|source| EngineError::Directory {
        path: file.clone(),
        source,
    })?;

    debug!("Prepared result directory {}", dir.display());
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_creates_all_intermediate_directories() {
        let root = tempfile::tempdir().unwrap();
        let run = RunContext::new(root.path(), ts("2022-02-09 11:56:07"), "ERROR");

        let file = ensure_result_file(&run, "USSDGW", ts("2022-02-05 19:00:00"), "ussdgw1").unwrap();

        assert!(file.is_file());
        assert_eq!(
            file,
            root.path()
                .join("20220209115607_ERROR/USSDGW/2022020519/ussdgw1/result.txt")
        );
    }

    #[test]
    fn test_existing_directory_is_not_an_error() {
        let root = tempfile::tempdir().unwrap();
        let run = RunContext::new(root.path(), ts("2022-02-09 11:56:07"), "ERROR");
        let hour = ts("2022-02-05 19:00:00");

        ensure_result_file(&run, "A", hour, "h1").unwrap();
        ensure_result_file(&run, "A", hour, "h1").unwrap();
    }

    #[test]
    fn test_uncreatable_directory_is_fatal() {
        let root = tempfile::tempdir().unwrap();
        // A file where a directory component must go forces the failure
        std::fs::write(root.path().join("blocked"), b"").unwrap();
        let run = RunContext::new(root.path().join("blocked"), ts("2022-02-09 11:56:07"), "X");

        let err = ensure_result_file(&run, "A", ts("2022-02-05 19:00:00"), "h1").unwrap_err();
        assert!(matches!(err, EngineError::Directory { .. }));
    }
}
