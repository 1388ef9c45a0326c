//! End-to-end trace run tests
//!
//! The ssh binary is swapped for local stand-ins so the full pipeline
//! (validate → expand → prepare tree → fan out → join → summarize) runs
//! without any remote host.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use octrace_core::dto::TraceParams;
use octrace_engine::config::{Config, LogTemplate};
use octrace_engine::Tracer;

fn config(results_root: &Path, ssh_program: &str) -> Config {
    let mut config = Config {
        results_root: results_root.to_path_buf(),
        ssh_program: ssh_program.to_string(),
        ..Config::default()
    };
    config.apps.insert(
        "A".to_string(),
        LogTemplate {
            path: "/var/log/a".to_string(),
            prefix: "a_".to_string(),
            suffix: ".log".to_string(),
        },
    );
    config.apps.insert(
        "B".to_string(),
        LogTemplate {
            path: "/var/log/b".to_string(),
            prefix: "b_".to_string(),
            suffix: ".log".to_string(),
        },
    );
    config
}

fn request(json: serde_json::Value) -> octrace_core::domain::request::TraceRequest {
    serde_json::from_value::<TraceParams>(json)
        .unwrap()
        .validate()
        .unwrap()
}

/// The single directory created under the results root by a run
fn run_dir(results_root: &Path, filter_value: &str) -> PathBuf {
    let mut entries: Vec<_> = std::fs::read_dir(results_root)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1, "expected exactly one run directory");
    let dir = entries.pop().unwrap();
    assert!(
        dir.file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .ends_with(&format!("_{}", filter_value))
    );
    dir
}

#[tokio::test]
async fn test_single_task_run_populates_one_leaf() {
    let root = tempfile::tempdir().unwrap();
    // /bin/echo prints its argv, so the "remote" output is the command
    // line itself, streamed into the result file
    let tracer = Tracer::new(Arc::new(config(root.path(), "/bin/echo")));

    let summary = tracer
        .run(&request(serde_json::json!({
            "filter": {"type": "text", "value": "ERROR"},
            "period": {"from": "2022-01-01 10:00:00", "to": "2022-01-01 11:00:00"},
            "apps": {"A": ["h1"]}
        })))
        .await
        .unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(summary.succeeded, 1);
    assert!(summary.all_succeeded());

    let leaf = run_dir(root.path(), "ERROR")
        .join("A")
        .join("2022010110")
        .join("h1")
        .join("result.txt");
    let written = std::fs::read_to_string(&leaf).unwrap();
    assert!(written.contains("trace-tool@h1"));
    assert!(written.contains("ERROR"));
    assert!(written.contains("/var/log/a/a_2022010110.log"));
}

#[tokio::test]
async fn test_every_triple_gets_a_worker_and_failures_stay_isolated() {
    let root = tempfile::tempdir().unwrap();
    // A transport binary that does not exist: every fetch fails, the run
    // itself still completes with a full summary
    let tracer = Tracer::new(Arc::new(config(
        root.path(),
        "/nonexistent/octrace-test-ssh",
    )));

    let summary = tracer
        .run(&request(serde_json::json!({
            "filter": {"type": "text", "value": "ERROR"},
            "period": {"from": "2022-01-01 10:00:00", "to": "2022-01-01 13:00:00"},
            "apps": {"A": ["h1", "h2"], "B": ["h3"]}
        })))
        .await
        .unwrap();

    // 2 hosts x 3 hours + 1 host x 3 hours
    assert_eq!(summary.total, 9);
    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.failed.len(), 9);
    for failure in &summary.failed {
        assert!(failure.reason.contains("/nonexistent/octrace-test-ssh"));
    }

    // The result tree was prepared before dispatch: every leaf exists
    // (empty) even though no fetch succeeded
    let run = run_dir(root.path(), "ERROR");
    for (app, hosts) in [("A", vec!["h1", "h2"]), ("B", vec!["h3"])] {
        for hour in ["2022010110", "2022010111", "2022010112"] {
            for host in &hosts {
                let leaf = run.join(app).join(hour).join(host).join("result.txt");
                assert!(leaf.is_file(), "missing leaf {}", leaf.display());
                assert_eq!(std::fs::metadata(&leaf).unwrap().len(), 0);
            }
        }
    }
}

#[tokio::test]
async fn test_zero_width_window_runs_no_tasks() {
    let root = tempfile::tempdir().unwrap();
    let tracer = Tracer::new(Arc::new(config(root.path(), "/bin/echo")));

    let summary = tracer
        .run(&request(serde_json::json!({
            "filter": {"type": "text", "value": "ERROR"},
            "period": {"from": "2022-01-01 10:00:00", "to": "2022-01-01 10:00:00"},
            "apps": {"A": ["h1"]}
        })))
        .await
        .unwrap();

    assert_eq!(summary.total, 0);
    assert!(summary.all_succeeded());
}

#[tokio::test]
async fn test_unknown_app_aborts_the_whole_run() {
    let root = tempfile::tempdir().unwrap();
    let tracer = Tracer::new(Arc::new(config(root.path(), "/bin/echo")));

    let result = tracer
        .run(&request(serde_json::json!({
            "filter": {"type": "text", "value": "ERROR"},
            "period": {"from": "2022-01-01 10:00:00", "to": "2022-01-01 11:00:00"},
            "apps": {"NOPE": ["h1"]}
        })))
        .await;

    assert!(result.is_err());
}
