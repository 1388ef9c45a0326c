//! Trace scheduling
//!
//! Expands a validated request into its full task set, prepares the
//! result tree, then fans the tasks out to bounded concurrent workers
//! and joins all of them. Per run: Received → Validated (by the caller)
//! → Expanded → Dispatched → Joined → Done. Only configuration and
//! directory failures abort before Dispatched; after that, a task
//! failure never touches the run or any other task.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use octrace_core::domain::request::TraceRequest;
use octrace_core::domain::run::RunContext;
use octrace_core::domain::task::{FetchTask, RunSummary, TaskFailure};
use octrace_core::hours;

use crate::config::Config;
use crate::error::EngineError;
use crate::fetch::{self, Transport};
use crate::resolver;
use crate::results;

/// Executes trace runs against a fixed configuration
pub struct Tracer {
    config: Arc<Config>,
}

impl Tracer {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Runs one trace request to completion
    ///
    /// Returns only after every worker has finished. Individual fetch
    /// failures do not fail the run; they are collected in the summary.
    pub async fn run(&self, request: &TraceRequest) -> Result<RunSummary, EngineError> {
        let run = RunContext::new(
            self.config.results_root.clone(),
            Utc::now().naive_utc(),
            &request.filter.value,
        );
        info!("Starting trace run {}", run.run_id());

        let tasks = self.materialize(request, &run)?;
        let total = tasks.len();
        info!("Materialized {} fetch task(s) for run {}", total, run.run_id());

        let transport = Transport::from_config(&self.config);
        let semaphore = Arc::new(Semaphore::new(self.config.max_parallel_fetches));
        let mut workers = Vec::with_capacity(total);

        for task in tasks {
            let ident = (task.app.clone(), task.host.clone(), task.hour);
            let semaphore = Arc::clone(&semaphore);
            let transport = transport.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    // The semaphore is never closed while workers run
                    Err(e) => return Some(failure_for(&task, e.to_string())),
                };

                match fetch::fetch(&transport, &task).await {
                    Ok(()) => None,
                    Err(e) => {
                        error!(
                            "Fetch for {} at {} (hour {}) failed: {}",
                            task.app,
                            task.host,
                            hours::hour_stamp(task.hour),
                            e
                        );
                        Some(failure_for(&task, e.to_string()))
                    }
                }
            });
            workers.push((ident, handle));
        }

        let mut failed = Vec::new();
        for ((app, host, hour), handle) in workers {
            match handle.await {
                Ok(None) => {}
                Ok(Some(failure)) => failed.push(failure),
                Err(e) => {
                    warn!("Fetch worker for {} at {} panicked: {}", app, host, e);
                    failed.push(TaskFailure {
                        app,
                        host,
                        hour: hours::hour_stamp(hour),
                        reason: format!("worker panicked: {}", e),
                    });
                }
            }
        }

        let succeeded = total - failed.len();
        info!(
            "Trace run {} finished: {}/{} task(s) succeeded",
            run.run_id(),
            succeeded,
            total
        );

        Ok(RunSummary {
            run_id: run.run_id().to_string(),
            total,
            succeeded,
            failed,
        })
    }

    /// Expands the request into its full task set and prepares the
    /// result tree
    ///
    /// The whole set is materialized in memory before any worker starts.
    /// An unknown app or an uncreatable directory aborts the run here,
    /// pre-dispatch.
    fn materialize(
        &self,
        request: &TraceRequest,
        run: &RunContext,
    ) -> Result<Vec<FetchTask>, EngineError> {
        let mut tasks = Vec::with_capacity(request.task_count());

        for (app, hosts) in &request.apps {
            let template = self.config.lookup(app)?;

            for hour in &request.window {
                let remote_log_path = resolver::resolve_log_path(template, hour);

                for host in hosts {
                    let result_file = results::ensure_result_file(run, app, hour, host)?;
                    tasks.push(FetchTask {
                        app: app.clone(),
                        host: host.clone(),
                        hour,
                        filter: request.filter.clone(),
                        remote_log_path: remote_log_path.clone(),
                        result_file,
                    });
                }
            }
        }

        Ok(tasks)
    }
}

fn failure_for(task: &FetchTask, reason: String) -> TaskFailure {
    TaskFailure {
        app: task.app.clone(),
        host: task.host.clone(),
        hour: hours::hour_stamp(task.hour),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogTemplate;
    use chrono::NaiveDateTime;
    use octrace_core::dto::TraceParams;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn config_with(root: &std::path::Path, apps: &[&str]) -> Config {
        let mut config = Config {
            results_root: root.to_path_buf(),
            ..Config::default()
        };
        for app in apps {
            config.apps.insert(
                app.to_string(),
                LogTemplate {
                    path: format!("/aux1/{}/logs", app.to_lowercase()),
                    prefix: format!("{}_", app.to_lowercase()),
                    suffix: ".log".to_string(),
                },
            );
        }
        config
    }

    fn request(json: serde_json::Value) -> TraceRequest {
        serde_json::from_value::<TraceParams>(json)
            .unwrap()
            .validate()
            .unwrap()
    }

    #[test]
    fn test_materialize_expands_every_triple() {
        let root = tempfile::tempdir().unwrap();
        let tracer = Tracer::new(Arc::new(config_with(root.path(), &["USSDGW", "BROWSER"])));
        let request = request(serde_json::json!({
            "filter": {"type": "text", "value": "ERROR"},
            "period": {"from": "2022-01-01 10:00:00", "to": "2022-01-01 13:00:00"},
            "apps": {"USSDGW": ["u1", "u2"], "BROWSER": ["b1"]}
        }));
        let run = RunContext::new(root.path(), ts("2022-02-09 11:56:07"), "ERROR");

        let tasks = tracer.materialize(&request, &run).unwrap();

        // 2 hosts x 3 hours + 1 host x 3 hours
        assert_eq!(tasks.len(), 9);
        assert_eq!(tasks.len(), request.task_count());

        // Every task owns a distinct, already-created result file
        for (i, a) in tasks.iter().enumerate() {
            assert!(a.result_file.is_file());
            for b in tasks.iter().skip(i + 1) {
                assert_ne!(a.result_file, b.result_file);
            }
        }
    }

    #[test]
    fn test_unknown_app_aborts_before_dispatch() {
        let root = tempfile::tempdir().unwrap();
        let tracer = Tracer::new(Arc::new(config_with(root.path(), &["USSDGW"])));
        let request = request(serde_json::json!({
            "filter": {"type": "text", "value": "ERROR"},
            "period": {"from": "2022-01-01 10:00:00", "to": "2022-01-01 11:00:00"},
            "apps": {"UNKNOWN": ["h1"]}
        }));
        let run = RunContext::new(root.path(), ts("2022-02-09 11:56:07"), "ERROR");

        assert!(matches!(
            tracer.materialize(&request, &run),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn test_remote_paths_substitute_each_hour() {
        let root = tempfile::tempdir().unwrap();
        let tracer = Tracer::new(Arc::new(config_with(root.path(), &["USSDGW"])));
        let request = request(serde_json::json!({
            "filter": {"type": "text", "value": "ERROR"},
            "period": {"from": "2022-01-01 10:00:00", "to": "2022-01-01 12:00:00"},
            "apps": {"USSDGW": ["u1"]}
        }));
        let run = RunContext::new(root.path(), ts("2022-02-09 11:56:07"), "ERROR");

        let tasks = tracer.materialize(&request, &run).unwrap();
        let paths: Vec<_> = tasks.iter().map(|t| t.remote_log_path.as_str()).collect();

        assert_eq!(
            paths,
            vec![
                "/aux1/ussdgw/logs/ussdgw_2022010110.log",
                "/aux1/ussdgw/logs/ussdgw_2022010111.log",
            ]
        );
    }
}
