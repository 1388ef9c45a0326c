//! Remote fetch execution
//!
//! Runs one filtered search on a remote host over a non-interactive,
//! key-based ssh session and streams its output into the task's result
//! file. Remote stdout lines are written first, stderr lines after them;
//! both land in the same file. That concatenation is the documented
//! contract, so remote error text is preserved next to the matches.

use std::io;
use std::process::Stdio;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use octrace_core::domain::task::FetchTask;

use crate::config::Config;
use crate::error::FetchError;

/// Transport settings for remote fetches, extracted from [`Config`] so
/// workers do not carry the whole configuration
#[derive(Debug, Clone)]
pub struct Transport {
    pub program: String,
    pub user: String,
    pub timeout: Option<Duration>,
}

impl Transport {
    pub fn from_config(config: &Config) -> Self {
        Self {
            program: config.ssh_program.clone(),
            user: config.ssh_user.clone(),
            timeout: config.fetch_timeout(),
        }
    }
}

/// Argv executed on the remote host
///
/// nice/ionice de-prioritize the search so the traced host is not
/// starved; `zgrep -aE` gives a binary-safe extended-regex filter that
/// also handles compressed rotated logs. The filter value and the log
/// path stay separate argv elements; nothing is joined into a shell
/// string locally.
pub fn remote_argv(task: &FetchTask) -> Vec<String> {
    let mut argv: Vec<String> = ["nice", "-n", "19", "ionice", "-c2", "-n7", "/usr/bin/zgrep", "-aE"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    argv.push(task.filter.value.clone());
    argv.push(task.remote_log_path.clone());
    argv
}

/// Full argv passed to the local transport binary
pub fn transport_argv(transport: &Transport, task: &FetchTask) -> Vec<String> {
    let mut argv = vec![
        "-oBatchMode=yes".to_string(),
        format!("{}@{}", transport.user, task.host),
    ];
    argv.extend(remote_argv(task));
    argv
}

/// Executes one fetch task to completion
///
/// Blocks until the remote process terminates (or the configured
/// deadline elapses). Failures are terminal for this task only; the
/// caller records them without touching any other worker.
pub async fn fetch(transport: &Transport, task: &FetchTask) -> Result<(), FetchError> {
    info!(
        "Processing {} at {}: {}",
        task.app, task.host, task.remote_log_path
    );

    match transport.timeout {
        Some(limit) => tokio::time::timeout(limit, run_fetch(transport, task))
            .await
            .map_err(|_| FetchError::TimedOut(limit))?,
        None => run_fetch(transport, task).await,
    }
}

async fn run_fetch(transport: &Transport, task: &FetchTask) -> Result<(), FetchError> {
    // kill_on_drop: a timed-out fetch drops this future mid-flight, and
    // an I/O error returns before wait(); either way the transport child
    // must not be left running
    let mut child = Command::new(&transport.program)
        .args(transport_argv(transport, task))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| FetchError::Spawn {
            program: transport.program.clone(),
            source,
        })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| FetchError::Io(io::Error::other("child stdout not captured")))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| FetchError::Io(io::Error::other("child stderr not captured")))?;

    // stderr is drained concurrently so a chatty remote can not fill the
    // pipe and deadlock the stdout stream; its lines are appended after
    // stdout to keep the documented file order.
    let stderr_drain = tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        let mut collected = Vec::new();
        while let Ok(Some(line)) = lines.next_line().await {
            collected.push(line);
        }
        collected
    });

    let mut file = File::create(&task.result_file).await?;
    let mut lines = BufReader::new(stdout).lines();
    while let Some(line) = lines.next_line().await? {
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
    }

    let status = child.wait().await?;
    let stderr_lines = stderr_drain.await.unwrap_or_default();
    for line in &stderr_lines {
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
    }
    file.flush().await?;

    // zgrep exits 1 when nothing matched; an empty result file is a
    // valid outcome, not a failure
    debug!(
        "Fetch for {} at {} exited with {} ({} stderr line(s))",
        task.app,
        task.host,
        status,
        stderr_lines.len()
    );
    Ok(())
}
