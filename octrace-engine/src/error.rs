//! Error types for the trace engine
//!
//! The taxonomy mirrors the run lifecycle: configuration and directory
//! failures abort a run before any worker is dispatched; fetch failures
//! are isolated to the worker that hit them.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while loading or querying the engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("can not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file is not valid JSON
    #[error("config file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No log template is configured for an app named in a request
    #[error("no log template configured for app {app}")]
    UnknownApp { app: String },

    /// A log template field is missing or empty
    #[error("log template for app {app} has an empty '{field}' field")]
    EmptyTemplateField { app: String, field: &'static str },

    /// The concurrency bound is zero
    #[error("max_parallel_fetches must be greater than 0")]
    NoParallelism,
}

/// Errors that abort a trace run before any worker is dispatched
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An output directory could not be created
    #[error("directory {path} can not be created: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Per-task fetch failures
///
/// Terminal for the task that hit them, invisible to every other task;
/// the scheduler records them in the run summary.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The local transport binary could not be started
    #[error("can not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// I/O failure while streaming remote output to the result file
    #[error("i/o error while streaming results: {0}")]
    Io(#[from] io::Error),

    /// The configured per-task deadline elapsed
    #[error("remote fetch did not finish within {0:?}")]
    TimedOut(Duration),
}
