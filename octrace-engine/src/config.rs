//! Engine configuration
//!
//! Loaded from a JSON file (path taken from `OCTRACE_CONFIG`, default
//! `octrace.json`). Maps app names to their rotated-log naming templates
//! and carries the results root plus transport and concurrency settings.
//! Template fields are validated at load time: a missing or empty field
//! is a hard configuration error, never a silently degraded path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "OCTRACE_CONFIG";

/// Config file used when [`CONFIG_ENV`] is unset
pub const DEFAULT_CONFIG_FILE: &str = "octrace.json";

/// Log file naming template for one application
///
/// The rotated log for hour `YYYYMMDDHH` lives at
/// `<path>/<prefix>YYYYMMDDHH<suffix>` on every host running the app.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogTemplate {
    pub path: String,
    pub prefix: String,
    pub suffix: String,
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory all run result trees are created under
    #[serde(default = "default_results_root")]
    pub results_root: PathBuf,

    /// Local binary used to open the remote session; overridable for
    /// tests and non-standard deployments
    #[serde(default = "default_ssh_program")]
    pub ssh_program: String,

    /// Remote account the fetch commands run as
    #[serde(default = "default_ssh_user")]
    pub ssh_user: String,

    /// Upper bound on concurrently running fetch workers
    #[serde(default = "default_max_parallel_fetches")]
    pub max_parallel_fetches: usize,

    /// Optional per-task deadline in seconds; absent means no timeout
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,

    /// App name (upper case) to log template
    #[serde(default)]
    pub apps: BTreeMap<String, LogTemplate>,
}

fn default_results_root() -> PathBuf {
    PathBuf::from("/aux1/trace-tool/results")
}

fn default_ssh_program() -> String {
    "ssh".to_string()
}

fn default_ssh_user() -> String {
    "trace-tool".to_string()
}

fn default_max_parallel_fetches() -> usize {
    64
}

impl Config {
    /// Loads and validates the configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        info!(
            "Loaded configuration from {} ({} app template(s))",
            path.display(),
            config.apps.len()
        );
        Ok(config)
    }

    /// Loads the configuration from the file named by `OCTRACE_CONFIG`,
    /// falling back to `octrace.json` in the working directory
    pub fn from_env() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load(Path::new(&path))
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_parallel_fetches == 0 {
            return Err(ConfigError::NoParallelism);
        }

        for (app, template) in &self.apps {
            for (field, value) in [
                ("path", &template.path),
                ("prefix", &template.prefix),
                ("suffix", &template.suffix),
            ] {
                if value.trim().is_empty() {
                    return Err(ConfigError::EmptyTemplateField {
                        app: app.clone(),
                        field,
                    });
                }
            }
        }

        Ok(())
    }

    /// Looks up the log template for an app; the key is case-normalized
    /// to upper case
    pub fn lookup(&self, app: &str) -> Result<&LogTemplate, ConfigError> {
        self.apps
            .get(&app.to_uppercase())
            .ok_or_else(|| ConfigError::UnknownApp {
                app: app.to_string(),
            })
    }

    /// Per-task deadline, if configured
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            results_root: default_results_root(),
            ssh_program: default_ssh_program(),
            ssh_user: default_ssh_user(),
            max_parallel_fetches: default_max_parallel_fetches(),
            fetch_timeout_secs: None,
            apps: BTreeMap::new(),
        }
    }
}
