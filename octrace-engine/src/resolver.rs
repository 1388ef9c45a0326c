//! Remote log path resolution
//!
//! Translates an app's log template plus an hour boundary into the
//! concrete rotated log file that hour was written to on every host
//! running the app.

use chrono::NaiveDateTime;

use octrace_core::hours;

use crate::config::LogTemplate;

/// Resolves the remote log file an app wrote during `hour`
///
/// `/aux1/browser/logs` + `browser_` + `2021041110` + `.log` becomes
/// `/aux1/browser/logs/browser_2021041110.log`. Remote paths are plain
/// strings; they name files on the traced hosts, not locally.
pub fn resolve_log_path(template: &LogTemplate, hour: NaiveDateTime) -> String {
    format!(
        "{}/{}{}{}",
        template.path.trim_end_matches('/'),
        template.prefix,
        hours::hour_stamp(hour),
        template.suffix
    )
}
