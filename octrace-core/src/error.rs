//! Validation errors for inbound trace requests

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors produced while validating a raw trace request
///
/// Validation is fail-fast: the first violation is returned and no remote
/// work is started.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No filter type is provided
    #[error("no filter type is provided")]
    MissingFilterType,

    /// No filter value is provided
    #[error("no filter value is provided")]
    MissingFilterValue,

    /// A period bound does not parse in the expected format
    #[error("period '{field}' is not a 'YYYY-MM-DD HH:MM:SS' timestamp: {value}")]
    BadTimestamp { field: &'static str, value: String },

    /// The period bounds are contradictory
    #[error("period 'from' {from} is after period 'to' {to}")]
    InvertedPeriod {
        from: NaiveDateTime,
        to: NaiveDateTime,
    },

    /// The apps mapping is empty
    #[error("no apps are provided")]
    NoApps,

    /// An app has an empty host list
    #[error("no hosts are provided for app {app}")]
    NoHosts { app: String },
}
