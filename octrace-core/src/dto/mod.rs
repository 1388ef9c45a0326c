//! Wire request accepted by the trace API
//!
//! The raw JSON shape is kept separate from the validated domain type:
//! timestamps arrive as strings and nothing is trusted until
//! [`TraceParams::validate`] has run.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::request::{Filter, TIMESTAMP_FORMAT, TraceRequest};
use crate::error::ValidationError;
use crate::hours::HourRange;

/// Raw trace request as posted to the API
///
/// ```json
/// { "filter": {"type": "text", "value": "ERROR"},
///   "period": {"from": "2022-01-01 10:00:00", "to": "2022-01-01 13:00:00"},
///   "apps": {"USSDGW": ["ussdgw1", "ussdgw2"]} }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceParams {
    pub filter: Filter,
    pub period: PeriodParams,
    #[serde(default)]
    pub apps: BTreeMap<String, Vec<String>>,
}

/// Raw period bounds, `YYYY-MM-DD HH:MM:SS`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodParams {
    pub from: String,
    pub to: String,
}

impl TraceParams {
    /// Validates the raw request into a [`TraceRequest`]
    ///
    /// Checks run in a fixed order and the first violation wins: filter
    /// type, filter value, `period.from`, `period.to`, bound ordering,
    /// apps mapping, per-app host lists. No partial acceptance.
    pub fn validate(self) -> Result<TraceRequest, ValidationError> {
        if self.filter.kind.trim().is_empty() {
            return Err(ValidationError::MissingFilterType);
        }
        if self.filter.value.trim().is_empty() {
            return Err(ValidationError::MissingFilterValue);
        }

        let from = parse_timestamp("from", &self.period.from)?;
        let to = parse_timestamp("to", &self.period.to)?;
        let window = HourRange::new(from, to)?;

        if self.apps.is_empty() {
            return Err(ValidationError::NoApps);
        }
        for (app, hosts) in &self.apps {
            if hosts.is_empty() {
                return Err(ValidationError::NoHosts { app: app.clone() });
            }
        }

        Ok(TraceRequest {
            filter: self.filter,
            window,
            apps: self.apps,
        })
    }
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<NaiveDateTime, ValidationError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|_| {
        ValidationError::BadTimestamp {
            field,
            value: value.to_string(),
        }
    })
}
