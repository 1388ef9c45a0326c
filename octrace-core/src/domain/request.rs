//! Validated trace request

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hours::HourRange;

/// Timestamp format of the `period` bounds in the wire request
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Line filter applied on every remote host
///
/// `value` is used verbatim as an extended-regex pattern; it is always
/// passed to the remote search as its own argument, never interpolated
/// into a shell string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Filter {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// A validated trace request
///
/// Produced only by [`crate::dto::TraceParams::validate`], so its
/// invariants hold by construction: filter fields are non-empty, the
/// window bounds are ordered, `apps` is non-empty and every host list is
/// non-empty. `apps` is a `BTreeMap` so task materialization order is
/// stable across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRequest {
    pub filter: Filter,
    pub window: HourRange,
    pub apps: BTreeMap<String, Vec<String>>,
}

impl TraceRequest {
    /// Total number of fetch tasks this request expands into
    pub fn task_count(&self) -> usize {
        let hours = self.window.len();
        self.apps.values().map(|hosts| hosts.len() * hours).sum()
    }
}
