//! Hour-window expansion
//!
//! Application logs are rotated hourly, so a trace request over
//! `[from, to)` decomposes into one log file per hour boundary. The
//! expansion is an explicit, finite, restartable range rather than a
//! one-shot stream: the scheduler iterates it once per app, and tests
//! can count and re-iterate it without side effects.

use chrono::{Duration, NaiveDateTime};

use crate::error::ValidationError;

/// Format of an hour boundary inside log file names and result paths,
/// e.g. `2022020519`
pub const HOUR_FORMAT: &str = "%Y%m%d%H";

/// Formats an hour boundary for log file names and result directories
pub fn hour_stamp(hour: NaiveDateTime) -> String {
    hour.format(HOUR_FORMAT).to_string()
}

/// Ordered, finite sequence of hour boundaries covering `[from, to)`
///
/// Starts at `from` and advances in one-hour steps while strictly below
/// `to`; `to` itself is never yielded. `from == to` is a valid, empty
/// window. `from > to` is rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourRange {
    from: NaiveDateTime,
    to: NaiveDateTime,
}

impl HourRange {
    /// Creates the hour range for a validated period
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Result<Self, ValidationError> {
        if from > to {
            return Err(ValidationError::InvertedPeriod { from, to });
        }
        Ok(Self { from, to })
    }

    /// Inclusive lower bound of the window
    pub fn start(&self) -> NaiveDateTime {
        self.from
    }

    /// Exclusive upper bound of the window
    pub fn end(&self) -> NaiveDateTime {
        self.to
    }

    /// Iterates the hour boundaries; restartable
    pub fn iter(&self) -> Hours {
        Hours {
            next: self.from,
            to: self.to,
        }
    }

    /// Number of hour boundaries in the window
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// True for a zero-width window (`from == to`)
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

impl IntoIterator for &HourRange {
    type Item = NaiveDateTime;
    type IntoIter = Hours;

    fn into_iter(self) -> Hours {
        self.iter()
    }
}

/// Iterator over the hour boundaries of a [`HourRange`]
#[derive(Debug, Clone)]
pub struct Hours {
    next: NaiveDateTime,
    to: NaiveDateTime,
}

impl Iterator for Hours {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<NaiveDateTime> {
        if self.next < self.to {
            let current = self.next;
            self.next += Duration::hours(1);
            Some(current)
        } else {
            None
        }
    }
}
