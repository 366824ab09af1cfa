//! Duration types
//!
//! A duration is a merged contiguous time interval derived from one or more
//! heartbeats belonging to the same grouping key. Durations are computed on
//! demand per request and never persisted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A merged contiguous work interval. Invariant: `start <= end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Duration {
    pub user_id: Uuid,
    pub project: Option<String>,
    pub language: Option<String>,
    /// POSIX timestamp, fractional seconds.
    pub start: f64,
    /// POSIX timestamp, fractional seconds.
    pub end: f64,
}

impl Duration {
    /// Length of the interval in seconds.
    pub fn seconds(&self) -> f64 {
        self.end - self.start
    }
}

/// Display form of a [`Duration`] with start/end rendered as RFC 3339
/// local-time strings. Returned by the non-raw durations operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationView {
    pub project: Option<String>,
    pub language: Option<String>,
    pub start: String,
    pub end: String,
}
