//! Summary types
//!
//! Per-day aggregates of durations bucketed by project and by language,
//! each with a percentage of the day's total tracked time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One name's share of a day's tracked time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryBucket {
    pub name: String,
    pub total_seconds: f64,
    /// `round(total_seconds / grand_total, 2) * 100`. Entries are rounded
    /// independently, so a day's percentages need not sum to exactly 100.
    pub percent: f64,
}

/// The local calendar day a summary covers, with its UTC window bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRange {
    pub date: NaiveDate,
    /// UTC timestamp of the local day's first second.
    pub start: f64,
    /// UTC timestamp of the local day's last second.
    pub end: f64,
}

/// Aggregate of one local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub range: SummaryRange,
    /// Sum of all duration lengths for the day; each duration counted once,
    /// not once per bucket.
    pub grand_total_seconds: f64,
    /// Sorted by descending seconds, first-insertion order on ties.
    pub projects: Vec<SummaryBucket>,
    /// Sorted by descending seconds, first-insertion order on ties.
    pub languages: Vec<SummaryBucket>,
}
