//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

/// Maximum gap, in seconds, between a row's session end and the open
/// duration's end for the two to be folded into one duration.
pub const MERGE_THRESHOLD_SECS: f64 = 600.0;

/// Maximum inclusive span, in days, accepted by the summary aggregator.
pub const MAX_SUMMARY_SPAN_DAYS: i64 = 31;

/// Length of the leaderboard's trailing window, in days.
pub const LEADERBOARD_WINDOW_DAYS: i64 = 7;

/// Users per leaderboard page.
pub const LEADERBOARD_PAGE_SIZE: usize = 20;

/// Bucket label used when a heartbeat carries no project or language.
pub const DEFAULT_BUCKET_LABEL: &str = "Other";

/// Ingestion skips a heartbeat when one for the same user and entity already
/// exists within this many seconds. Best effort only; the check is not
/// atomic, so the merger must tolerate duplicates.
pub const INGEST_DEDUP_WINDOW_SECS: f64 = 60.0;
