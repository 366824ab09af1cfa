//! Leaderboard types
//!
//! Ranked per-user totals over a fixed trailing window. Computed per
//! request; point-in-time approximations, never persisted.

use serde::{Deserialize, Serialize};

use super::user::PublicUser;

/// UTC bounds of the leaderboard's trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRange {
    pub start: f64,
    pub end: f64,
}

/// Seconds tracked in one language by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageTotal {
    pub language: String,
    pub total_seconds: f64,
}

/// One user's row in the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 0-based position in the descending-by-total sort.
    pub rank: usize,
    pub user: PublicUser,
    pub total_seconds: f64,
    /// Per-language breakdown, sorted by descending seconds.
    pub languages: Vec<LanguageTotal>,
}

/// One requested page of the ranking, plus the requester's own entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub range: LeaderboardRange,
    pub page: usize,
    pub total_pages: usize,
    /// Language filter the ranking was restricted to, if any.
    pub language: Option<String>,
    pub entries: Vec<LeaderboardEntry>,
    /// The requesting user's entry, present whenever they tracked any time
    /// in the window, regardless of which page was requested.
    pub current_user: Option<LeaderboardEntry>,
}
