//! # Tempo Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The duration merge fold and per-user duration service
//! - The day-bucketed summary aggregator
//! - The cross-user leaderboard ranker
//! - Timezone normalization between local calendar days and UTC windows
//! - The `HeartbeatStore` port trait
//!
//! ## Architecture Principles
//! - Only depends on `tempo-domain`
//! - No database, HTTP, or platform code
//! - All external collaborators reached via traits
//! - Pure, testable business logic

pub mod durations;
pub mod leaderboard;
pub mod ports;
pub mod summary;
pub mod timezone;

// Re-export specific items to avoid ambiguity
pub use durations::{annotate_sessions, merge_spans, DurationService, MergeScope};
pub use leaderboard::LeaderboardService;
pub use ports::HeartbeatStore;
pub use summary::SummaryService;
