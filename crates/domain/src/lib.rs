//! # Tempo Domain
//!
//! Business domain types and models for Tempo.
//!
//! This crate contains:
//! - Domain data types (Heartbeat, Duration, Summary, Leaderboard, ...)
//! - Domain error types and Result definitions
//! - Domain constants (merge threshold, range caps, page sizes)
//!
//! ## Architecture
//! - No dependencies on other Tempo crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::{Config, DatabaseConfig, LeaderboardConfig};
pub use errors::{Result, TempoError};
pub use types::{
    ActivityCategory, Duration, DurationView, EntityKind, Heartbeat, HeartbeatSpan, LanguageTotal,
    Leaderboard, LeaderboardEntry, LeaderboardRange, PublicUser, Summary, SummaryBucket,
    SummaryRange,
};
