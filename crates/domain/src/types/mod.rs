//! Domain types and models

pub mod duration;
pub mod heartbeat;
pub mod leaderboard;
pub mod summary;
pub mod user;

// Re-export for convenience
pub use duration::{Duration, DurationView};
pub use heartbeat::{ActivityCategory, EntityKind, Heartbeat, HeartbeatSpan};
pub use leaderboard::{LanguageTotal, Leaderboard, LeaderboardEntry, LeaderboardRange};
pub use summary::{Summary, SummaryBucket, SummaryRange};
pub use user::PublicUser;
