//! Configuration structures
//!
//! Loaded by the infra config loader from environment variables or a TOML
//! file; defaults cover local development.

use serde::{Deserialize, Serialize};

use crate::constants::LEADERBOARD_PAGE_SIZE;

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
}

/// SQLite database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file path.
    pub path: String,
    /// Connection pool size.
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "tempo.db".to_string(), pool_size: 4 }
    }
}

/// Leaderboard pagination settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Users per leaderboard page.
    pub page_size: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self { page_size: LEADERBOARD_PAGE_SIZE }
    }
}
