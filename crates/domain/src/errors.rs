//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Tempo
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TempoError {
    /// Invalid date range supplied by the caller (start after end, or span
    /// beyond the summary cap). Raised before any store access.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Unrecognized IANA timezone identifier.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The heartbeat store failed or timed out. Fatal for the request; this
    /// layer never retries.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Tempo operations
pub type Result<T> = std::result::Result<T, TempoError>;
