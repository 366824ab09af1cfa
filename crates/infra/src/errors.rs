//! Infrastructure error types
//!
//! Adapter-level errors that convert into the domain error before crossing
//! the port boundary. SQLite and pool failures map to `StoreUnavailable`:
//! fatal for the request, never retried here.

use tempo_domain::TempoError;
use thiserror::Error;

/// Errors raised inside infrastructure adapters.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<InfraError> for TempoError {
    fn from(err: InfraError) -> Self {
        match err {
            InfraError::Sqlite(e) => Self::StoreUnavailable(e.to_string()),
            InfraError::Pool(e) => Self::StoreUnavailable(e.to_string()),
            InfraError::Config(msg) => Self::Config(msg),
            InfraError::Join(e) => Self::Internal(e.to_string()),
        }
    }
}
