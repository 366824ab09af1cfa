//! # Tempo Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The SQLite-backed heartbeat store (pool, schema, port adapter)
//! - Heartbeat ingestion with the best-effort dedup check
//! - The configuration loader
//!
//! ## Architecture
//! - Implements traits defined in `tempo-core`
//! - Depends on `tempo-domain` and `tempo-core`
//! - Contains all "impure" code (I/O, SQL)

pub mod config;
pub mod database;
pub mod errors;

// Re-export commonly used items
pub use database::{DbManager, SqliteHeartbeatStore};
pub use errors::InfraError;
