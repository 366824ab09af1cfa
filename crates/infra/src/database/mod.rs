//! SQLite database adapters

pub mod heartbeat_store;
pub mod manager;

pub use heartbeat_store::SqliteHeartbeatStore;
pub use manager::DbManager;
