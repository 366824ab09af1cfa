//! Port interfaces for heartbeat storage
//!
//! These traits define the boundary between core aggregation logic and the
//! persistence engine. Only the query contract is fixed here; index strategy
//! and storage internals belong to the adapter.

use async_trait::async_trait;
use tempo_domain::{HeartbeatSpan, PublicUser, Result};
use uuid::Uuid;

/// Read-side contract of the heartbeat store.
///
/// Window queries return rows ascending by timestamp, each annotated with
/// its session-end candidate (the next row's timestamp for the same
/// user). Store failures surface as
/// [`TempoError::StoreUnavailable`](tempo_domain::TempoError::StoreUnavailable)
/// and are never retried by this layer.
#[async_trait]
pub trait HeartbeatStore: Send + Sync {
    /// Fetch one user's heartbeats in `[start_ts, end_ts)`.
    ///
    /// With `write_only`, only heartbeats flagged `is_write` are returned.
    async fn fetch_window(
        &self,
        user_id: Uuid,
        start_ts: f64,
        end_ts: f64,
        write_only: bool,
    ) -> Result<Vec<HeartbeatSpan>>;

    /// Fetch write heartbeats across all users in `[start_ts, end_ts)`,
    /// optionally pre-filtered to a single language.
    async fn fetch_window_all_users(
        &self,
        start_ts: f64,
        end_ts: f64,
        language: Option<&str>,
    ) -> Result<Vec<HeartbeatSpan>>;

    /// IANA timezone identifier configured for the user.
    async fn fetch_user_timezone(&self, user_id: Uuid) -> Result<String>;

    /// Public profile fields for the user, if the user exists.
    async fn fetch_user_profile(&self, user_id: Uuid) -> Result<Option<PublicUser>>;
}
