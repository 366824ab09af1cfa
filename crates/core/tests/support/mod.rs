//! Shared test helpers for `tempo-core` integration tests.
//!
//! Provides an in-memory mock of the `HeartbeatStore` port so service tests
//! stay deterministic and free of database dependencies.

#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use tempo_core::{annotate_sessions, HeartbeatStore};
use tempo_domain::{
    EntityKind, Heartbeat, HeartbeatSpan, PublicUser, Result as DomainResult, TempoError,
};
use uuid::Uuid;

/// In-memory mock for `HeartbeatStore`.
///
/// Stores a fixed set of heartbeats plus per-user timezones and profiles.
/// Window queries sort ascending by time and annotate session ends the same
/// way the real adapter does.
#[derive(Default, Clone)]
pub struct MockHeartbeatStore {
    heartbeats: Vec<Heartbeat>,
    timezones: HashMap<Uuid, String>,
    profiles: HashMap<Uuid, PublicUser>,
    offline: bool,
}

impl MockHeartbeatStore {
    /// Create an empty mock; users default to the UTC timezone.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose every query fails with `StoreUnavailable`.
    pub fn offline() -> Self {
        Self { offline: true, ..Self::default() }
    }

    pub fn with_heartbeat(mut self, heartbeat: Heartbeat) -> Self {
        self.heartbeats.push(heartbeat);
        self
    }

    pub fn with_heartbeats(mut self, heartbeats: impl IntoIterator<Item = Heartbeat>) -> Self {
        self.heartbeats.extend(heartbeats);
        self
    }

    pub fn with_timezone(mut self, user_id: Uuid, tz: &str) -> Self {
        self.timezones.insert(user_id, tz.to_string());
        self
    }

    pub fn with_profile(mut self, profile: PublicUser) -> Self {
        self.profiles.insert(profile.id, profile);
        self
    }

    fn check_online(&self) -> DomainResult<()> {
        if self.offline {
            return Err(TempoError::StoreUnavailable("mock store offline".to_string()));
        }
        Ok(())
    }

    fn sorted_window(&self, rows: Vec<Heartbeat>) -> Vec<HeartbeatSpan> {
        let mut rows = rows;
        rows.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(Ordering::Equal));
        annotate_sessions(&rows)
    }
}

#[async_trait]
impl HeartbeatStore for MockHeartbeatStore {
    async fn fetch_window(
        &self,
        user_id: Uuid,
        start_ts: f64,
        end_ts: f64,
        write_only: bool,
    ) -> DomainResult<Vec<HeartbeatSpan>> {
        self.check_online()?;
        let rows = self
            .heartbeats
            .iter()
            .filter(|h| {
                h.user_id == user_id
                    && h.time >= start_ts
                    && h.time < end_ts
                    && (!write_only || h.is_write)
            })
            .cloned()
            .collect();
        Ok(self.sorted_window(rows))
    }

    async fn fetch_window_all_users(
        &self,
        start_ts: f64,
        end_ts: f64,
        language: Option<&str>,
    ) -> DomainResult<Vec<HeartbeatSpan>> {
        self.check_online()?;
        let rows = self
            .heartbeats
            .iter()
            .filter(|h| {
                h.is_write
                    && h.time >= start_ts
                    && h.time < end_ts
                    && language.map_or(true, |lang| h.language.as_deref() == Some(lang))
            })
            .cloned()
            .collect();
        Ok(self.sorted_window(rows))
    }

    async fn fetch_user_timezone(&self, user_id: Uuid) -> DomainResult<String> {
        self.check_online()?;
        Ok(self.timezones.get(&user_id).cloned().unwrap_or_else(|| "UTC".to_string()))
    }

    async fn fetch_user_profile(&self, user_id: Uuid) -> DomainResult<Option<PublicUser>> {
        self.check_online()?;
        Ok(self.profiles.get(&user_id).cloned())
    }
}

/// Heartbeat fixture with the fields the aggregators care about.
pub fn beat(user_id: Uuid, project: &str, language: &str, time: f64) -> Heartbeat {
    Heartbeat {
        id: Uuid::new_v4(),
        user_id,
        machine_id: None,
        entity: format!("/home/uwu/{project}.rs"),
        kind: EntityKind::File,
        category: None,
        time,
        is_write: true,
        project: Some(project.to_string()),
        branch: Some("main".to_string()),
        language: Some(language.to_string()),
        lines: 100,
        lineno: None,
        cursorpos: None,
    }
}

/// Read-only variant of [`beat`].
pub fn read_beat(user_id: Uuid, project: &str, language: &str, time: f64) -> Heartbeat {
    Heartbeat { is_write: false, ..beat(user_id, project, language, time) }
}

/// Public profile fixture.
pub fn profile(user_id: Uuid, username: &str) -> PublicUser {
    PublicUser {
        id: user_id,
        username: username.to_string(),
        display_name: Some(username.to_uppercase()),
        website: None,
    }
}
