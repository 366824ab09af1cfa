//! Heartbeat types
//!
//! A heartbeat is a single timestamped activity ping from a client editor
//! plugin, tagged with project/language/file context. Timestamps are
//! client-supplied fractional seconds and are not guaranteed monotonic
//! across machines.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TempoError;

/// What kind of entity a heartbeat refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    App,
    File,
    Domain,
}

impl EntityKind {
    /// Stable string form, matching the wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::File => "file",
            Self::Domain => "domain",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = TempoError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "app" => Ok(Self::App),
            "file" => Ok(Self::File),
            "domain" => Ok(Self::Domain),
            other => Err(TempoError::InvalidInput(format!("unknown entity type: {other}"))),
        }
    }
}

/// Optional activity tag attached to a heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    Coding,
    Building,
    Indexing,
    Debugging,
    Browsing,
    #[serde(rename = "running tests")]
    RunningTests,
    #[serde(rename = "writing tests")]
    WritingTests,
    #[serde(rename = "manual testing")]
    ManualTesting,
    #[serde(rename = "code reviewing")]
    CodeReviewing,
    Designing,
}

impl ActivityCategory {
    /// Stable string form, matching the wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Coding => "coding",
            Self::Building => "building",
            Self::Indexing => "indexing",
            Self::Debugging => "debugging",
            Self::Browsing => "browsing",
            Self::RunningTests => "running tests",
            Self::WritingTests => "writing tests",
            Self::ManualTesting => "manual testing",
            Self::CodeReviewing => "code reviewing",
            Self::Designing => "designing",
        }
    }
}

impl FromStr for ActivityCategory {
    type Err = TempoError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "coding" => Ok(Self::Coding),
            "building" => Ok(Self::Building),
            "indexing" => Ok(Self::Indexing),
            "debugging" => Ok(Self::Debugging),
            "browsing" => Ok(Self::Browsing),
            "running tests" => Ok(Self::RunningTests),
            "writing tests" => Ok(Self::WritingTests),
            "manual testing" => Ok(Self::ManualTesting),
            "code reviewing" => Ok(Self::CodeReviewing),
            "designing" => Ok(Self::Designing),
            other => Err(TempoError::InvalidInput(format!("unknown activity category: {other}"))),
        }
    }
}

/// A stored heartbeat row. Immutable once ingested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heartbeat {
    pub id: Uuid,
    pub user_id: Uuid,
    pub machine_id: Option<Uuid>,
    /// Path or identifier of the entity being worked on.
    pub entity: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub category: Option<ActivityCategory>,
    /// Client-supplied POSIX timestamp, fractional seconds.
    pub time: f64,
    pub is_write: bool,
    pub project: Option<String>,
    pub branch: Option<String>,
    pub language: Option<String>,
    pub lines: i64,
    pub lineno: Option<i64>,
    pub cursorpos: Option<i64>,
}

/// A heartbeat row annotated with its session-end candidate: the timestamp
/// of the next heartbeat in time order for the same user, or `None` for a
/// user's last row of a window.
///
/// This is the duration merger's input row type. The annotation is computed
/// by the store adapter with an in-memory forward scan over pre-sorted rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatSpan {
    pub user_id: Uuid,
    pub project: Option<String>,
    pub language: Option<String>,
    pub started_at: f64,
    pub ended_at: Option<f64>,
}
