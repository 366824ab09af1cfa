//! SQLite-backed heartbeat store.
//!
//! Implements the `HeartbeatStore` port over the shared connection pool.
//! Window queries fetch rows ascending by time; the session-end annotation
//! is an in-memory pass over the sorted rows (`annotate_sessions`), not a
//! query-engine window function, so the merge pipeline stays portable.
//!
//! Also carries the ingestion path: inserts skip a heartbeat when one for
//! the same user and entity already exists within 60 seconds. The check is
//! not atomic with the insert, so concurrent identical submissions may both
//! land; the merger tolerates the duplicates.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tempo_core::durations::annotate_sessions;
use tempo_core::ports::HeartbeatStore;
use tempo_domain::constants::INGEST_DEDUP_WINDOW_SECS;
use tempo_domain::{
    Heartbeat, HeartbeatSpan, PublicUser, Result as DomainResult, TempoError,
};
use tokio::task;
use tracing::debug;
use uuid::Uuid;

use super::manager::DbManager;
use crate::errors::InfraError;

const HEARTBEAT_COLUMNS: &str = "id, user_id, machine_id, entity, type, category, time, \
                                 is_write, project, branch, language, lines, lineno, cursorpos";

/// Heartbeat store backed by SQLite.
pub struct SqliteHeartbeatStore {
    db: Arc<DbManager>,
}

impl SqliteHeartbeatStore {
    /// Construct a store backed by the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Insert a heartbeat unless a duplicate exists within the dedup
    /// window. Returns whether a row was written.
    pub async fn insert_heartbeat(&self, heartbeat: Heartbeat) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let inserted = insert_checked(&conn, &heartbeat).map_err(map_sql_error)?;
            if !inserted {
                debug!(user_id = %heartbeat.user_id, entity = %heartbeat.entity, "duplicate heartbeat skipped");
            }
            Ok(inserted)
        })
        .await
        .map_err(map_join_error)?
    }

    /// Create a user row with public profile fields and a timezone.
    pub async fn create_user(&self, profile: PublicUser, timezone: String) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO users (id, username, display_name, website, timezone, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    profile.id.to_string(),
                    profile.username,
                    profile.display_name,
                    profile.website,
                    timezone,
                    Utc::now().timestamp(),
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait::async_trait]
impl HeartbeatStore for SqliteHeartbeatStore {
    async fn fetch_window(
        &self,
        user_id: Uuid,
        start_ts: f64,
        end_ts: f64,
        write_only: bool,
    ) -> DomainResult<Vec<HeartbeatSpan>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> DomainResult<Vec<HeartbeatSpan>> {
            let conn = db.get_connection()?;
            let rows = query_user_window(&conn, user_id, start_ts, end_ts, write_only)
                .map_err(map_sql_error)?;
            Ok(annotate_sessions(&rows))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn fetch_window_all_users(
        &self,
        start_ts: f64,
        end_ts: f64,
        language: Option<&str>,
    ) -> DomainResult<Vec<HeartbeatSpan>> {
        let db = Arc::clone(&self.db);
        let language = language.map(str::to_string);
        task::spawn_blocking(move || -> DomainResult<Vec<HeartbeatSpan>> {
            let conn = db.get_connection()?;
            let rows = query_all_users_window(&conn, start_ts, end_ts, language.as_deref())
                .map_err(map_sql_error)?;
            Ok(annotate_sessions(&rows))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn fetch_user_timezone(&self, user_id: Uuid) -> DomainResult<String> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> DomainResult<String> {
            let conn = db.get_connection()?;
            let tz: Option<String> = conn
                .query_row(
                    "SELECT timezone FROM users WHERE id = ?1",
                    params![user_id.to_string()],
                    |row| row.get(0),
                )
                .optional()
                .map_err(map_sql_error)?;

            tz.ok_or_else(|| TempoError::NotFound(format!("user {user_id}")))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn fetch_user_profile(&self, user_id: Uuid) -> DomainResult<Option<PublicUser>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> DomainResult<Option<PublicUser>> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT id, username, display_name, website FROM users WHERE id = ?1",
                params![user_id.to_string()],
                row_to_profile,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn query_user_window(
    conn: &Connection,
    user_id: Uuid,
    start_ts: f64,
    end_ts: f64,
    write_only: bool,
) -> rusqlite::Result<Vec<Heartbeat>> {
    let sql = format!(
        "SELECT {HEARTBEAT_COLUMNS} FROM heartbeats
         WHERE user_id = ?1 AND time >= ?2 AND time < ?3 AND (?4 = 0 OR is_write = 1)
         ORDER BY time ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![user_id.to_string(), start_ts, end_ts, write_only],
        row_to_heartbeat,
    )?;
    rows.collect()
}

fn query_all_users_window(
    conn: &Connection,
    start_ts: f64,
    end_ts: f64,
    language: Option<&str>,
) -> rusqlite::Result<Vec<Heartbeat>> {
    let sql = format!(
        "SELECT {HEARTBEAT_COLUMNS} FROM heartbeats
         WHERE is_write = 1 AND time >= ?1 AND time < ?2 AND (?3 IS NULL OR language = ?3)
         ORDER BY time ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![start_ts, end_ts, language], row_to_heartbeat)?;
    rows.collect()
}

fn insert_checked(conn: &Connection, heartbeat: &Heartbeat) -> rusqlite::Result<bool> {
    // best-effort dedup; check-then-act without atomicity
    let duplicate: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM heartbeats
             WHERE user_id = ?1 AND entity = ?2 AND ABS(time - ?3) < ?4
             LIMIT 1",
            params![
                heartbeat.user_id.to_string(),
                heartbeat.entity,
                heartbeat.time,
                INGEST_DEDUP_WINDOW_SECS,
            ],
            |row| row.get(0),
        )
        .optional()?;

    if duplicate.is_some() {
        return Ok(false);
    }

    conn.execute(
        "INSERT INTO heartbeats (id, user_id, machine_id, entity, type, category, time,
                                 is_write, project, branch, language, lines, lineno, cursorpos)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            heartbeat.id.to_string(),
            heartbeat.user_id.to_string(),
            heartbeat.machine_id.map(|id| id.to_string()),
            heartbeat.entity,
            heartbeat.kind.as_str(),
            heartbeat.category.map(|c| c.as_str()),
            heartbeat.time,
            heartbeat.is_write,
            heartbeat.project,
            heartbeat.branch,
            heartbeat.language,
            heartbeat.lines,
            heartbeat.lineno,
            heartbeat.cursorpos,
        ],
    )?;
    Ok(true)
}

fn row_to_heartbeat(row: &Row<'_>) -> rusqlite::Result<Heartbeat> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let machine_id: Option<String> = row.get(2)?;
    let kind: String = row.get(4)?;
    let category: Option<String> = row.get(5)?;

    Ok(Heartbeat {
        id: parse_uuid(0, &id)?,
        user_id: parse_uuid(1, &user_id)?,
        machine_id: machine_id.as_deref().map(|m| parse_uuid(2, m)).transpose()?,
        entity: row.get(3)?,
        kind: parse_field(4, &kind)?,
        category: category.as_deref().map(|c| parse_field(5, c)).transpose()?,
        time: row.get(6)?,
        is_write: row.get(7)?,
        project: row.get(8)?,
        branch: row.get(9)?,
        language: row.get(10)?,
        lines: row.get(11)?,
        lineno: row.get(12)?,
        cursorpos: row.get(13)?,
    })
}

fn row_to_profile(row: &Row<'_>) -> rusqlite::Result<PublicUser> {
    let id: String = row.get(0)?;
    Ok(PublicUser {
        id: parse_uuid(0, &id)?,
        username: row.get(1)?,
        display_name: row.get(2)?,
        website: row.get(3)?,
    })
}

fn parse_uuid(idx: usize, value: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

fn parse_field<T>(idx: usize, value: &str) -> rusqlite::Result<T>
where
    T: FromStr<Err = TempoError>,
{
    T::from_str(value)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

fn map_sql_error(err: rusqlite::Error) -> TempoError {
    TempoError::from(InfraError::from(err))
}

fn map_join_error(err: task::JoinError) -> TempoError {
    TempoError::from(InfraError::from(err))
}
