//! Duration merging
//!
//! Folds an ordered sequence of annotated heartbeats into merged contiguous
//! durations. The fold is pure and deterministic: no external state, no
//! I/O, total over any well-formed ordered input. Unordered rows or missing
//! required fields are a contract violation the caller must prevent.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tempo_domain::constants::MERGE_THRESHOLD_SECS;
use tempo_domain::{Duration, DurationView, Heartbeat, HeartbeatSpan, Result};
use tracing::debug;
use uuid::Uuid;

use crate::ports::HeartbeatStore;
use crate::timezone;

/// Which fields make up the merge grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeScope {
    /// Group by project only (per-user durations and summaries).
    Project,
    /// Group by project and language (leaderboard variant).
    ProjectLanguage,
}

/// Fold ascending-by-`started_at` spans into merged durations.
///
/// A row extends the open duration when its grouping key matches and the
/// gap between the row's effective end and the open duration's end is
/// strictly below the 600 s merge threshold; otherwise the open duration is
/// closed and a new one starts at the row. The final open duration is
/// always appended.
///
/// Boundary policy: a row with no session-end candidate (the window's last
/// row), or whose own extent reaches the threshold, closes at its start and
/// contributes a zero-width duration. The original dropped such rows; a
/// zero-width point keeps every heartbeat represented without inflating
/// totals.
///
/// Duplicate rows from the ingestion dedup race collapse naturally: a
/// repeated timestamp has gap zero and extends the open duration by
/// nothing.
pub fn merge_spans(rows: &[HeartbeatSpan], scope: MergeScope) -> Vec<Duration> {
    let mut merged: Vec<Duration> = Vec::new();
    let mut current: Option<Duration> = None;

    for row in rows {
        let end = effective_end(row);

        match current.as_mut() {
            Some(open) if same_group(open, row, scope) && end - open.end < MERGE_THRESHOLD_SECS => {
                if end > open.end {
                    open.end = end;
                }
            }
            _ => {
                if let Some(done) = current.take() {
                    merged.push(done);
                }
                current = Some(Duration {
                    user_id: row.user_id,
                    project: row.project.clone(),
                    language: row.language.clone(),
                    start: row.started_at,
                    end,
                });
            }
        }
    }

    if let Some(done) = current {
        merged.push(done);
    }

    merged
}

/// Session end a row actually contributes: its candidate when that stays
/// within the merge threshold, otherwise the row's own start.
fn effective_end(row: &HeartbeatSpan) -> f64 {
    match row.ended_at {
        Some(end) if end >= row.started_at && end - row.started_at < MERGE_THRESHOLD_SECS => end,
        _ => row.started_at,
    }
}

fn same_group(open: &Duration, row: &HeartbeatSpan, scope: MergeScope) -> bool {
    let project_matches = open.user_id == row.user_id && open.project == row.project;
    match scope {
        MergeScope::Project => project_matches,
        MergeScope::ProjectLanguage => project_matches && open.language == row.language,
    }
}

/// Annotate ascending-by-time heartbeats with their session-end candidate:
/// the timestamp of the next heartbeat for the same user, or `None` for a
/// user's last row in the window.
///
/// This is the explicit in-memory pass that replaces a query-engine window
/// function, so the merge pipeline stays portable across storage back ends.
/// Store adapters run it after fetching a sorted window; the output keeps
/// the input's order.
pub fn annotate_sessions(rows: &[Heartbeat]) -> Vec<HeartbeatSpan> {
    let mut next_for_user: HashMap<Uuid, f64> = HashMap::new();
    let mut spans = vec![
        HeartbeatSpan {
            user_id: Uuid::nil(),
            project: None,
            language: None,
            started_at: 0.0,
            ended_at: None,
        };
        rows.len()
    ];

    // walk backwards so each row sees the time of its user's next heartbeat
    for (i, row) in rows.iter().enumerate().rev() {
        spans[i] = HeartbeatSpan {
            user_id: row.user_id,
            project: row.project.clone(),
            language: row.language.clone(),
            started_at: row.time,
            ended_at: next_for_user.get(&row.user_id).copied(),
        };
        next_for_user.insert(row.user_id, row.time);
    }

    spans
}

/// Per-user duration computation over a store window.
pub struct DurationService {
    store: Arc<dyn HeartbeatStore>,
}

impl DurationService {
    /// Create a new duration service backed by the given store.
    pub fn new(store: Arc<dyn HeartbeatStore>) -> Self {
        Self { store }
    }

    /// Merged durations for one user over `[start_ts, end_ts)`, raw
    /// timestamps.
    pub async fn compute_durations(
        &self,
        user_id: Uuid,
        start_ts: f64,
        end_ts: f64,
    ) -> Result<Vec<Duration>> {
        let rows = self.store.fetch_window(user_id, start_ts, end_ts, false).await?;
        let durations = merge_spans(&rows, MergeScope::Project);

        debug!(%user_id, rows = rows.len(), durations = durations.len(), "merged window");
        Ok(durations)
    }

    /// Merged durations for one local calendar day, resolving the user's
    /// timezone through the store.
    pub async fn compute_durations_for_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Duration>> {
        let tz = self.store.fetch_user_timezone(user_id).await?;
        let (start_ts, end_ts) = timezone::local_day_to_utc_window(date, &tz)?;
        self.compute_durations(user_id, start_ts, end_ts).await
    }

    /// Display variant: start/end rendered as RFC 3339 strings in the
    /// user's local timezone.
    pub async fn compute_durations_display(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<DurationView>> {
        let tz = self.store.fetch_user_timezone(user_id).await?;
        let (start_ts, end_ts) = timezone::local_day_to_utc_window(date, &tz)?;

        let rows = self.store.fetch_window(user_id, start_ts, end_ts, false).await?;
        merge_spans(&rows, MergeScope::Project)
            .into_iter()
            .map(|duration| {
                Ok(DurationView {
                    project: duration.project,
                    language: duration.language,
                    start: timezone::utc_to_local(duration.start, &tz)?.to_rfc3339(),
                    end: timezone::utc_to_local(duration.end, &tz)?.to_rfc3339(),
                })
            })
            .collect()
    }
}
