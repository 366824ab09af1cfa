//! Leaderboard ranking
//!
//! Aggregates all users' merged durations over a trailing 7-day window into
//! ranked per-user totals, optionally filtered to one language, with
//! pagination. Results are point-in-time approximations: concurrent
//! ingestion outside the fetched snapshot is tolerated, not serialized
//! against.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use tempo_domain::constants::{
    DEFAULT_BUCKET_LABEL, LEADERBOARD_PAGE_SIZE, LEADERBOARD_WINDOW_DAYS,
};
use tempo_domain::{
    HeartbeatSpan, Leaderboard, LeaderboardEntry, LeaderboardRange, LanguageTotal, PublicUser,
    Result,
};
use tracing::debug;
use uuid::Uuid;

use crate::durations::{merge_spans, MergeScope};
use crate::ports::HeartbeatStore;

/// Per-user totals accumulated from merged durations, before ranking.
struct UserTotals {
    user_id: Uuid,
    total_seconds: f64,
    /// Language totals in first-insertion order; sorted at entry build time.
    languages: Vec<(String, f64)>,
}

/// Cross-user leaderboard ranking over a store window.
pub struct LeaderboardService {
    store: Arc<dyn HeartbeatStore>,
    page_size: usize,
}

impl LeaderboardService {
    /// Create a new leaderboard service backed by the given store, with the
    /// default page size of 20 users.
    pub fn new(store: Arc<dyn HeartbeatStore>) -> Self {
        Self { store, page_size: LEADERBOARD_PAGE_SIZE }
    }

    /// Override the page size, e.g. from
    /// [`LeaderboardConfig`](tempo_domain::LeaderboardConfig).
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Ranking over the trailing window ending at the start of the current
    /// UTC day. `page` is 0-based with 20 users per page.
    pub async fn compute_leaderboard(
        &self,
        requester: Uuid,
        page: usize,
        language: Option<&str>,
    ) -> Result<Leaderboard> {
        self.compute_leaderboard_at(requester, page, language, Utc::now()).await
    }

    /// Same as [`compute_leaderboard`](Self::compute_leaderboard) with an
    /// explicit reference instant, the seam deterministic tests use.
    pub async fn compute_leaderboard_at(
        &self,
        requester: Uuid,
        page: usize,
        language: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Leaderboard> {
        let range = trailing_window(now);

        let rows = self.store.fetch_window_all_users(range.start, range.end, language).await?;
        let ranked = rank_users(&rows);

        debug!(rows = rows.len(), users = ranked.len(), ?language, "ranked leaderboard window");

        let total_pages = ranked.len().div_ceil(self.page_size);
        let page_start = page.saturating_mul(self.page_size);
        let page_end = ranked.len().min(page_start + self.page_size);

        let mut entries = Vec::new();
        if page_start < ranked.len() {
            for (rank, totals) in ranked.iter().enumerate().take(page_end).skip(page_start) {
                entries.push(self.build_entry(rank, totals).await?);
            }
        }

        let mut current_user = None;
        if let Some(rank) = ranked.iter().position(|totals| totals.user_id == requester) {
            current_user = Some(self.build_entry(rank, &ranked[rank]).await?);
        }

        Ok(Leaderboard {
            range,
            page,
            total_pages,
            language: language.map(str::to_string),
            entries,
            current_user,
        })
    }

    async fn build_entry(&self, rank: usize, totals: &UserTotals) -> Result<LeaderboardEntry> {
        let user = self
            .store
            .fetch_user_profile(totals.user_id)
            .await?
            // a profile can lag behind freshly ingested heartbeats; fall
            // back to the id rather than dropping the entry
            .unwrap_or_else(|| PublicUser {
                id: totals.user_id,
                username: totals.user_id.to_string(),
                display_name: None,
                website: None,
            });

        let mut languages: Vec<LanguageTotal> = totals
            .languages
            .iter()
            .map(|(language, total_seconds)| LanguageTotal {
                language: language.clone(),
                total_seconds: *total_seconds,
            })
            .collect();
        languages.sort_by(|a, b| {
            b.total_seconds.partial_cmp(&a.total_seconds).unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(LeaderboardEntry { rank, user, total_seconds: totals.total_seconds, languages })
    }
}

/// Trailing 7 calendar days ending at the start of the current UTC day,
/// midnight-aligned rather than anchored at "now".
fn trailing_window(now: DateTime<Utc>) -> LeaderboardRange {
    let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let window_start = day_start - TimeDelta::days(LEADERBOARD_WINDOW_DAYS);

    LeaderboardRange {
        start: window_start.timestamp() as f64,
        end: day_start.timestamp() as f64,
    }
}

/// Regroup the all-users window per user preserving time order, merge each
/// user's spans with the project+language key, and rank descending by
/// total seconds. Ties break by user id so repeated runs over unchanged
/// data assign identical ranks.
fn rank_users(rows: &[HeartbeatSpan]) -> Vec<UserTotals> {
    let mut user_order: Vec<Uuid> = Vec::new();
    let mut spans_by_user: HashMap<Uuid, Vec<HeartbeatSpan>> = HashMap::new();

    for row in rows {
        spans_by_user
            .entry(row.user_id)
            .or_insert_with(|| {
                user_order.push(row.user_id);
                Vec::new()
            })
            .push(row.clone());
    }

    let mut ranked: Vec<UserTotals> = user_order
        .into_iter()
        .filter_map(|user_id| {
            let spans = spans_by_user.remove(&user_id)?;
            let durations = merge_spans(&spans, MergeScope::ProjectLanguage);

            let mut totals = UserTotals { user_id, total_seconds: 0.0, languages: Vec::new() };
            for duration in &durations {
                let seconds = duration.seconds();
                let label = duration.language.as_deref().unwrap_or(DEFAULT_BUCKET_LABEL);

                match totals.languages.iter_mut().find(|(name, _)| name == label) {
                    Some((_, total)) => *total += seconds,
                    None => totals.languages.push((label.to_string(), seconds)),
                }
                totals.total_seconds += seconds;
            }
            Some(totals)
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.total_seconds
            .partial_cmp(&a.total_seconds)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    ranked
}
