//! Integration tests for the leaderboard ranker against a mock store.

mod support;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use support::{beat, profile, read_beat, MockHeartbeatStore};
use tempo_core::LeaderboardService;
use tempo_domain::TempoError;
use uuid::Uuid;

/// Fixed reference instant: mid-morning 2024-05-10 UTC. The ranking window
/// is then [2024-05-03 00:00, 2024-05-10 00:00) UTC.
fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-10T09:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Midnight UTC of 2024-05-09, one day inside the window.
const IN_WINDOW: f64 = 1_715_212_800.0;

#[tokio::test]
async fn ranks_descending_with_zero_based_ranks() {
    let (quiet, busy) = (Uuid::new_v4(), Uuid::new_v4());
    let store = MockHeartbeatStore::new()
        .with_profile(profile(quiet, "quiet"))
        .with_profile(profile(busy, "busy"))
        .with_heartbeats([
            beat(quiet, "awoo", "Rust", IN_WINDOW),
            beat(quiet, "awoo", "Rust", IN_WINDOW + 60.0),
            beat(busy, "nya", "Rust", IN_WINDOW),
            beat(busy, "nya", "Rust", IN_WINDOW + 480.0),
        ]);
    let service = LeaderboardService::new(Arc::new(store));

    let board = service.compute_leaderboard_at(busy, 0, None, now()).await.unwrap();

    assert_eq!(board.total_pages, 1);
    assert_eq!(board.entries.len(), 2);
    assert_eq!(board.entries[0].user.username, "busy");
    assert_eq!(board.entries[0].rank, 0);
    assert_eq!(board.entries[0].total_seconds, 480.0);
    assert_eq!(board.entries[1].user.username, "quiet");
    assert_eq!(board.entries[1].rank, 1);
}

#[tokio::test]
async fn repeated_runs_over_unchanged_data_are_identical() {
    let mut store = MockHeartbeatStore::new();
    for i in 0..6 {
        let user = Uuid::new_v4();
        store = store.with_profile(profile(user, &format!("user{i}"))).with_heartbeats([
            beat(user, "awoo", "Rust", IN_WINDOW),
            beat(user, "awoo", "Rust", IN_WINDOW + 100.0),
        ]);
    }
    let service = LeaderboardService::new(Arc::new(store));
    let requester = Uuid::new_v4();

    let first = service.compute_leaderboard_at(requester, 0, None, now()).await.unwrap();
    let second = service.compute_leaderboard_at(requester, 0, None, now()).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn paginates_and_always_returns_the_requesters_entry() {
    let mut store = MockHeartbeatStore::new();
    let mut users = Vec::new();

    // user i tracks (i + 1) * 10 seconds, so user 24 leads the board
    for i in 0..25u32 {
        let user = Uuid::new_v4();
        store = store.with_profile(profile(user, &format!("user{i}"))).with_heartbeats([
            beat(user, "awoo", "Rust", IN_WINDOW),
            beat(user, "awoo", "Rust", IN_WINDOW + f64::from(i + 1) * 10.0),
        ]);
        users.push(user);
    }
    let service = LeaderboardService::new(Arc::new(store));

    // user 0 has the smallest total: rank 24, on page 1
    let requester = users[0];
    let board = service.compute_leaderboard_at(requester, 0, None, now()).await.unwrap();

    assert_eq!(board.total_pages, 2);
    assert_eq!(board.entries.len(), 20);
    assert_eq!(board.entries[0].user.username, "user24");

    let own = board.current_user.expect("requester tracked time in the window");
    assert_eq!(own.rank, 24);
    assert_eq!(own.total_seconds, 10.0);

    let page1 = service.compute_leaderboard_at(requester, 1, None, now()).await.unwrap();
    assert_eq!(page1.entries.len(), 5);
    assert_eq!(page1.entries[0].rank, 20);

    // a page past the end is empty, not an error
    let page9 = service.compute_leaderboard_at(requester, 9, None, now()).await.unwrap();
    assert!(page9.entries.is_empty());
    assert_eq!(page9.total_pages, 2);
}

#[tokio::test]
async fn configured_page_size_changes_pagination() {
    let mut store = MockHeartbeatStore::new();
    let mut users = Vec::new();
    for i in 0..5u32 {
        let user = Uuid::new_v4();
        store = store.with_profile(profile(user, &format!("user{i}"))).with_heartbeats([
            beat(user, "awoo", "Rust", IN_WINDOW),
            beat(user, "awoo", "Rust", IN_WINDOW + f64::from(i + 1) * 10.0),
        ]);
        users.push(user);
    }
    let service = LeaderboardService::new(Arc::new(store)).with_page_size(2);

    let board = service.compute_leaderboard_at(users[0], 0, None, now()).await.unwrap();
    assert_eq!(board.total_pages, 3);
    assert_eq!(board.entries.len(), 2);

    let last = service.compute_leaderboard_at(users[0], 2, None, now()).await.unwrap();
    assert_eq!(last.entries.len(), 1);
    assert_eq!(last.entries[0].rank, 4);
}

#[tokio::test]
async fn only_write_heartbeats_count() {
    let user = Uuid::new_v4();
    let store = MockHeartbeatStore::new().with_heartbeats([
        read_beat(user, "awoo", "Rust", IN_WINDOW),
        read_beat(user, "awoo", "Rust", IN_WINDOW + 300.0),
    ]);
    let service = LeaderboardService::new(Arc::new(store));

    let board = service.compute_leaderboard_at(user, 0, None, now()).await.unwrap();

    assert!(board.entries.is_empty());
    assert!(board.current_user.is_none());
    assert_eq!(board.total_pages, 0);
}

#[tokio::test]
async fn language_filter_restricts_totals() {
    let user = Uuid::new_v4();
    let store = MockHeartbeatStore::new().with_profile(profile(user, "polyglot")).with_heartbeats([
        beat(user, "awoo", "Rust", IN_WINDOW),
        beat(user, "awoo", "Rust", IN_WINDOW + 200.0),
        beat(user, "awoo", "Python", IN_WINDOW + 7200.0),
        beat(user, "awoo", "Python", IN_WINDOW + 7500.0),
    ]);
    let service = LeaderboardService::new(Arc::new(store));

    let board = service.compute_leaderboard_at(user, 0, Some("Rust"), now()).await.unwrap();

    assert_eq!(board.language.as_deref(), Some("Rust"));
    assert_eq!(board.entries.len(), 1);
    assert_eq!(board.entries[0].total_seconds, 200.0);
    assert_eq!(board.entries[0].languages.len(), 1);
    assert_eq!(board.entries[0].languages[0].language, "Rust");
}

#[tokio::test]
async fn heartbeats_outside_the_window_are_ignored() {
    let user = Uuid::new_v4();
    let window_end = 1_715_299_200.0; // 2024-05-10 00:00 UTC
    let store = MockHeartbeatStore::new().with_profile(profile(user, "offside")).with_heartbeats([
        // eight days back, before the window opens
        beat(user, "awoo", "Rust", window_end - 8.0 * 86_400.0),
        beat(user, "awoo", "Rust", window_end - 8.0 * 86_400.0 + 120.0),
        // this morning, after the midnight-aligned window closed
        beat(user, "awoo", "Rust", window_end + 3600.0),
        beat(user, "awoo", "Rust", window_end + 3720.0),
    ]);
    let service = LeaderboardService::new(Arc::new(store));

    let board = service.compute_leaderboard_at(user, 0, None, now()).await.unwrap();

    assert!(board.entries.is_empty());
    assert_eq!(board.range.end, window_end);
    assert_eq!(board.range.start, window_end - 7.0 * 86_400.0);
}

#[tokio::test]
async fn per_language_breakdown_sorts_descending() {
    let user = Uuid::new_v4();
    let store = MockHeartbeatStore::new().with_profile(profile(user, "polyglot")).with_heartbeats([
        beat(user, "awoo", "Rust", IN_WINDOW),
        beat(user, "awoo", "Rust", IN_WINDOW + 100.0),
        beat(user, "awoo", "Python", IN_WINDOW + 7200.0),
        beat(user, "awoo", "Python", IN_WINDOW + 7700.0),
    ]);
    let service = LeaderboardService::new(Arc::new(store));

    let board = service.compute_leaderboard_at(user, 0, None, now()).await.unwrap();

    let langs = &board.entries[0].languages;
    assert_eq!(langs[0].language, "Python");
    assert_eq!(langs[0].total_seconds, 500.0);
    assert_eq!(langs[1].language, "Rust");
    assert_eq!(langs[1].total_seconds, 100.0);
}

#[tokio::test]
async fn store_failure_surfaces_unchanged() {
    let service = LeaderboardService::new(Arc::new(MockHeartbeatStore::offline()));

    let err = service
        .compute_leaderboard_at(Uuid::new_v4(), 0, None, now())
        .await
        .unwrap_err();
    assert!(matches!(err, TempoError::StoreUnavailable(_)));
}
