//! Repository lifecycle tests.
//!
//! Covers adding, removing and marking repositories seen through the
//! exposed commands, against a scripted release source and SQLite.

mod common;

use common::{seed, sqlite_store, CountingStore, FakeReleaseSource};
use release_radar_lib::commands::{self, AppState};
use release_radar_lib::error::AppError;
use release_radar_lib::services::repo_store::RepositoryStore;
use std::sync::Arc;

/// Scenario: empty store, add facebook/react -> unseen record, no release,
/// id from the release source.
#[tokio::test]
async fn test_add_repository_uses_upstream_identity() {
    let (_dir, store) = sqlite_store().await;
    let source = FakeReleaseSource::new();
    source.with_repo(10270250, "facebook", "react");
    let state = AppState::new(source, Arc::new(store));

    let repo = commands::add_repository(&state, "facebook", "react")
        .await
        .unwrap();

    assert_eq!(repo.id, 10270250);
    assert_eq!(repo.owner, "facebook");
    assert_eq!(repo.name, "react");
    assert!(!repo.seen_by_user);
    assert!(repo.latest_release_id.is_none());
    assert!(repo.latest_release_tag.is_none());
    assert!(repo.latest_release_date.is_none());
    assert!(repo.latest_release_notes.is_none());

    let listed = commands::list_tracked(&state).await.unwrap();
    assert_eq!(listed, vec![repo]);
}

#[tokio::test]
async fn test_add_repository_stores_canonical_casing() {
    let (_dir, store) = sqlite_store().await;
    let source = FakeReleaseSource::new();
    source.with_repo(1, "rust-lang", "rust");
    let state = AppState::new(source, Arc::new(store));

    let repo = commands::add_repository(&state, "  Rust-Lang ", "RUST")
        .await
        .unwrap();
    assert_eq!(repo.owner, "rust-lang");
    assert_eq!(repo.name, "rust");
}

#[tokio::test]
async fn test_add_duplicate_is_already_tracked() {
    let (_dir, store) = sqlite_store().await;
    let source = FakeReleaseSource::new();
    source.with_repo(10270250, "facebook", "react");
    let state = AppState::new(source, Arc::new(store));

    commands::add_repository(&state, "facebook", "react")
        .await
        .unwrap();
    let err = commands::add_repository(&state, "facebook", "react")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::AlreadyTracked { .. }));

    let matching: Vec<_> = commands::list_tracked(&state)
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.owner == "facebook" && r.name == "react")
        .collect();
    assert_eq!(matching.len(), 1);
}

#[tokio::test]
async fn test_add_unknown_repository_is_upstream_not_found() {
    let (_dir, store) = sqlite_store().await;
    let store = CountingStore::new(store);
    let state = AppState::new(FakeReleaseSource::new(), store.clone());

    let err = commands::add_repository(&state, "nobody", "nothing")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UpstreamNotFound { .. }));
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn test_add_blank_name_is_invalid_input() {
    let (_dir, store) = sqlite_store().await;
    let state = AppState::new(FakeReleaseSource::new(), Arc::new(store));

    let err = commands::add_repository(&state, "facebook", " ")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput { .. }));
}

/// Scenario: removing an untracked id reports false and changes nothing.
#[tokio::test]
async fn test_remove_untracked_returns_false() {
    let (_dir, store) = sqlite_store().await;
    let store = Arc::new(store);
    let existing = seed(store.as_ref(), 1, "a", "b", Some(3), true).await;
    let state = AppState::new(FakeReleaseSource::new(), store.clone());

    assert!(!commands::remove_repository(&state, 999).await.unwrap());
    assert_eq!(store.get_all().await.unwrap(), vec![existing]);
}

#[tokio::test]
async fn test_remove_tracked_returns_true() {
    let (_dir, store) = sqlite_store().await;
    let store = Arc::new(store);
    seed(store.as_ref(), 1, "a", "b", None, false).await;
    let state = AppState::new(FakeReleaseSource::new(), store.clone());

    assert!(commands::remove_repository(&state, 1).await.unwrap());
    assert!(commands::get_repository(&state, 1).await.unwrap().is_none());
    assert!(!commands::remove_repository(&state, 1).await.unwrap());
}

#[tokio::test]
async fn test_mark_seen_only_touches_seen_flag() {
    let (_dir, store) = sqlite_store().await;
    let store = Arc::new(store);
    let before = seed(store.as_ref(), 1, "a", "b", Some(42), false).await;
    let state = AppState::new(FakeReleaseSource::new(), store.clone());

    assert!(commands::mark_seen(&state, 1).await.unwrap());
    assert!(commands::mark_seen(&state, 1).await.unwrap());

    let after = commands::get_repository(&state, 1).await.unwrap().unwrap();
    assert!(after.seen_by_user);
    assert_eq!(after.latest_release_id, before.latest_release_id);
    assert_eq!(after.latest_release_tag, before.latest_release_tag);
    assert_eq!(after.latest_release_date, before.latest_release_date);
    assert_eq!(after.latest_release_notes, before.latest_release_notes);

    assert!(!commands::mark_seen(&state, 2).await.unwrap());
}

#[tokio::test]
async fn test_add_then_sync_then_seen_flow() {
    let (_dir, store) = sqlite_store().await;
    let source = FakeReleaseSource::new();
    source
        .with_repo(5, "tokio-rs", "axum")
        .set_release("tokio-rs", "axum", 900, "axum-v0.8.4");
    let state = AppState::new(source.clone(), Arc::new(store));

    let added = commands::add_repository(&state, "tokio-rs", "axum")
        .await
        .unwrap();
    let synced = commands::sync_one(&state, added.id).await.unwrap();
    assert_eq!(synced.latest_release_tag.as_deref(), Some("axum-v0.8.4"));
    assert!(!synced.seen_by_user);

    commands::mark_seen(&state, added.id).await.unwrap();
    assert_eq!(commands::sync_all(&state).await.unwrap(), 1);
    let still_seen = commands::get_repository(&state, added.id)
        .await
        .unwrap()
        .unwrap();
    assert!(still_seen.seen_by_user);

    source.set_release("tokio-rs", "axum", 901, "axum-v0.8.5");
    assert_eq!(commands::sync_all(&state).await.unwrap(), 1);
    let bumped = commands::get_repository(&state, added.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bumped.latest_release_tag.as_deref(), Some("axum-v0.8.5"));
    assert!(!bumped.seen_by_user);

    let status = commands::get_sync_status(&state).await;
    assert_eq!(status.last_synced_count, 1);
    assert_eq!(status.last_failed_count, 0);
}
