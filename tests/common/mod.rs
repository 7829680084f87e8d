//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use release_radar_lib::db;
use release_radar_lib::error::AppError;
use release_radar_lib::models::{
    LatestRelease, NewTrackedRepository, ReleaseDescriptor, ReleaseFields, ReleaseId,
    RepositoryIdentity, TrackedRepository,
};
use release_radar_lib::services::release_source::ReleaseSource;
use release_radar_lib::services::repo_store::{RepositoryStore, SqliteRepositoryStore};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

/// What the fake source answers for a repository's latest release.
#[derive(Debug, Clone)]
pub enum Scripted {
    Release(ReleaseDescriptor),
    NoRelease,
    Unavailable,
    /// Never answers.
    Hang,
}

fn key(owner: &str, name: &str) -> (String, String) {
    (owner.to_lowercase(), name.to_lowercase())
}

/// In-memory release source with scripted answers.
#[derive(Default)]
pub struct FakeReleaseSource {
    repos: Mutex<HashMap<(String, String), RepositoryIdentity>>,
    releases: Mutex<HashMap<(String, String), Scripted>>,
    fetches: AtomicUsize,
}

impl FakeReleaseSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register an upstream repository.
    pub fn with_repo(&self, id: i64, owner: &str, name: &str) -> &Self {
        self.repos.lock().unwrap().insert(
            key(owner, name),
            RepositoryIdentity {
                id,
                owner: owner.to_string(),
                name: name.to_string(),
                url: Some(format!("https://github.com/{}/{}", owner, name)),
            },
        );
        self
    }

    pub fn script(&self, owner: &str, name: &str, answer: Scripted) -> &Self {
        self.releases.lock().unwrap().insert(key(owner, name), answer);
        self
    }

    pub fn set_release(&self, owner: &str, name: &str, release_id: i64, tag: &str) -> &Self {
        self.script(owner, name, Scripted::Release(release(release_id, tag)))
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReleaseSource for FakeReleaseSource {
    async fn resolve(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Option<RepositoryIdentity>, AppError> {
        Ok(self.repos.lock().unwrap().get(&key(owner, name)).cloned())
    }

    async fn latest_release(&self, owner: &str, name: &str) -> Result<LatestRelease, AppError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let answer = self
            .releases
            .lock()
            .unwrap()
            .get(&key(owner, name))
            .cloned()
            .unwrap_or(Scripted::NoRelease);

        match answer {
            Scripted::Release(release) => Ok(LatestRelease::Found(release)),
            Scripted::NoRelease => Ok(LatestRelease::NoRelease),
            Scripted::Unavailable => Err(AppError::source_unavailable_full(
                "Rate limit exceeded",
                429,
                format!("/repos/{}/{}/releases/latest", owner, name),
            )),
            Scripted::Hang => std::future::pending().await,
        }
    }
}

/// Store wrapper that counts every write it forwards.
pub struct CountingStore {
    inner: SqliteRepositoryStore,
    writes: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: SqliteRepositoryStore) -> Arc<Self> {
        Arc::new(Self {
            inner,
            writes: AtomicUsize::new(0),
        })
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn reset_writes(&self) {
        self.writes.store(0, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &SqliteRepositoryStore {
        &self.inner
    }
}

#[async_trait]
impl RepositoryStore for CountingStore {
    async fn get_all(&self) -> Result<Vec<TrackedRepository>, AppError> {
        self.inner.get_all().await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<TrackedRepository>, AppError> {
        self.inner.get_by_id(id).await
    }

    async fn insert(&self, repo: &NewTrackedRepository) -> Result<TrackedRepository, AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(repo).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_by_id(id).await
    }

    async fn update_release_fields(
        &self,
        id: i64,
        fields: &ReleaseFields,
    ) -> Result<Option<TrackedRepository>, AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update_release_fields(id, fields).await
    }

    async fn update_seen(&self, id: i64, seen: bool) -> Result<bool, AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update_seen(id, seen).await
    }
}

pub fn release(release_id: i64, tag: &str) -> ReleaseDescriptor {
    ReleaseDescriptor {
        release_id: ReleaseId(release_id),
        tag: tag.to_string(),
        published_at: Some(Utc.with_ymd_and_hms(2026, 6, 1, 9, 30, 0).unwrap()),
        notes: Some(format!("Notes for {}", tag)),
        url: None,
    }
}

/// Fresh SQLite-backed store. Keep the `TempDir` alive for the test.
pub async fn sqlite_store() -> (TempDir, SqliteRepositoryStore) {
    let dir = tempdir().unwrap();
    let pool = db::initialize(&dir.path().join("test.db")).await.unwrap();
    (dir, SqliteRepositoryStore::new(pool))
}

/// Insert a tracked repository, optionally with a stored release and seen flag.
pub async fn seed(
    store: &dyn RepositoryStore,
    id: i64,
    owner: &str,
    name: &str,
    release_id: Option<i64>,
    seen: bool,
) -> TrackedRepository {
    store
        .insert(&NewTrackedRepository {
            id,
            owner: owner.to_string(),
            name: name.to_string(),
            url: None,
        })
        .await
        .unwrap();

    if let Some(release_id) = release_id {
        let fields = ReleaseFields::from(&release(release_id, &format!("v{}", release_id)));
        store.update_release_fields(id, &fields).await.unwrap();
    }
    store.update_seen(id, seen).await.unwrap();

    store.get_by_id(id).await.unwrap().unwrap()
}
