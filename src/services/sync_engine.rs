//! Release sync engine.
//!
//! This module drives reconciliation against the release source:
//! - Single-repository sync with every failure surfaced to the caller
//! - Bulk sync of a store snapshot, one task per repository, failures isolated
//! - Sync status tracking for display
//! - Optional periodic background sync

use crate::error::AppError;
use crate::models::TrackedRepository;
use crate::services::reconciler::{reconcile, Decision};
use crate::services::release_source::ReleaseSource;
use crate::services::repo_store::RepositoryStore;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinSet;
use tokio::time;

/// Status of the sync engine.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    /// Whether a bulk sync is currently running.
    pub is_syncing: bool,

    /// Completion time of the last bulk sync.
    pub last_sync_time: Option<DateTime<Utc>>,

    /// Repositories reconciled without error in the last bulk sync.
    pub last_synced_count: usize,

    /// Repositories that failed in the last bulk sync.
    pub last_failed_count: usize,

    /// Failure summary of the last bulk sync, if any.
    pub last_error: Option<String>,
}

/// Result of syncing one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The stored release is still the latest. Nothing was written.
    Unchanged(TrackedRepository),

    /// A new release was recorded.
    Updated(TrackedRepository),
}

impl SyncOutcome {
    pub fn into_record(self) -> TrackedRepository {
        match self {
            Self::Unchanged(repo) | Self::Updated(repo) => repo,
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// A repository that could not be reconciled during a bulk sync.
#[derive(Debug, Clone, Serialize)]
pub struct SyncFailure {
    pub repo_id: Option<i64>,
    pub repository: String,
    pub message: String,
}

/// Result of a bulk sync.
#[derive(Debug, Default)]
pub struct BulkSyncReport {
    /// Repositories reconciled without error, unchanged ones included.
    pub synced: usize,

    /// Subset of `synced` that recorded a new release.
    pub updated: usize,

    /// Per-repository failures.
    pub failures: Vec<SyncFailure>,

    /// Duration of the sync in milliseconds.
    pub duration_ms: i64,
}

/// Counts in-flight bulk syncs for `SyncStatus::is_syncing`.
///
/// Decrements on drop, so a cancelled sync does not stay "running".
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Fetch, reconcile and apply for one stored repository.
async fn sync_repository(
    source: &dyn ReleaseSource,
    store: &dyn RepositoryStore,
    stored: TrackedRepository,
) -> Result<SyncOutcome, AppError> {
    let fetched = source.latest_release(&stored.owner, &stored.name).await?;

    match reconcile(&stored, &fetched) {
        Decision::NoChange => Ok(SyncOutcome::Unchanged(stored)),
        Decision::NoReleaseFound => Err(AppError::no_release_found(&stored.owner, &stored.name)),
        Decision::Update(fields) => {
            log::info!(
                "[sync] {}: {} -> {}",
                stored.full_name(),
                stored.latest_release_tag.as_deref().unwrap_or("(none)"),
                fields.tag
            );
            store
                .update_release_fields(stored.id, &fields)
                .await?
                .map(SyncOutcome::Updated)
                // Removed between the read and the write
                .ok_or_else(|| AppError::not_found_with_id("Repository", stored.id))
        }
    }
}

/// Reconciles tracked repositories against the release source.
#[derive(Clone)]
pub struct SyncEngine {
    source: Arc<dyn ReleaseSource>,
    store: Arc<dyn RepositoryStore>,
    status: Arc<RwLock<SyncStatus>>,
    in_flight: Arc<AtomicUsize>,
}

impl SyncEngine {
    /// Create a new sync engine.
    pub fn new(source: Arc<dyn ReleaseSource>, store: Arc<dyn RepositoryStore>) -> Self {
        Self {
            source,
            store,
            status: Arc::new(RwLock::new(SyncStatus::default())),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sync a single tracked repository.
    ///
    /// Fails with `NotFound` when `id` is not tracked, `NoReleaseFound` when
    /// upstream has no releases, and `SourceUnavailable`/`StoreUnavailable`
    /// on transient failures. The store is only written when a new release
    /// was observed.
    pub async fn sync_one(&self, id: i64) -> Result<SyncOutcome, AppError> {
        let stored = self
            .store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found_with_id("Repository", id))?;

        sync_repository(self.source.as_ref(), self.store.as_ref(), stored).await
    }

    /// Sync every tracked repository and return how many completed without error.
    pub async fn sync_all(&self) -> Result<usize, AppError> {
        Ok(self.run_bulk_sync().await?.synced)
    }

    /// Sync every repository in a snapshot of the store.
    ///
    /// Each repository runs in its own task. A failing repository is logged
    /// and reported but never aborts the others. Only a failure to read the
    /// snapshot is returned as an error. Dropping the returned future aborts
    /// the tasks that have not finished; completed writes stay committed.
    pub async fn run_bulk_sync(&self) -> Result<BulkSyncReport, AppError> {
        let start = Instant::now();
        let _in_flight = InFlight::enter(&self.in_flight);

        let snapshot = match self.store.get_all().await {
            Ok(repos) => repos,
            Err(e) => {
                log::error!("[sync] Failed to read tracked repositories: {}", e);
                self.status.write().await.last_error = Some(e.to_string());
                return Err(e);
            }
        };

        log::info!("[sync] Syncing {} tracked repositories", snapshot.len());

        let mut tasks = JoinSet::new();
        for repo in snapshot {
            let source = self.source.clone();
            let store = self.store.clone();
            tasks.spawn(async move {
                let repo_id = repo.id;
                let repository = repo.full_name();
                let result = AssertUnwindSafe(sync_repository(
                    source.as_ref(),
                    store.as_ref(),
                    repo,
                ))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(AppError::internal("sync task panicked")));
                (repo_id, repository, result)
            });
        }

        let mut report = BulkSyncReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, _, Ok(outcome))) => {
                    report.synced += 1;
                    if outcome.is_updated() {
                        report.updated += 1;
                    }
                }
                Ok((repo_id, repository, Err(e))) => {
                    log::warn!("[sync] {} failed: {}", repository, e);
                    report.failures.push(SyncFailure {
                        repo_id: Some(repo_id),
                        repository,
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    log::error!("[sync] Sync task did not complete: {}", e);
                    report.failures.push(SyncFailure {
                        repo_id: None,
                        repository: String::new(),
                        message: e.to_string(),
                    });
                }
            }
        }

        report.duration_ms = start.elapsed().as_millis() as i64;

        log::info!(
            "[sync] Bulk sync complete: {} synced, {} updated, {} failed in {}ms",
            report.synced,
            report.updated,
            report.failures.len(),
            report.duration_ms
        );

        {
            let mut status = self.status.write().await;
            status.last_sync_time = Some(Utc::now());
            status.last_synced_count = report.synced;
            status.last_failed_count = report.failures.len();
            status.last_error = if report.failures.is_empty() {
                None
            } else {
                Some(
                    report
                        .failures
                        .iter()
                        .map(|f| format!("{}: {}", f.repository, f.message))
                        .collect::<Vec<_>>()
                        .join("; "),
                )
            };
        }

        Ok(report)
    }

    /// Snapshot of the current sync status.
    pub async fn status(&self) -> SyncStatus {
        let mut status = self.status.read().await.clone();
        status.is_syncing = self.in_flight.load(Ordering::SeqCst) > 0;
        status
    }

    /// Start the periodic background sync loop.
    ///
    /// Runs a bulk sync every `interval_secs` and on demand through the
    /// returned handle. The loop stops on `SyncCommand::Stop` or when every
    /// handle has been dropped.
    pub fn start_background(engine: SyncEngine, interval_secs: u64) -> SyncHandle {
        let (tx, mut rx) = mpsc::channel::<SyncCommand>(16);

        tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(interval_secs.max(1)));
            log::info!("[sync] Background sync every {}s", interval_secs);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        log::debug!("[sync] Running periodic background sync");
                        if let Err(e) = engine.run_bulk_sync().await {
                            log::error!("[sync] Periodic sync error: {}", e);
                        }
                    }
                    cmd = rx.recv() => {
                        match cmd {
                            Some(SyncCommand::TriggerSync) => {
                                log::info!("[sync] Manual sync triggered");
                                if let Err(e) = engine.run_bulk_sync().await {
                                    log::error!("[sync] Manual sync error: {}", e);
                                }
                            }
                            Some(SyncCommand::UpdateInterval(secs)) if secs > 0 => {
                                log::info!("[sync] Interval updated to {}s", secs);
                                interval = time::interval(Duration::from_secs(secs));
                                // The first tick of a fresh interval fires immediately.
                                interval.tick().await;
                            }
                            Some(SyncCommand::UpdateInterval(_)) => {
                                log::warn!("[sync] Ignoring zero sync interval");
                            }
                            Some(SyncCommand::Stop) | None => break,
                        }
                    }
                }
            }
            log::info!("[sync] Background sync stopped");
        });

        SyncHandle { command_tx: tx }
    }
}

/// Commands that can be sent to the background sync loop.
#[derive(Debug)]
pub enum SyncCommand {
    /// Run a bulk sync now.
    TriggerSync,

    /// Change the sync interval in seconds.
    UpdateInterval(u64),

    /// Stop the loop.
    Stop,
}

/// Cloneable handle for controlling the background sync loop.
#[derive(Debug, Clone)]
pub struct SyncHandle {
    command_tx: mpsc::Sender<SyncCommand>,
}

impl SyncHandle {
    async fn send(&self, command: SyncCommand) -> Result<(), AppError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| AppError::internal("Sync engine not running"))
    }

    /// Trigger an immediate bulk sync.
    pub async fn trigger_sync(&self) -> Result<(), AppError> {
        self.send(SyncCommand::TriggerSync).await
    }

    /// Update the sync interval.
    pub async fn update_interval(&self, secs: u64) -> Result<(), AppError> {
        self.send(SyncCommand::UpdateInterval(secs)).await
    }

    /// Stop the background loop.
    pub async fn stop(&self) -> Result<(), AppError> {
        self.send(SyncCommand::Stop).await
    }

    /// Whether the background loop has exited.
    pub fn is_stopped(&self) -> bool {
        self.command_tx.is_closed()
    }
}
