//! Sync commands for reconciling tracked repositories with upstream.

use super::AppState;
use crate::error::AppError;
use crate::models::TrackedRepository;
use crate::services::sync_engine::SyncStatus;

/// Sync one repository and return its (possibly unchanged) record.
pub async fn sync_one(state: &AppState, id: i64) -> Result<TrackedRepository, AppError> {
    state.sync.sync_one(id).await.map(|outcome| outcome.into_record())
}

/// Sync all repositories.
///
/// # Returns
/// Number of repositories reconciled without error
pub async fn sync_all(state: &AppState) -> Result<usize, AppError> {
    state.sync.sync_all().await
}

/// Get the current sync status.
pub async fn get_sync_status(state: &AppState) -> SyncStatus {
    state.sync.status().await
}
