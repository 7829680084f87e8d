//! Repository commands for managing the tracked set.

use super::AppState;
use crate::error::AppError;
use crate::models::TrackedRepository;

/// Start tracking `owner/name`.
///
/// # Errors
/// `UpstreamNotFound` if the repository does not exist upstream,
/// `AlreadyTracked` if it is already tracked.
pub async fn add_repository(
    state: &AppState,
    owner: &str,
    name: &str,
) -> Result<TrackedRepository, AppError> {
    state.repos.add(owner, name).await
}

/// Stop tracking a repository. Returns false if it was not tracked.
pub async fn remove_repository(state: &AppState, id: i64) -> Result<bool, AppError> {
    state.repos.remove(id).await
}

/// Mark the current release of a repository as seen.
pub async fn mark_seen(state: &AppState, id: i64) -> Result<bool, AppError> {
    state.repos.mark_seen(id).await
}

/// List tracked repositories in the order they were added.
pub async fn list_tracked(state: &AppState) -> Result<Vec<TrackedRepository>, AppError> {
    state.repos.list().await
}

/// Get one tracked repository, `None` if not tracked.
pub async fn get_repository(
    state: &AppState,
    id: i64,
) -> Result<Option<TrackedRepository>, AppError> {
    state.repos.get(id).await
}
