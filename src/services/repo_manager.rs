//! Tracked repository lifecycle: add, remove, mark seen.

use crate::error::AppError;
use crate::models::{NewTrackedRepository, TrackedRepository};
use crate::services::release_source::ReleaseSource;
use crate::services::repo_store::RepositoryStore;
use std::sync::Arc;

/// Adds and removes tracked repositories.
#[derive(Clone)]
pub struct RepoManager {
    source: Arc<dyn ReleaseSource>,
    store: Arc<dyn RepositoryStore>,
}

/// Trim a user-supplied path segment, rejecting empty values.
fn required(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input_field(
            format!("{} must not be empty", field),
            field,
        ));
    }
    Ok(trimmed.to_string())
}

impl RepoManager {
    pub fn new(source: Arc<dyn ReleaseSource>, store: Arc<dyn RepositoryStore>) -> Self {
        Self { source, store }
    }

    /// Start tracking `owner/name`.
    ///
    /// The repository is resolved upstream first and stored under its
    /// upstream id and canonical names, with no release and unseen.
    /// Duplicates are rejected by the store's insert, not by a prior lookup.
    pub async fn add(&self, owner: &str, name: &str) -> Result<TrackedRepository, AppError> {
        let owner = required(owner, "owner")?;
        let name = required(name, "name")?;

        let identity = self
            .source
            .resolve(&owner, &name)
            .await?
            .ok_or_else(|| AppError::upstream_not_found(&owner, &name))?;

        let repo = self
            .store
            .insert(&NewTrackedRepository::from(identity))
            .await?;
        log::info!("[repos] Tracking {} (id={})", repo.full_name(), repo.id);

        Ok(repo)
    }

    /// Stop tracking a repository. Returns false if it was not tracked.
    pub async fn remove(&self, id: i64) -> Result<bool, AppError> {
        let removed = self.store.delete_by_id(id).await?;
        if removed {
            log::info!("[repos] Removed repository id={}", id);
        }
        Ok(removed)
    }

    /// Mark the current release as seen. Returns false if not tracked.
    pub async fn mark_seen(&self, id: i64) -> Result<bool, AppError> {
        self.store.update_seen(id, true).await
    }

    /// All tracked repositories in creation order.
    pub async fn list(&self) -> Result<Vec<TrackedRepository>, AppError> {
        self.store.get_all().await
    }

    /// Look up one tracked repository.
    pub async fn get(&self, id: i64) -> Result<Option<TrackedRepository>, AppError> {
        self.store.get_by_id(id).await
    }
}
