//! Repository store contract and its SQLite implementation.

use crate::db::pool::DbPool;
use crate::db::tracked_repos;
use crate::error::AppError;
use crate::models::{NewTrackedRepository, ReleaseFields, TrackedRepository};
use async_trait::async_trait;

/// Durable storage of tracked repositories, keyed by upstream id.
///
/// Implementations must allow concurrent writes to distinct records.
#[async_trait]
pub trait RepositoryStore: Send + Sync {
    /// All tracked repositories in creation order.
    async fn get_all(&self) -> Result<Vec<TrackedRepository>, AppError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<TrackedRepository>, AppError>;

    /// Insert atomically. A duplicate id or (owner, name) pair fails with
    /// `AppError::AlreadyTracked`.
    async fn insert(&self, repo: &NewTrackedRepository) -> Result<TrackedRepository, AppError>;

    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError>;

    /// Replace the release fields and reset `seen_by_user` to false.
    async fn update_release_fields(
        &self,
        id: i64,
        fields: &ReleaseFields,
    ) -> Result<Option<TrackedRepository>, AppError>;

    async fn update_seen(&self, id: i64, seen: bool) -> Result<bool, AppError>;
}

/// `RepositoryStore` backed by the local SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteRepositoryStore {
    pool: DbPool,
}

impl SqliteRepositoryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[async_trait]
impl RepositoryStore for SqliteRepositoryStore {
    async fn get_all(&self) -> Result<Vec<TrackedRepository>, AppError> {
        tracked_repos::list_tracked_repos(&self.pool)
            .await
            .map_err(|e| AppError::store_with_op(e.to_string(), "get_all"))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<TrackedRepository>, AppError> {
        tracked_repos::get_tracked_repo(&self.pool, id)
            .await
            .map_err(|e| AppError::store_with_op(e.to_string(), "get_by_id"))
    }

    async fn insert(&self, repo: &NewTrackedRepository) -> Result<TrackedRepository, AppError> {
        tracked_repos::insert_tracked_repo(&self.pool, repo)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::already_tracked(&repo.owner, &repo.name)
                } else {
                    AppError::store_with_op(e.to_string(), "insert")
                }
            })
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        tracked_repos::delete_tracked_repo(&self.pool, id)
            .await
            .map_err(|e| AppError::store_with_op(e.to_string(), "delete_by_id"))
    }

    async fn update_release_fields(
        &self,
        id: i64,
        fields: &ReleaseFields,
    ) -> Result<Option<TrackedRepository>, AppError> {
        tracked_repos::update_release_fields(&self.pool, id, fields)
            .await
            .map_err(|e| AppError::store_with_op(e.to_string(), "update_release_fields"))
    }

    async fn update_seen(&self, id: i64, seen: bool) -> Result<bool, AppError> {
        tracked_repos::update_seen(&self.pool, id, seen)
            .await
            .map_err(|e| AppError::store_with_op(e.to_string(), "update_seen"))
    }
}
