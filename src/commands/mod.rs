//! Operations exposed to the API layer.
//!
//! Each function maps to one mutation or query of the transport layer:
//! - `repos`: add, remove, mark seen, list, get
//! - `sync`: sync one, sync all, sync status
//!
//! Commands are transport-agnostic and return domain types; presentation
//! mapping happens in `server`.

pub mod repos;
pub mod sync;

pub use repos::{add_repository, get_repository, list_tracked, mark_seen, remove_repository};
pub use sync::{get_sync_status, sync_all, sync_one};

use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::services::github_client::{GitHubClient, GitHubClientConfig};
use crate::services::release_source::ReleaseSource;
use crate::services::repo_manager::RepoManager;
use crate::services::repo_store::{RepositoryStore, SqliteRepositoryStore};
use crate::services::sync_engine::{SyncEngine, SyncHandle};
use std::sync::Arc;

/// Shared state behind every command.
#[derive(Clone)]
pub struct AppState {
    pub repos: RepoManager,
    pub sync: SyncEngine,
    /// Present when periodic background sync is running.
    pub sync_handle: Option<SyncHandle>,
}

impl AppState {
    /// Wire the core over any release source and store.
    pub fn new(source: Arc<dyn ReleaseSource>, store: Arc<dyn RepositoryStore>) -> Self {
        Self {
            repos: RepoManager::new(source.clone(), store.clone()),
            sync: SyncEngine::new(source, store),
            sync_handle: None,
        }
    }

    /// Production wiring: GitHub release source over the SQLite store.
    pub fn with_github(pool: DbPool, config: GitHubClientConfig) -> Result<Self, AppError> {
        let source = Arc::new(GitHubClient::new(config)?);
        let store = Arc::new(SqliteRepositoryStore::new(pool));
        Ok(Self::new(source, store))
    }

    /// Start periodic bulk sync and keep its handle.
    pub fn start_background_sync(&mut self, interval_secs: u64) {
        self.sync_handle = Some(SyncEngine::start_background(
            self.sync.clone(),
            interval_secs,
        ));
    }
}
