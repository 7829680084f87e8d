//! Release source contract.
//!
//! The core never talks to a provider directly. It asks a `ReleaseSource`
//! to resolve repositories and report their latest release, and the
//! implementation owns transport concerns such as request timeouts.

use crate::error::AppError;
use crate::models::{LatestRelease, RepositoryIdentity};
use async_trait::async_trait;

/// Provider of upstream repository and release information.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Resolve `owner/name` to its canonical identity.
    ///
    /// Returns `Ok(None)` when the repository does not exist upstream.
    async fn resolve(&self, owner: &str, name: &str)
        -> Result<Option<RepositoryIdentity>, AppError>;

    /// Fetch the latest published release of `owner/name`.
    ///
    /// Transient failures are reported as `AppError::SourceUnavailable`.
    async fn latest_release(&self, owner: &str, name: &str) -> Result<LatestRelease, AppError>;
}
