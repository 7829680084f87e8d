//! Release values observed upstream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque upstream release identifier.
///
/// Only compared for equality: a different id means a new release,
/// regardless of whether it is numerically larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct ReleaseId(pub i64);

impl fmt::Display for ReleaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ReleaseId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Canonical identity of an upstream repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryIdentity {
    /// Stable upstream numeric id, used as the local primary key.
    pub id: i64,

    /// Owner login with upstream casing.
    pub owner: String,

    /// Repository name with upstream casing.
    pub name: String,

    /// Web URL of the repository.
    pub url: Option<String>,
}

/// The most recent release of a repository at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDescriptor {
    pub release_id: ReleaseId,
    pub tag: String,
    pub published_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    /// Web URL of the release page.
    pub url: Option<String>,
}

/// Outcome of asking a release source for the latest release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatestRelease {
    /// The repository has a published release.
    Found(ReleaseDescriptor),

    /// The repository exists but has never published a release.
    NoRelease,
}

impl From<Option<ReleaseDescriptor>> for LatestRelease {
    fn from(release: Option<ReleaseDescriptor>) -> Self {
        match release {
            Some(descriptor) => Self::Found(descriptor),
            None => Self::NoRelease,
        }
    }
}
