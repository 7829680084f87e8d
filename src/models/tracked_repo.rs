//! Tracked repository model.

use super::release::{ReleaseDescriptor, ReleaseId, RepositoryIdentity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A repository the user follows, with its last observed release.
///
/// Field names match the `tracked_repos` columns. The API layer maps them
/// to its own presentation names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TrackedRepository {
    /// Upstream repository id.
    pub id: i64,

    pub owner: String,

    pub name: String,

    /// Web URL of the repository.
    pub url: Option<String>,

    /// Latest known release, `None` until the first successful sync.
    pub latest_release_id: Option<ReleaseId>,

    pub latest_release_tag: Option<String>,

    pub latest_release_date: Option<DateTime<Utc>>,

    pub latest_release_notes: Option<String>,

    /// Whether the user has viewed the current latest release.
    pub seen_by_user: bool,

    /// Unix timestamp of when tracking started.
    pub created_at: i64,
}

impl TrackedRepository {
    /// `owner/name` form used in logs and messages.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Input for inserting a newly tracked repository.
///
/// Release fields start empty and `seen_by_user` starts false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrackedRepository {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub url: Option<String>,
}

impl From<RepositoryIdentity> for NewTrackedRepository {
    fn from(identity: RepositoryIdentity) -> Self {
        Self {
            id: identity.id,
            owner: identity.owner,
            name: identity.name,
            url: identity.url,
        }
    }
}

/// Complete replacement set for a repository's release columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseFields {
    pub release_id: ReleaseId,
    pub tag: String,
    pub published_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl From<&ReleaseDescriptor> for ReleaseFields {
    fn from(release: &ReleaseDescriptor) -> Self {
        Self {
            release_id: release.release_id,
            tag: release.tag.clone(),
            published_at: release.published_at,
            notes: release.notes.clone(),
        }
    }
}
