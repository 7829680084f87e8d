//! Release reconciliation.
//!
//! Decides, for one stored repository and one fresh observation of its
//! latest release, whether local state must change. Pure: no I/O, no clock.

use crate::models::{LatestRelease, ReleaseFields, TrackedRepository};

/// What to do with a stored repository after observing its latest release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The observed release is the one already stored. No write.
    NoChange,

    /// A different release was observed. Write these fields and clear the
    /// seen flag.
    Update(ReleaseFields),

    /// Upstream reports that the repository has no releases at all.
    NoReleaseFound,
}

impl Decision {
    /// Whether applying this decision requires a store write.
    pub fn requires_write(&self) -> bool {
        matches!(self, Self::Update(_))
    }

    /// The record as it looks after the decision is applied.
    ///
    /// Returns `None` for `NoReleaseFound`, which leaves the stored record
    /// untouched and fails the sync.
    pub fn resulting_record(&self, stored: &TrackedRepository) -> Option<TrackedRepository> {
        match self {
            Self::NoChange => Some(stored.clone()),
            Self::Update(fields) => Some(TrackedRepository {
                latest_release_id: Some(fields.release_id),
                latest_release_tag: Some(fields.tag.clone()),
                latest_release_date: fields.published_at,
                latest_release_notes: fields.notes.clone(),
                seen_by_user: false,
                ..stored.clone()
            }),
            Self::NoReleaseFound => None,
        }
    }
}

/// Compare the stored release with the fetched one.
///
/// Releases are compared by id equality only; ordering of ids carries no
/// meaning. A stored repository that was never synced always updates.
pub fn reconcile(stored: &TrackedRepository, fetched: &LatestRelease) -> Decision {
    match fetched {
        LatestRelease::NoRelease => Decision::NoReleaseFound,
        LatestRelease::Found(release) if stored.latest_release_id == Some(release.release_id) => {
            Decision::NoChange
        }
        LatestRelease::Found(release) => Decision::Update(ReleaseFields::from(release)),
    }
}
