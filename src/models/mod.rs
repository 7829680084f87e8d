//! Data models for the application.
//!
//! `TrackedRepository` is the persisted entity; the release types are
//! transient values produced by a release source during a sync.

pub mod release;
pub mod tracked_repo;

// Re-exports for convenient access
pub use release::{LatestRelease, ReleaseDescriptor, ReleaseId, RepositoryIdentity};
pub use tracked_repo::{NewTrackedRepository, ReleaseFields, TrackedRepository};
