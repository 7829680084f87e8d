//! Services layer for business logic.
//!
//! This module contains the release reconciliation core:
//! - Release source contract and its GitHub implementation
//! - Repository store contract and its SQLite implementation
//! - Reconciler, sync engine and repository lifecycle manager

pub mod github_client;
pub mod reconciler;
pub mod release_source;
pub mod repo_manager;
pub mod repo_store;
pub mod sync_engine;
