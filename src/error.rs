//! Application error types.
//!
//! These errors are serializable so the API layer can hand a structured,
//! inspectable failure to clients instead of a bare message.

use serde::Serialize;
use thiserror::Error;

/// Application-level errors returned by the exposed operations.
///
/// All variants serialize to a structured JSON object for API consumers.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    /// The repository does not exist upstream.
    #[error("Repository {owner}/{name} not found upstream")]
    UpstreamNotFound { owner: String, name: String },

    /// The repository is already being tracked.
    #[error("Repository {owner}/{name} is already tracked")]
    AlreadyTracked { owner: String, name: String },

    /// Requested resource is not tracked locally.
    #[error("Not found: {resource}")]
    NotFound {
        resource: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// The upstream repository exists but has never published a release.
    #[error("No releases found for {owner}/{name}")]
    NoReleaseFound { owner: String, name: String },

    /// Release source request failed (network, rate limit, upstream outage).
    #[error("Release source unavailable: {message}")]
    SourceUnavailable {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,
    },

    /// Local persistence failed.
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        operation: Option<String>,
    },

    /// Invalid input provided.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },

    /// Internal application error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create an upstream-not-found error.
    pub fn upstream_not_found(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UpstreamNotFound {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Create an already-tracked error.
    pub fn already_tracked(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::AlreadyTracked {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: None,
        }
    }

    /// Create a not found error with ID.
    pub fn not_found_with_id(resource: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: Some(id.to_string()),
        }
    }

    /// Create a no-release error.
    pub fn no_release_found(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NoReleaseFound {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Create a release source error.
    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            message: message.into(),
            status_code: None,
            endpoint: None,
        }
    }

    /// Create a release source error with status code and endpoint.
    pub fn source_unavailable_full(
        message: impl Into<String>,
        status_code: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self::SourceUnavailable {
            message: message.into(),
            status_code: Some(status_code),
            endpoint: Some(endpoint.into()),
        }
    }

    /// Create a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            operation: None,
        }
    }

    /// Create a store error with operation context.
    pub fn store_with_op(message: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            operation: Some(operation.into()),
        }
    }

    /// Create an invalid input error with field name.
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether a retry may succeed without any change on the caller's side.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable { .. } | Self::StoreUnavailable { .. }
        )
    }
}

// Conversions from common error types

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::store(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::source_unavailable("Request timed out")
        } else if err.is_connect() {
            Self::source_unavailable("Failed to connect to server")
        } else if let Some(status) = err.status() {
            Self::SourceUnavailable {
                message: format!("HTTP error: {}", err),
                status_code: Some(status.as_u16()),
                endpoint: err.url().map(|u| u.path().to_string()),
            }
        } else {
            Self::source_unavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON error: {}", err))
    }
}

impl From<crate::db::DbError> for AppError {
    fn from(err: crate::db::DbError) -> Self {
        Self::store(err.to_string())
    }
}
