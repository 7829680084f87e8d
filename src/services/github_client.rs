//! GitHub API client.
//!
//! Release source backed by the GitHub REST API. Request timeouts are set on
//! the underlying HTTP client so a stalled fetch cannot hold up a bulk sync.

use crate::error::AppError;
use crate::models::{LatestRelease, ReleaseDescriptor, ReleaseId, RepositoryIdentity};
use crate::services::release_source::ReleaseSource;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub API client configuration.
#[derive(Debug, Clone)]
pub struct GitHubClientConfig {
    /// Base URL of the API (e.g., `https://api.github.com`).
    pub base_url: String,

    /// Optional token. Anonymous requests have a much lower rate limit.
    pub token: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

/// GitHub API client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    config: GitHubClientConfig,
}

/// Repository owner from API.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubOwner {
    pub login: String,
}

/// Repository from `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepository {
    pub id: i64,
    pub name: String,
    pub owner: GitHubOwner,
    pub html_url: String,
}

/// Release from `GET /repos/{owner}/{repo}/releases/latest`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRelease {
    pub id: i64,
    pub tag_name: String,
    pub name: Option<String>,
    pub body: Option<String>,
    pub html_url: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<GitHubRepository> for RepositoryIdentity {
    fn from(repo: GitHubRepository) -> Self {
        Self {
            id: repo.id,
            owner: repo.owner.login,
            name: repo.name,
            url: Some(repo.html_url),
        }
    }
}

impl From<GitHubRelease> for ReleaseDescriptor {
    fn from(release: GitHubRelease) -> Self {
        Self {
            release_id: ReleaseId(release.id),
            tag: release.tag_name,
            published_at: release.published_at,
            notes: release.body.filter(|b| !b.trim().is_empty()),
            url: Some(release.html_url),
        }
    }
}

impl GitHubClient {
    /// Create a new GitHub client.
    pub fn new(config: GitHubClientConfig) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );

        if let Some(token) = &config.token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| AppError::invalid_input_field("Invalid token format", "token"))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("release-radar/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Build the full URL for an API path.
    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Path for a repository, with owner and name percent-encoded.
    fn repo_path(owner: &str, name: &str) -> String {
        format!(
            "/repos/{}/{}",
            urlencoding::encode(owner),
            urlencoding::encode(name)
        )
    }

    /// GET an endpoint, mapping 404 to `Ok(None)`.
    async fn get_optional<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Option<T>, AppError> {
        let response = self.client.get(self.api_url(endpoint)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        self.handle_response(response, endpoint).await.map(Some)
    }

    /// Handle API response errors.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        endpoint: &str,
    ) -> Result<T, AppError> {
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                AppError::source_unavailable_full(
                    format!("Failed to parse response: {}", e),
                    status.as_u16(),
                    endpoint,
                )
            });
        }

        let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
            || (status == StatusCode::FORBIDDEN
                && response
                    .headers()
                    .get("x-ratelimit-remaining")
                    .and_then(|v| v.to_str().ok())
                    == Some("0"));

        let body = response.text().await.unwrap_or_default();
        // GitHub returns errors as {"message": "..."}
        let body_message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string));

        let message = match (status, &body_message) {
            _ if rate_limited => "Rate limit exceeded".to_string(),
            (StatusCode::UNAUTHORIZED, _) => "GitHub token is invalid or expired".to_string(),
            (StatusCode::FORBIDDEN, _) => "Access denied".to_string(),
            (_, Some(msg)) => msg.clone(),
            _ => format!("Request failed ({}): {}", status.as_u16(), body),
        };

        Err(AppError::source_unavailable_full(
            message,
            status.as_u16(),
            endpoint,
        ))
    }

    /// Get a repository by owner and name.
    pub async fn get_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Option<GitHubRepository>, AppError> {
        self.get_optional(&Self::repo_path(owner, name)).await
    }

    /// Get the latest published (non-draft, non-prerelease) release.
    pub async fn get_latest_release(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Option<GitHubRelease>, AppError> {
        let endpoint = format!("{}/releases/latest", Self::repo_path(owner, name));
        self.get_optional(&endpoint).await
    }
}

#[async_trait]
impl ReleaseSource for GitHubClient {
    async fn resolve(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Option<RepositoryIdentity>, AppError> {
        Ok(self
            .get_repository(owner, name)
            .await?
            .map(RepositoryIdentity::from))
    }

    async fn latest_release(&self, owner: &str, name: &str) -> Result<LatestRelease, AppError> {
        let release = self.get_latest_release(owner, name).await?;
        Ok(release.map(ReleaseDescriptor::from).into())
    }
}
