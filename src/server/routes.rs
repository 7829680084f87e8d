//! REST API routes.
//!
//! Maps each exposed command to a JSON endpoint and translates stored
//! records into the camelCase shape API clients consume.

use crate::commands::{self, AppState};
use crate::error::AppError;
use crate::models::TrackedRepository;
use crate::services::sync_engine::SyncStatus;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

// ── Error handling ───────────────────────────────────────────────────────────

/// JSON error body.
#[derive(Serialize)]
struct ApiError {
    code: String,
    message: String,
}

/// Wrapper to make AppError usable as an axum error response.
pub struct ApiErr(AppError);

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::UpstreamNotFound { .. } => (StatusCode::NOT_FOUND, "UPSTREAM_NOT_FOUND"),
            AppError::AlreadyTracked { .. } => (StatusCode::CONFLICT, "ALREADY_TRACKED"),
            AppError::NoReleaseFound { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "NO_RELEASE_FOUND")
            }
            AppError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            AppError::SourceUnavailable { .. } => (StatusCode::BAD_GATEWAY, "SOURCE_UNAVAILABLE"),
            AppError::StoreUnavailable { .. } | AppError::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };
        (
            status,
            Json(ApiError {
                code: code.to_string(),
                message: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<AppError> for ApiErr {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

// ── DTOs ─────────────────────────────────────────────────────────────────────

/// Tracked repository as seen by API clients.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RepoResponse {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub url: Option<String>,
    pub seen_by_user: bool,
    /// Opaque identifier, rendered as a string.
    pub latest_release_id: Option<String>,
    pub latest_release_tag: Option<String>,
    /// RFC 3339 timestamp.
    pub latest_release_date: Option<String>,
    pub latest_release_notes: Option<String>,
}

impl From<TrackedRepository> for RepoResponse {
    fn from(repo: TrackedRepository) -> Self {
        Self {
            id: repo.id,
            owner: repo.owner,
            name: repo.name,
            url: repo.url,
            seen_by_user: repo.seen_by_user,
            latest_release_id: repo.latest_release_id.map(|id| id.to_string()),
            latest_release_tag: repo.latest_release_tag,
            latest_release_date: repo
                .latest_release_date
                .map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true)),
            latest_release_notes: repo.latest_release_notes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddRepoRequest {
    pub owner: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemovedResponse {
    pub removed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatedResponse {
    pub updated: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SyncedResponse {
    pub synced: usize,
}

// ── Route builder ────────────────────────────────────────────────────────────

/// Build the API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/repos", get(list_repos).post(add_repo))
        .route("/api/repos/{id}", get(get_repo).delete(remove_repo))
        .route("/api/repos/{id}/sync", post(sync_repo))
        .route("/api/repos/{id}/seen", post(mark_repo_seen))
        .route("/api/sync", post(sync_all_repos))
        .route("/api/sync/status", get(sync_status))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/repos: list tracked repositories.
async fn list_repos(State(state): State<AppState>) -> Result<Json<Vec<RepoResponse>>, ApiErr> {
    let repos = commands::list_tracked(&state).await?;
    Ok(Json(repos.into_iter().map(RepoResponse::from).collect()))
}

/// GET /api/repos/{id}: one tracked repository.
async fn get_repo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RepoResponse>, ApiErr> {
    let repo = commands::get_repository(&state, id)
        .await?
        .ok_or_else(|| AppError::not_found_with_id("Repository", id))?;
    Ok(Json(repo.into()))
}

/// POST /api/repos: start tracking a repository.
async fn add_repo(
    State(state): State<AppState>,
    Json(body): Json<AddRepoRequest>,
) -> Result<(StatusCode, Json<RepoResponse>), ApiErr> {
    let repo = commands::add_repository(&state, &body.owner, &body.name).await?;
    Ok((StatusCode::CREATED, Json(repo.into())))
}

/// DELETE /api/repos/{id}: stop tracking a repository.
async fn remove_repo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RemovedResponse>, ApiErr> {
    let removed = commands::remove_repository(&state, id).await?;
    Ok(Json(RemovedResponse { removed }))
}

/// POST /api/repos/{id}/sync: fetch the latest release of one repository.
async fn sync_repo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RepoResponse>, ApiErr> {
    let repo = commands::sync_one(&state, id).await?;
    Ok(Json(repo.into()))
}

/// POST /api/repos/{id}/seen: mark the latest release as seen.
async fn mark_repo_seen(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UpdatedResponse>, ApiErr> {
    let updated = commands::mark_seen(&state, id).await?;
    Ok(Json(UpdatedResponse { updated }))
}

/// POST /api/sync: sync every tracked repository.
async fn sync_all_repos(State(state): State<AppState>) -> Result<Json<SyncedResponse>, ApiErr> {
    let synced = commands::sync_all(&state).await?;
    Ok(Json(SyncedResponse { synced }))
}

/// GET /api/sync/status: status of the last bulk sync.
async fn sync_status(State(state): State<AppState>) -> Json<SyncStatus> {
    Json(commands::get_sync_status(&state).await)
}
