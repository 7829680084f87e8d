//! Database queries for tracked repositories.
//!
//! Every write is a single statement keyed by `id`, so concurrent syncs of
//! distinct repositories never contend on anything but SQLite's write lock.

use crate::db::pool::DbPool;
use crate::models::{NewTrackedRepository, ReleaseFields, TrackedRepository};
use std::time::{SystemTime, UNIX_EPOCH};

const COLUMNS: &str = "id, owner, name, url, latest_release_id, latest_release_tag, \
     latest_release_date, latest_release_notes, seen_by_user, created_at";

/// Get the current Unix timestamp.
fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// List all tracked repositories in the order they were added.
pub async fn list_tracked_repos(pool: &DbPool) -> Result<Vec<TrackedRepository>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM tracked_repos ORDER BY created_at, id",
        COLUMNS
    );
    sqlx::query_as::<_, TrackedRepository>(&query)
        .fetch_all(pool)
        .await
}

/// Look up a tracked repository by upstream id.
pub async fn get_tracked_repo(
    pool: &DbPool,
    id: i64,
) -> Result<Option<TrackedRepository>, sqlx::Error> {
    let query = format!("SELECT {} FROM tracked_repos WHERE id = ?", COLUMNS);
    sqlx::query_as::<_, TrackedRepository>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Insert a new tracked repository with empty release fields.
///
/// Fails with a unique violation when the id or the (owner, name) pair is
/// already present.
pub async fn insert_tracked_repo(
    pool: &DbPool,
    repo: &NewTrackedRepository,
) -> Result<TrackedRepository, sqlx::Error> {
    let query = format!(
        "INSERT INTO tracked_repos (id, owner, name, url, seen_by_user, created_at) \
         VALUES (?, ?, ?, ?, 0, ?) RETURNING {}",
        COLUMNS
    );
    sqlx::query_as::<_, TrackedRepository>(&query)
        .bind(repo.id)
        .bind(&repo.owner)
        .bind(&repo.name)
        .bind(&repo.url)
        .bind(now())
        .fetch_one(pool)
        .await
}

/// Delete a tracked repository. Returns whether a row was removed.
pub async fn delete_tracked_repo(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tracked_repos WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Replace the release columns of one repository and clear its seen flag.
///
/// Returns `None` when the repository is no longer tracked.
pub async fn update_release_fields(
    pool: &DbPool,
    id: i64,
    fields: &ReleaseFields,
) -> Result<Option<TrackedRepository>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE tracked_repos
        SET latest_release_id = ?,
            latest_release_tag = ?,
            latest_release_date = ?,
            latest_release_notes = ?,
            seen_by_user = 0
        WHERE id = ?
        RETURNING {}
        "#,
        COLUMNS
    );
    sqlx::query_as::<_, TrackedRepository>(&query)
        .bind(fields.release_id)
        .bind(&fields.tag)
        .bind(fields.published_at)
        .bind(&fields.notes)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Set the seen flag. Returns whether the repository exists.
pub async fn update_seen(pool: &DbPool, id: i64, seen: bool) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE tracked_repos SET seen_by_user = ? WHERE id = ?")
        .bind(seen)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
