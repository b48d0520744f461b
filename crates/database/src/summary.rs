//! Summary cache row operations.
//!
//! Rows are only ever inserted; a newer summary supersedes older ones by
//! sorting on `created_at`. Expired rows are excluded at read time and
//! removed by [`delete_expired`], which the server runs on an interval.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::GoalSummary;

/// Insert a new summary row.
pub async fn insert_summary(pool: &SqlitePool, summary: &GoalSummary) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO goal_summaries
            (id, user_id, goal_id, summary_type, summary, metadata,
             entry_count, content_hash, created_at, expires_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&summary.id)
    .bind(&summary.user_id)
    .bind(&summary.goal_id)
    .bind(&summary.summary_type)
    .bind(&summary.summary)
    .bind(&summary.metadata)
    .bind(summary.entry_count)
    .bind(&summary.content_hash)
    .bind(&summary.created_at)
    .bind(&summary.expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Find the newest valid cache row for (user, goal, type, content hash).
///
/// A row is valid when it is permanent (`expires_at` NULL) or not yet
/// expired (`expires_at > now`). Timestamps are RFC 3339 TEXT, so the
/// comparison is done directly in SQL.
pub async fn find_valid_summary(
    pool: &SqlitePool,
    user_id: &str,
    goal_id: &str,
    summary_type: &str,
    content_hash: &str,
    now: &str,
) -> Result<Option<GoalSummary>> {
    let row = sqlx::query_as::<_, GoalSummary>(
        r#"
        SELECT id, user_id, goal_id, summary_type, summary, metadata,
               entry_count, content_hash, created_at, expires_at
        FROM goal_summaries
        WHERE user_id = ?
          AND goal_id = ?
          AND summary_type = ?
          AND content_hash = ?
          AND (expires_at IS NULL OR expires_at > ?)
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(goal_id)
    .bind(summary_type)
    .bind(content_hash)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Delete all expired cache rows. Returns the number deleted.
pub async fn delete_expired(pool: &SqlitePool, now: &str) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM goal_summaries
        WHERE expires_at IS NOT NULL AND expires_at <= ?
        "#,
    )
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
