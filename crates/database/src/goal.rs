//! Goal document operations.
//!
//! Each user owns at most one Mandalart document. Saves go through an
//! upsert keyed on `user_id`; the tree itself is opaque JSON here and is
//! interpreted by the domain layer.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::GoalDocument;

/// Insert or replace the user's goal document.
///
/// On first save the row is created with `created_at = updated_at = now`;
/// later saves keep the original `created_at` and bump `updated_at`.
pub async fn upsert_goal_document(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    tree_json: &str,
    now: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO goals (id, user_id, tree, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            tree = excluded.tree,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(tree_json)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the user's goal document.
pub async fn get_goal_document(pool: &SqlitePool, user_id: &str) -> Result<GoalDocument> {
    sqlx::query_as::<_, GoalDocument>(
        r#"
        SELECT id, user_id, tree, created_at, updated_at
        FROM goals
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "GoalDocument",
        id: user_id.to_string(),
    })
}
