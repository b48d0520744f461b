//! Progress check-in operations.
//!
//! The log is append-only: rows are inserted on check-in and never mutated.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::Result;
use crate::models::GoalProgress;

/// Append a progress record.
pub async fn create_progress(pool: &SqlitePool, progress: &GoalProgress) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO goal_progress
            (id, user_id, goal_id, sub_goal_id, progress_type, mood, difficulty,
             time_spent_minutes, completion_percentage, is_milestone, tags, note,
             date, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&progress.id)
    .bind(&progress.user_id)
    .bind(&progress.goal_id)
    .bind(&progress.sub_goal_id)
    .bind(&progress.progress_type)
    .bind(&progress.mood)
    .bind(progress.difficulty)
    .bind(progress.time_spent_minutes)
    .bind(progress.completion_percentage)
    .bind(progress.is_milestone)
    .bind(&progress.tags)
    .bind(&progress.note)
    .bind(&progress.date)
    .bind(&progress.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// List progress records for any of the given node ids, oldest first.
pub async fn list_progress_for_goal_ids(
    pool: &SqlitePool,
    user_id: &str,
    goal_ids: &[String],
) -> Result<Vec<GoalProgress>> {
    if goal_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        r#"
        SELECT id, user_id, goal_id, sub_goal_id, progress_type, mood, difficulty,
               time_spent_minutes, completion_percentage, is_milestone, tags, note,
               date, created_at
        FROM goal_progress
        WHERE user_id = "#,
    );
    builder.push_bind(user_id);
    builder.push(" AND goal_id IN (");
    {
        let mut separated = builder.separated(", ");
        for id in goal_ids {
            separated.push_bind(id);
        }
    }
    builder.push(") ORDER BY date ASC");

    let records = builder
        .build_query_as::<GoalProgress>()
        .fetch_all(pool)
        .await?;

    Ok(records)
}
