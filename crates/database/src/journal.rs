//! Journal entry operations.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::JournalEntry;

/// Create a journal entry.
pub async fn create_entry(pool: &SqlitePool, entry: &JournalEntry) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO journal_entries
            (id, user_id, title, content, mood, tags, date, is_ai_generated,
             related_goal_id, related_goal_kind, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&entry.id)
    .bind(&entry.user_id)
    .bind(&entry.title)
    .bind(&entry.content)
    .bind(&entry.mood)
    .bind(&entry.tags)
    .bind(&entry.date)
    .bind(entry.is_ai_generated)
    .bind(&entry.related_goal_id)
    .bind(&entry.related_goal_kind)
    .bind(&entry.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a single entry by id, scoped to its owner.
pub async fn get_entry(pool: &SqlitePool, user_id: &str, id: &str) -> Result<JournalEntry> {
    sqlx::query_as::<_, JournalEntry>(
        r#"
        SELECT id, user_id, title, content, mood, tags, date, is_ai_generated,
               related_goal_id, related_goal_kind, created_at
        FROM journal_entries
        WHERE user_id = ? AND id = ?
        "#,
    )
    .bind(user_id)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "JournalEntry",
        id: id.to_string(),
    })
}

/// List all of a user's entries, newest first.
pub async fn list_entries(pool: &SqlitePool, user_id: &str) -> Result<Vec<JournalEntry>> {
    let entries = sqlx::query_as::<_, JournalEntry>(
        r#"
        SELECT id, user_id, title, content, mood, tags, date, is_ai_generated,
               related_goal_id, related_goal_kind, created_at
        FROM journal_entries
        WHERE user_id = ?
        ORDER BY date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// List entries whose `related_goal_id` is one of the given node ids,
/// oldest first (aggregation order).
///
/// Returns an empty vec for an empty id set rather than issuing a
/// degenerate `IN ()` query.
pub async fn list_entries_for_goal_ids(
    pool: &SqlitePool,
    user_id: &str,
    goal_ids: &[String],
) -> Result<Vec<JournalEntry>> {
    if goal_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        r#"
        SELECT id, user_id, title, content, mood, tags, date, is_ai_generated,
               related_goal_id, related_goal_kind, created_at
        FROM journal_entries
        WHERE user_id = "#,
    );
    builder.push_bind(user_id);
    builder.push(" AND related_goal_id IN (");
    {
        let mut separated = builder.separated(", ");
        for id in goal_ids {
            separated.push_bind(id);
        }
    }
    builder.push(") ORDER BY date ASC");

    let entries = builder
        .build_query_as::<JournalEntry>()
        .fetch_all(pool)
        .await?;

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::user;
    use crate::Database;

    fn entry(id: &str, user_id: &str, related: Option<&str>, date: &str) -> JournalEntry {
        JournalEntry {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: format!("entry {}", id),
            content: "content".to_string(),
            mood: "neutral".to_string(),
            tags: "[]".to_string(),
            date: date.to_string(),
            is_ai_generated: false,
            related_goal_id: related.map(str::to_string),
            related_goal_kind: None,
            created_at: date.to_string(),
        }
    }

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        user::create_user(
            db.pool(),
            &User {
                id: "u1".to_string(),
                email: "u1@example.com".to_string(),
                password_hash: "hash".to_string(),
                name: "Test".to_string(),
                created_at: "2026-01-01T00:00:00Z".to_string(),
            },
        )
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn test_list_entries_for_goal_ids() {
        let db = test_db().await;
        create_entry(db.pool(), &entry("e1", "u1", Some("g1"), "2026-01-02T00:00:00Z"))
            .await
            .unwrap();
        create_entry(db.pool(), &entry("e2", "u1", Some("g1-1"), "2026-01-03T00:00:00Z"))
            .await
            .unwrap();
        create_entry(db.pool(), &entry("e3", "u1", Some("other"), "2026-01-04T00:00:00Z"))
            .await
            .unwrap();
        create_entry(db.pool(), &entry("e4", "u1", None, "2026-01-05T00:00:00Z"))
            .await
            .unwrap();

        let ids = vec!["g1".to_string(), "g1-1".to_string()];
        let entries = list_entries_for_goal_ids(db.pool(), "u1", &ids).await.unwrap();
        assert_eq!(entries.len(), 2);
        // Oldest first
        assert_eq!(entries[0].id, "e1");
        assert_eq!(entries[1].id, "e2");

        let none = list_entries_for_goal_ids(db.pool(), "u1", &[]).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_list_entries_newest_first() {
        let db = test_db().await;
        create_entry(db.pool(), &entry("e1", "u1", None, "2026-01-02T00:00:00Z"))
            .await
            .unwrap();
        create_entry(db.pool(), &entry("e2", "u1", None, "2026-01-03T00:00:00Z"))
            .await
            .unwrap();

        let entries = list_entries(db.pool(), "u1").await.unwrap();
        assert_eq!(entries[0].id, "e2");
        assert_eq!(entries[1].id, "e1");
    }
}
