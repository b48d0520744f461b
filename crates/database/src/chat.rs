//! Chat session and message operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{ChatMessage, ChatSession};

/// Create a chat session.
pub async fn create_session(pool: &SqlitePool, session: &ChatSession) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO chat_sessions (id, user_id, persona_id, title, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&session.id)
    .bind(&session.user_id)
    .bind(&session.persona_id)
    .bind(&session.title)
    .bind(&session.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a session, scoped to its owner.
pub async fn get_session(pool: &SqlitePool, user_id: &str, id: &str) -> Result<ChatSession> {
    sqlx::query_as::<_, ChatSession>(
        r#"
        SELECT id, user_id, persona_id, title, created_at
        FROM chat_sessions
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "ChatSession",
        id: id.to_string(),
    })
}

/// List a user's sessions, newest first.
pub async fn list_sessions(pool: &SqlitePool, user_id: &str) -> Result<Vec<ChatSession>> {
    let sessions = sqlx::query_as::<_, ChatSession>(
        r#"
        SELECT id, user_id, persona_id, title, created_at
        FROM chat_sessions
        WHERE user_id = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(sessions)
}

/// Append a message to a session.
pub async fn add_message(pool: &SqlitePool, message: &ChatMessage) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO chat_messages (id, session_id, role, content, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&message.id)
    .bind(&message.session_id)
    .bind(&message.role)
    .bind(&message.content)
    .bind(&message.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// List a session's messages in order.
pub async fn list_messages(pool: &SqlitePool, session_id: &str) -> Result<Vec<ChatMessage>> {
    let messages = sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT id, session_id, role, content, created_at
        FROM chat_messages
        WHERE session_id = ?
        ORDER BY created_at ASC
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Persona, User};
    use crate::{persona, user};
    use crate::Database;

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
        persona::create_persona(
            db.pool(),
            &Persona {
                id: "p1".to_string(),
                name: "coach".to_string(),
                display_name: "Coach".to_string(),
                system_prompt: "You are a coach.".to_string(),
                category: "coach".to_string(),
                is_default: true,
                user_id: None,
                created_at: "2026-01-01T00:00:00Z".to_string(),
            },
        )
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn test_session_and_messages() {
        let db = test_db().await;
        let session = ChatSession {
            id: "s1".to_string(),
            user_id: "u1".to_string(),
            persona_id: "p1".to_string(),
            title: "Morning chat".to_string(),
            created_at: "2026-01-02T00:00:00Z".to_string(),
        };
        create_session(db.pool(), &session).await.unwrap();

        add_message(
            db.pool(),
            &ChatMessage {
                id: "m1".to_string(),
                session_id: "s1".to_string(),
                role: "user".to_string(),
                content: "Hello".to_string(),
                created_at: "2026-01-02T00:00:01Z".to_string(),
            },
        )
        .await
        .unwrap();
        add_message(
            db.pool(),
            &ChatMessage {
                id: "m2".to_string(),
                session_id: "s1".to_string(),
                role: "assistant".to_string(),
                content: "Hi!".to_string(),
                created_at: "2026-01-02T00:00:02Z".to_string(),
            },
        )
        .await
        .unwrap();

        let messages = list_messages(db.pool(), "s1").await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[1].role, "assistant");

        // Ownership scoping
        let result = get_session(db.pool(), "someone-else", "s1").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
