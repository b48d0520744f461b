//! Persona CRUD operations.
//!
//! Default personas (user_id NULL) are shared and read-only; custom
//! personas belong to a single user. Update and delete are scoped to the
//! owning user so a default or foreign persona is simply "not found" to
//! the mutation queries.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Persona;

/// Create a persona.
pub async fn create_persona(pool: &SqlitePool, persona: &Persona) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO personas
            (id, name, display_name, system_prompt, category, is_default, user_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&persona.id)
    .bind(&persona.name)
    .bind(&persona.display_name)
    .bind(&persona.system_prompt)
    .bind(&persona.category)
    .bind(persona.is_default)
    .bind(&persona.user_id)
    .bind(&persona.created_at)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Persona",
                    id: persona.name.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Get a persona visible to the user (a default or their own).
pub async fn get_persona(pool: &SqlitePool, user_id: &str, id: &str) -> Result<Persona> {
    sqlx::query_as::<_, Persona>(
        r#"
        SELECT id, name, display_name, system_prompt, category, is_default, user_id, created_at
        FROM personas
        WHERE id = ? AND (user_id IS NULL OR user_id = ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Persona",
        id: id.to_string(),
    })
}

/// List personas visible to the user: defaults first, then their own.
pub async fn list_personas(pool: &SqlitePool, user_id: &str) -> Result<Vec<Persona>> {
    let personas = sqlx::query_as::<_, Persona>(
        r#"
        SELECT id, name, display_name, system_prompt, category, is_default, user_id, created_at
        FROM personas
        WHERE user_id IS NULL OR user_id = ?
        ORDER BY is_default DESC, display_name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(personas)
}

/// Update a user-owned persona.
pub async fn update_persona(pool: &SqlitePool, user_id: &str, persona: &Persona) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE personas
        SET display_name = ?, system_prompt = ?, category = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&persona.display_name)
    .bind(&persona.system_prompt)
    .bind(&persona.category)
    .bind(&persona.id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Persona",
            id: persona.id.clone(),
        });
    }

    Ok(())
}

/// Delete a user-owned persona.
pub async fn delete_persona(pool: &SqlitePool, user_id: &str, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM personas
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Persona",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Count seeded default personas.
pub async fn count_default_personas(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM personas WHERE is_default = 1
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::user;
    use crate::Database;

    fn persona(id: &str, name: &str, user_id: Option<&str>) -> Persona {
        Persona {
            id: id.to_string(),
            name: name.to_string(),
            display_name: name.to_string(),
            system_prompt: "You are helpful.".to_string(),
            category: "coach".to_string(),
            is_default: user_id.is_none(),
            user_id: user_id.map(str::to_string),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        for uid in ["u1", "u2"] {
            user::create_user(
                db.pool(),
                &User {
                    id: uid.to_string(),
                    email: format!("{}@example.com", uid),
                    password_hash: "hash".to_string(),
                    name: "Test".to_string(),
                    created_at: "2026-01-01T00:00:00Z".to_string(),
                },
            )
            .await
            .unwrap();
        }
        db
    }

    #[tokio::test]
    async fn test_visibility_and_ownership() {
        let db = test_db().await;
        create_persona(db.pool(), &persona("d1", "coach", None)).await.unwrap();
        create_persona(db.pool(), &persona("c1", "my-coach", Some("u1"))).await.unwrap();

        // u1 sees the default and their own; u2 only the default.
        let u1_list = list_personas(db.pool(), "u1").await.unwrap();
        assert_eq!(u1_list.len(), 2);
        let u2_list = list_personas(db.pool(), "u2").await.unwrap();
        assert_eq!(u2_list.len(), 1);

        // u2 cannot read u1's custom persona.
        let result = get_persona(db.pool(), "u2", "c1").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        // Mutating a default persona is NotFound (scoped by user_id).
        let mut updated = persona("d1", "coach", None);
        updated.display_name = "renamed".to_string();
        let result = update_persona(db.pool(), "u1", &updated).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
        let result = delete_persona(db.pool(), "u1", "d1").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        // Owner can delete their own.
        delete_persona(db.pool(), "u1", "c1").await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = test_db().await;
        create_persona(db.pool(), &persona("d1", "coach", None)).await.unwrap();
        let result = create_persona(db.pool(), &persona("d2", "coach", None)).await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { .. })));
    }
}
