//! Persona management.
//!
//! Default personas are listed for everyone but cannot be modified or
//! deleted; custom personas are private to their owner.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use database::models::Persona;
use database::{persona as persona_store, validation};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::{ApiError, Result};
use crate::state::AppState;
use reflection::time;

#[derive(Debug, Deserialize)]
pub struct CreatePersonaRequest {
    pub name: String,
    pub display_name: String,
    pub system_prompt: String,
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePersonaRequest {
    pub display_name: Option<String>,
    pub system_prompt: Option<String>,
    pub category: Option<String>,
}

/// `GET /api/personas` — defaults plus the caller's own.
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Persona>>> {
    Ok(Json(
        persona_store::list_personas(state.db.pool(), &claims.sub).await?,
    ))
}

/// `POST /api/personas`
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreatePersonaRequest>,
) -> Result<Json<Persona>> {
    validation::validate_persona_category(&req.category)?;
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("Name must not be empty".to_string()));
    }
    if req.system_prompt.trim().is_empty() {
        return Err(ApiError::Validation(
            "System prompt must not be empty".to_string(),
        ));
    }

    let persona = Persona {
        id: Uuid::new_v4().to_string(),
        name: req.name.trim().to_string(),
        display_name: req.display_name.trim().to_string(),
        system_prompt: req.system_prompt,
        category: req.category,
        is_default: false,
        user_id: Some(claims.sub.clone()),
        created_at: time::now(),
    };
    persona_store::create_persona(state.db.pool(), &persona).await?;
    Ok(Json(persona))
}

/// Fetch a persona for mutation: visible, owned, and not a default.
async fn mutable_persona(state: &AppState, user_id: &str, id: &str) -> Result<Persona> {
    let persona = persona_store::get_persona(state.db.pool(), user_id, id).await?;
    if persona.is_default {
        return Err(ApiError::Forbidden(
            "Default personas cannot be modified".to_string(),
        ));
    }
    Ok(persona)
}

/// `PUT /api/personas/:id`
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePersonaRequest>,
) -> Result<Json<Persona>> {
    let mut persona = mutable_persona(&state, &claims.sub, &id).await?;

    if let Some(display_name) = req.display_name {
        persona.display_name = display_name.trim().to_string();
    }
    if let Some(system_prompt) = req.system_prompt {
        persona.system_prompt = system_prompt;
    }
    if let Some(category) = req.category {
        validation::validate_persona_category(&category)?;
        persona.category = category;
    }

    persona_store::update_persona(state.db.pool(), &claims.sub, &persona).await?;
    Ok(Json(persona))
}

/// `DELETE /api/personas/:id`
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    mutable_persona(&state, &claims.sub, &id).await?;
    persona_store::delete_persona(state.db.pool(), &claims.sub, &id).await?;
    Ok(Json(serde_json::json!({"deleted": id})))
}

#[cfg(test)]
mod tests {
    use crate::routes::tests::{register, request, test_app, test_state};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    async fn seeded_app() -> axum::Router {
        let state = test_state().await;
        reflection::persona::seed_default_personas(&state.db)
            .await
            .unwrap();
        crate::routes::router(state)
    }

    #[tokio::test]
    async fn test_defaults_listed_but_immutable() {
        let app = seeded_app().await;
        let token = register(&app, "alice@example.com").await;

        let (status, body) = request(&app, Method::GET, "/api/personas", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let personas = body.as_array().unwrap();
        assert_eq!(personas.len(), 4);
        let default_id = personas[0]["id"].as_str().unwrap().to_string();

        let (status, _) = request(
            &app,
            Method::PUT,
            &format!("/api/personas/{}", default_id),
            Some(&token),
            Some(json!({"display_name": "Hijacked"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = request(
            &app,
            Method::DELETE,
            &format!("/api/personas/{}", default_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_custom_persona_lifecycle() {
        let app = test_app().await;
        let token = register(&app, "alice@example.com").await;

        let (status, created) = request(
            &app,
            Method::POST,
            "/api/personas",
            Some(&token),
            Some(json!({
                "name": "my-coach", "display_name": "My Coach",
                "system_prompt": "You push me.", "category": "coach"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, updated) = request(
            &app,
            Method::PUT,
            &format!("/api/personas/{}", id),
            Some(&token),
            Some(json!({"display_name": "Renamed Coach"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["display_name"], "Renamed Coach");

        let (status, _) = request(
            &app,
            Method::DELETE,
            &format!("/api/personas/{}", id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, listed) = request(&app, Method::GET, "/api/personas", Some(&token), None).await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_persona_is_not_found() {
        let app = test_app().await;
        let alice = register(&app, "alice@example.com").await;
        let bob = register(&app, "bob@example.com").await;

        let (_, created) = request(
            &app,
            Method::POST,
            "/api/personas",
            Some(&alice),
            Some(json!({
                "name": "private", "display_name": "Private",
                "system_prompt": "Mine.", "category": "friend"
            })),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let (status, _) = request(
            &app,
            Method::PUT,
            &format!("/api/personas/{}", id),
            Some(&bob),
            Some(json!({"display_name": "Stolen"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_category_rejected() {
        let app = test_app().await;
        let token = register(&app, "alice@example.com").await;
        let (status, _) = request(
            &app,
            Method::POST,
            "/api/personas",
            Some(&token),
            Some(json!({
                "name": "x", "display_name": "X",
                "system_prompt": "Y.", "category": "wizard"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
