//! Persona chat sessions.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use database::models::{ChatMessage, ChatSession};
use database::{chat, persona as persona_store};
use reflection::diary;
use reflection::time;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub persona_id: String,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub content: String,
}

/// `POST /api/chat/sessions`
pub async fn create_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<ChatSession>> {
    // The persona must be visible to the caller.
    let persona = persona_store::get_persona(state.db.pool(), &claims.sub, &req.persona_id).await?;

    let session = ChatSession {
        id: Uuid::new_v4().to_string(),
        user_id: claims.sub.clone(),
        persona_id: persona.id,
        title: req
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| format!("Chat with {}", persona.display_name)),
        created_at: time::now(),
    };
    chat::create_session(state.db.pool(), &session).await?;
    Ok(Json(session))
}

/// `GET /api/chat/sessions`
pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<ChatSession>>> {
    Ok(Json(chat::list_sessions(state.db.pool(), &claims.sub).await?))
}

/// `GET /api/chat/sessions/:id/messages`
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>> {
    chat::get_session(state.db.pool(), &claims.sub, &id).await?;
    Ok(Json(chat::list_messages(state.db.pool(), &id).await?))
}

/// `POST /api/chat/sessions/:id/messages`
///
/// Persists the user message, asks the persona for a reply, and persists
/// that too. The user message survives even when the model call fails.
pub async fn post_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(req): Json<PostMessageRequest>,
) -> Result<Json<Value>> {
    if req.content.trim().is_empty() {
        return Err(ApiError::Validation("Message must not be empty".to_string()));
    }

    let session = chat::get_session(state.db.pool(), &claims.sub, &id).await?;
    let persona =
        persona_store::get_persona(state.db.pool(), &claims.sub, &session.persona_id).await?;

    let user_message = ChatMessage {
        id: Uuid::new_v4().to_string(),
        session_id: session.id.clone(),
        role: "user".to_string(),
        content: req.content,
        created_at: time::now(),
    };
    chat::add_message(state.db.pool(), &user_message).await?;

    let transcript = chat::list_messages(state.db.pool(), &session.id).await?;
    let reply =
        diary::persona_reply(state.model.as_ref(), &persona.system_prompt, &transcript).await?;

    let assistant_message = ChatMessage {
        id: Uuid::new_v4().to_string(),
        session_id: session.id,
        role: "assistant".to_string(),
        content: reply,
        created_at: time::now(),
    };
    chat::add_message(state.db.pool(), &assistant_message).await?;

    Ok(Json(json!({
        "user_message": user_message,
        "assistant_message": assistant_message,
    })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::routes::tests::{register, request, test_state_with_model};
    use axum::http::{Method, StatusCode};
    use axum::Router;
    use insight_core::InsightModel;
    use mock_insight::{FailingModel, ScriptedModel};
    use serde_json::json;

    async fn seeded_app(model: Arc<dyn InsightModel>) -> Router {
        let state = test_state_with_model(model).await;
        reflection::persona::seed_default_personas(&state.db)
            .await
            .unwrap();
        crate::routes::router(state)
    }

    async fn default_persona_id(app: &Router, token: &str) -> String {
        let (_, body) = request(app, Method::GET, "/api/personas", Some(token), None).await;
        body[0]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_chat_roundtrip() {
        let app = seeded_app(Arc::new(ScriptedModel::new(["Hello there!"]))).await;
        let token = register(&app, "alice@example.com").await;
        let persona_id = default_persona_id(&app, &token).await;

        let (status, session) = request(
            &app,
            Method::POST,
            "/api/chat/sessions",
            Some(&token),
            Some(json!({"persona_id": persona_id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let session_id = session["id"].as_str().unwrap().to_string();
        assert!(session["title"].as_str().unwrap().starts_with("Chat with"));

        let (status, body) = request(
            &app,
            Method::POST,
            &format!("/api/chat/sessions/{}/messages", session_id),
            Some(&token),
            Some(json!({"content": "Hi!"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["assistant_message"]["content"], "Hello there!");

        let (_, messages) = request(
            &app,
            Method::GET,
            &format!("/api/chat/sessions/{}/messages", session_id),
            Some(&token),
            None,
        )
        .await;
        let messages = messages.as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[1]["role"], "assistant");
    }

    #[tokio::test]
    async fn test_model_failure_keeps_user_message() {
        let app = seeded_app(Arc::new(FailingModel::new())).await;
        let token = register(&app, "alice@example.com").await;
        let persona_id = default_persona_id(&app, &token).await;

        let (_, session) = request(
            &app,
            Method::POST,
            "/api/chat/sessions",
            Some(&token),
            Some(json!({"persona_id": persona_id})),
        )
        .await;
        let session_id = session["id"].as_str().unwrap().to_string();

        let (status, _) = request(
            &app,
            Method::POST,
            &format!("/api/chat/sessions/{}/messages", session_id),
            Some(&token),
            Some(json!({"content": "Hi!"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (_, messages) = request(
            &app,
            Method::GET,
            &format!("/api/chat/sessions/{}/messages", session_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(messages.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_foreign_session_is_not_found() {
        let app = seeded_app(Arc::new(ScriptedModel::new(["x"]))).await;
        let alice = register(&app, "alice@example.com").await;
        let bob = register(&app, "bob@example.com").await;
        let persona_id = default_persona_id(&app, &alice).await;

        let (_, session) = request(
            &app,
            Method::POST,
            "/api/chat/sessions",
            Some(&alice),
            Some(json!({"persona_id": persona_id})),
        )
        .await;
        let session_id = session["id"].as_str().unwrap();

        let (status, _) = request(
            &app,
            Method::GET,
            &format!("/api/chat/sessions/{}/messages", session_id),
            Some(&bob),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_persona_is_not_found() {
        let app = seeded_app(Arc::new(ScriptedModel::new(["x"]))).await;
        let token = register(&app, "alice@example.com").await;

        let (status, _) = request(
            &app,
            Method::POST,
            "/api/chat/sessions",
            Some(&token),
            Some(json!({"persona_id": "missing"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
