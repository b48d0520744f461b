//! Mapper-as-a-service and chat-to-diary conversion.

use axum::extract::State;
use axum::{Extension, Json};
use database::models::{ChatMessage as TranscriptRow, JournalEntry};
use database::{chat, journal};
use reflection::diary;
use reflection::mapper::{self, MappingDecision};
use reflection::time;
use reflection::tree;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::{ApiError, Result};
use crate::routes::goals::try_load_tree;
use crate::routes::journal::EntryView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

/// `POST /api/analyze-goal-mapping` — run the mapper on supplied text.
///
/// With no saved tree there is nothing to map against; the response is the
/// no-match verdict, not an error.
pub async fn analyze(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<Value>> {
    let decision = match try_load_tree(&state, &claims.sub).await? {
        Some(root) => {
            mapper::analyze_goal_mapping(state.model.as_ref(), &tree::flatten(&root), &req.text)
                .await
        }
        None => MappingDecision {
            goal_id: None,
            goal_kind: None,
            confidence: 0.0,
        },
    };

    Ok(Json(json!({
        "goal_id": decision.goal_id,
        "goal_kind": decision.goal_kind.map(|k| k.as_str()),
        "confidence": decision.confidence,
    })))
}

/// Either an existing session or an inline transcript.
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    pub session_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<InlineMessage>,
}

#[derive(Debug, Deserialize)]
pub struct InlineMessage {
    pub role: String,
    pub content: String,
}

/// `POST /api/convert-to-diary`
///
/// Converts a chat transcript into a journal entry. The conversion itself
/// never fails (templated fallback); the entry is saved with
/// `is_ai_generated = true` and then run through the goal mapper.
pub async fn convert_to_diary(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ConvertRequest>,
) -> Result<Json<EntryView>> {
    let transcript: Vec<TranscriptRow> = match req.session_id {
        Some(ref session_id) => {
            // Ownership check; a foreign session is a 404.
            chat::get_session(state.db.pool(), &claims.sub, session_id).await?;
            chat::list_messages(state.db.pool(), session_id).await?
        }
        None => req
            .messages
            .iter()
            .map(|m| TranscriptRow {
                id: String::new(),
                session_id: String::new(),
                role: m.role.clone(),
                content: m.content.clone(),
                created_at: String::new(),
            })
            .collect(),
    };
    if transcript.is_empty() {
        return Err(ApiError::Validation(
            "Nothing to convert: empty transcript".to_string(),
        ));
    }

    let now = time::now();
    let draft = diary::convert_transcript(state.model.as_ref(), &transcript, &now).await;

    let root = try_load_tree(&state, &claims.sub).await?;
    let (related_goal_id, related_goal_kind) =
        crate::routes::journal::relate(&state, root.as_ref(), None, &draft.content).await?;

    let entry = JournalEntry {
        id: Uuid::new_v4().to_string(),
        user_id: claims.sub.clone(),
        title: draft.title,
        content: draft.content,
        mood: draft.mood.as_str().to_string(),
        tags: serde_json::to_string(&draft.tags)
            .map_err(|e| ApiError::Internal(format!("Failed to serialize tags: {}", e)))?,
        date: now.clone(),
        is_ai_generated: true,
        related_goal_id,
        related_goal_kind,
        created_at: now,
    };
    journal::create_entry(state.db.pool(), &entry).await?;

    Ok(Json(entry.into()))
}
