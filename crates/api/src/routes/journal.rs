//! Journal entries.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use database::models::JournalEntry;
use database::{journal, validation};
use reflection::mapper;
use reflection::time;
use reflection::tree::{self, GoalNode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::{ApiError, Result};
use crate::routes::goals::{resolve_subtree, try_load_tree};
use crate::state::AppState;

/// An entry as returned to clients, with tags as a real array.
#[derive(Debug, Serialize)]
pub struct EntryView {
    pub id: String,
    pub title: String,
    pub content: String,
    pub mood: String,
    pub tags: Vec<String>,
    pub date: String,
    pub is_ai_generated: bool,
    pub related_goal_id: Option<String>,
    pub related_goal_kind: Option<String>,
    pub created_at: String,
}

impl From<JournalEntry> for EntryView {
    fn from(entry: JournalEntry) -> Self {
        let tags = serde_json::from_str(&entry.tags).unwrap_or_default();
        Self {
            id: entry.id,
            title: entry.title,
            content: entry.content,
            mood: entry.mood,
            tags,
            date: entry.date,
            is_ai_generated: entry.is_ai_generated,
            related_goal_id: entry.related_goal_id,
            related_goal_kind: entry.related_goal_kind,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub title: String,
    pub content: String,
    pub mood: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date: Option<String>,
    pub related_goal_id: Option<String>,
}

/// `GET /api/journal` — all of the caller's entries, newest first.
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<EntryView>>> {
    let entries = journal::list_entries(state.db.pool(), &claims.sub).await?;
    Ok(Json(entries.into_iter().map(EntryView::from).collect()))
}

/// `GET /api/goals/:goal_id/journals` — entries for a node's subtree.
pub async fn list_for_goal(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(goal_id): Path<String>,
) -> Result<Json<Vec<EntryView>>> {
    let (_, ids) = resolve_subtree(&state, &claims.sub, &goal_id).await?;
    let entries = journal::list_entries_for_goal_ids(state.db.pool(), &claims.sub, &ids).await?;
    Ok(Json(entries.into_iter().map(EntryView::from).collect()))
}

/// `POST /api/journal`
///
/// When the client supplies `related_goal_id` it must name a node in
/// their tree. Otherwise the mapper decides, and a mapper failure just
/// leaves the entry unlinked.
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateEntryRequest>,
) -> Result<Json<EntryView>> {
    validation::validate_title(&req.title)?;
    validation::validate_mood(&req.mood)?;
    if req.content.trim().is_empty() {
        return Err(ApiError::Validation("Content must not be empty".to_string()));
    }
    if let Some(ref date) = req.date {
        if time::parse_date(date).is_none() {
            return Err(ApiError::Validation(format!("Invalid date: {}", date)));
        }
    }

    let root = try_load_tree(&state, &claims.sub).await?;
    let (related_goal_id, related_goal_kind) =
        relate(&state, root.as_ref(), req.related_goal_id.as_deref(), &req.content).await?;

    let entry = JournalEntry {
        id: Uuid::new_v4().to_string(),
        user_id: claims.sub.clone(),
        title: req.title.trim().to_string(),
        content: req.content,
        mood: req.mood,
        tags: serde_json::to_string(&req.tags)
            .map_err(|e| ApiError::Internal(format!("Failed to serialize tags: {}", e)))?,
        date: req.date.unwrap_or_else(time::now),
        is_ai_generated: false,
        related_goal_id,
        related_goal_kind,
        created_at: time::now(),
    };
    journal::create_entry(state.db.pool(), &entry).await?;

    Ok(Json(entry.into()))
}

/// Decide the related goal for a new entry.
///
/// A client-supplied id is validated against the tree (400 when unknown);
/// with no supplied id and a tree present the mapper runs.
pub(crate) async fn relate(
    state: &AppState,
    root: Option<&GoalNode>,
    supplied: Option<&str>,
    content: &str,
) -> Result<(Option<String>, Option<String>)> {
    if let Some(id) = supplied {
        let Some(root) = root else {
            return Err(ApiError::Validation(format!("Unknown goal id: {}", id)));
        };
        let flat = tree::flatten(root);
        let matched = flat
            .iter()
            .find(|g| g.id == id)
            .ok_or_else(|| ApiError::Validation(format!("Unknown goal id: {}", id)))?;
        return Ok((
            Some(matched.id.clone()),
            Some(matched.kind.as_str().to_string()),
        ));
    }

    let Some(root) = root else {
        return Ok((None, None));
    };
    let decision =
        mapper::analyze_goal_mapping(state.model.as_ref(), &tree::flatten(root), content).await;
    Ok((
        decision.goal_id,
        decision.goal_kind.map(|k| k.as_str().to_string()),
    ))
}
