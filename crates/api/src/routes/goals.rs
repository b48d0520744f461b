//! The Mandalart goal tree.

use axum::extract::State;
use axum::{Extension, Json};
use database::{goal, DatabaseError};
use reflection::tree::{self, GoalNode};
use reflection::time;
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Load and parse the caller's tree. 404 until their first save.
pub(crate) async fn load_tree(state: &AppState, user_id: &str) -> Result<GoalNode> {
    let doc = goal::get_goal_document(state.db.pool(), user_id).await?;
    decode_tree(&doc.tree)
}

/// Like [`load_tree`], but a missing tree is `None` instead of a 404.
pub(crate) async fn try_load_tree(state: &AppState, user_id: &str) -> Result<Option<GoalNode>> {
    match goal::get_goal_document(state.db.pool(), user_id).await {
        Ok(doc) => Ok(Some(decode_tree(&doc.tree)?)),
        Err(DatabaseError::NotFound { .. }) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn decode_tree(raw: &str) -> Result<GoalNode> {
    serde_json::from_str(raw)
        .map_err(|source| DatabaseError::document("goal tree", source).into())
}

/// Resolve a node id against the caller's tree into its subtree ids.
pub(crate) async fn resolve_subtree(
    state: &AppState,
    user_id: &str,
    goal_id: &str,
) -> Result<(GoalNode, Vec<String>)> {
    let root = load_tree(state, user_id).await?;
    let ids = tree::subtree_ids(&root, goal_id)
        .ok_or_else(|| ApiError::NotFound(format!("Goal node not found: {}", goal_id)))?;
    Ok((root, ids))
}

/// `GET /api/goals`
pub async fn get_goals(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<GoalNode>> {
    Ok(Json(load_tree(&state, &claims.sub).await?))
}

/// `POST /api/goals` — create or replace the whole tree.
///
/// The submitted tree is normalized (slots padded to nine, depth capped)
/// and node ids must be unique within it.
pub async fn save_goals(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(mut root): Json<GoalNode>,
) -> Result<Json<GoalNode>> {
    if root.id.trim().is_empty() {
        return Err(ApiError::Validation("Root goal id must not be empty".to_string()));
    }
    tree::normalize(&mut root);
    if let Some(dup) = tree::find_duplicate_id(&root) {
        return Err(ApiError::Validation(format!("Duplicate goal id: {}", dup)));
    }

    let tree_json = serde_json::to_string(&root)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize tree: {}", e)))?;
    goal::upsert_goal_document(
        state.db.pool(),
        &Uuid::new_v4().to_string(),
        &claims.sub,
        &tree_json,
        &time::now(),
    )
    .await?;

    Ok(Json(root))
}
