//! Emotional journey and narrative timeline.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use database::{journal, progress as progress_store};
use reflection::journey::{self, MoodPoint, NarrativeTimeline};
use reflection::tree;

use crate::auth::Claims;
use crate::error::{ApiError, Result};
use crate::routes::goals::resolve_subtree;
use crate::state::AppState;

/// `GET /api/goals/:goal_id/emotional-journey`
pub async fn emotional_journey(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(goal_id): Path<String>,
) -> Result<Json<Vec<MoodPoint>>> {
    let (_, ids) = resolve_subtree(&state, &claims.sub, &goal_id).await?;
    let entries = journal::list_entries_for_goal_ids(state.db.pool(), &claims.sub, &ids).await?;
    let records =
        progress_store::list_progress_for_goal_ids(state.db.pool(), &claims.sub, &ids).await?;
    Ok(Json(journey::emotional_journey(&entries, &records)))
}

/// `GET /api/goals/:goal_id/narrative-timeline`
pub async fn narrative_timeline(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(goal_id): Path<String>,
) -> Result<Json<NarrativeTimeline>> {
    let (root, ids) = resolve_subtree(&state, &claims.sub, &goal_id).await?;
    let node = tree::find_node(&root, &goal_id)
        .ok_or_else(|| ApiError::NotFound(format!("Goal node not found: {}", goal_id)))?;
    let entries = journal::list_entries_for_goal_ids(state.db.pool(), &claims.sub, &ids).await?;
    let records =
        progress_store::list_progress_for_goal_ids(state.db.pool(), &claims.sub, &ids).await?;
    let timeline =
        journey::narrative_timeline(state.model.as_ref(), &node.text, &entries, &records).await;
    Ok(Json(timeline))
}
