//! Progress check-ins and their analytics.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use database::models::GoalProgress;
use database::{progress as progress_store, validation};
use reflection::analytics;
use reflection::time;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::{ApiError, Result};
use crate::routes::goals::resolve_subtree;
use crate::state::AppState;

/// A check-in as returned to clients, with tags as a real array.
#[derive(Debug, Serialize)]
pub struct ProgressView {
    pub id: String,
    pub goal_id: String,
    pub sub_goal_id: Option<String>,
    pub progress_type: String,
    pub mood: String,
    pub difficulty: i64,
    pub time_spent_minutes: i64,
    pub completion_percentage: i64,
    pub is_milestone: bool,
    pub tags: Vec<String>,
    pub note: Option<String>,
    pub date: String,
    pub created_at: String,
}

impl From<GoalProgress> for ProgressView {
    fn from(record: GoalProgress) -> Self {
        let tags = serde_json::from_str(&record.tags).unwrap_or_default();
        Self {
            id: record.id,
            goal_id: record.goal_id,
            sub_goal_id: record.sub_goal_id,
            progress_type: record.progress_type,
            mood: record.mood,
            difficulty: record.difficulty,
            time_spent_minutes: record.time_spent_minutes,
            completion_percentage: record.completion_percentage,
            is_milestone: record.is_milestone,
            tags,
            note: record.note,
            date: record.date,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProgressRequest {
    #[serde(default = "default_progress_type")]
    pub progress_type: String,
    pub mood: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: i64,
    #[serde(default)]
    pub time_spent_minutes: i64,
    pub completion_percentage: i64,
    #[serde(default)]
    pub is_milestone: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub note: Option<String>,
    pub sub_goal_id: Option<String>,
    pub date: Option<String>,
}

fn default_progress_type() -> String {
    "checkin".to_string()
}

fn default_difficulty() -> i64 {
    3
}

async fn records_for(
    state: &AppState,
    user_id: &str,
    goal_id: &str,
) -> Result<Vec<GoalProgress>> {
    let (_, ids) = resolve_subtree(state, user_id, goal_id).await?;
    Ok(progress_store::list_progress_for_goal_ids(state.db.pool(), user_id, &ids).await?)
}

/// `GET /api/goals/:goal_id/progress` — check-ins for the subtree, oldest
/// first.
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(goal_id): Path<String>,
) -> Result<Json<Vec<ProgressView>>> {
    let records = records_for(&state, &claims.sub, &goal_id).await?;
    Ok(Json(records.into_iter().map(ProgressView::from).collect()))
}

/// `POST /api/goals/:goal_id/progress`
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(goal_id): Path<String>,
    Json(req): Json<CreateProgressRequest>,
) -> Result<Json<ProgressView>> {
    validation::validate_progress_type(&req.progress_type)?;
    validation::validate_mood(&req.mood)?;
    validation::validate_difficulty(req.difficulty)?;
    validation::validate_completion_percentage(req.completion_percentage)?;
    if let Some(ref date) = req.date {
        if time::parse_date(date).is_none() {
            return Err(ApiError::Validation(format!("Invalid date: {}", date)));
        }
    }

    let (_, ids) = resolve_subtree(&state, &claims.sub, &goal_id).await?;
    if let Some(ref sub_id) = req.sub_goal_id {
        if !ids.iter().any(|id| id == sub_id) {
            return Err(ApiError::Validation(format!(
                "sub_goal_id {} is not under goal {}",
                sub_id, goal_id
            )));
        }
    }

    let record = GoalProgress {
        id: Uuid::new_v4().to_string(),
        user_id: claims.sub.clone(),
        goal_id,
        sub_goal_id: req.sub_goal_id,
        progress_type: req.progress_type,
        mood: req.mood,
        difficulty: req.difficulty,
        time_spent_minutes: req.time_spent_minutes,
        completion_percentage: req.completion_percentage,
        is_milestone: req.is_milestone,
        tags: serde_json::to_string(&req.tags)
            .map_err(|e| ApiError::Internal(format!("Failed to serialize tags: {}", e)))?,
        note: req.note,
        date: req.date.unwrap_or_else(time::now),
        created_at: time::now(),
    };
    progress_store::create_progress(state.db.pool(), &record).await?;

    Ok(Json(record.into()))
}

/// `GET /api/goals/:goal_id/progress/summary`
pub async fn summary(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(goal_id): Path<String>,
) -> Result<Json<analytics::ProgressSummary>> {
    let records = records_for(&state, &claims.sub, &goal_id).await?;
    Ok(Json(analytics::progress_summary(&records)))
}

/// `GET /api/goals/:goal_id/progress/analytics`
pub async fn analytics(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(goal_id): Path<String>,
) -> Result<Json<analytics::Analytics>> {
    let records = records_for(&state, &claims.sub, &goal_id).await?;
    Ok(Json(analytics::analyze(&records)))
}

/// `GET /api/goals/:goal_id/progress/insights`
pub async fn insights(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(goal_id): Path<String>,
) -> Result<Json<analytics::Insights>> {
    let records = records_for(&state, &claims.sub, &goal_id).await?;
    Ok(Json(analytics::insights(&records)))
}
