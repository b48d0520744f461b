//! Route handlers for the Mandalog API.

pub mod auth;
pub mod chat;
pub mod goals;
pub mod health;
pub mod journal;
pub mod journey;
pub mod mapping;
pub mod personas;
pub mod progress;
pub mod summaries;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use axum::Router;

use crate::auth::middleware::require_auth;
use crate::state::AppState;

/// Build the router with all routes.
///
/// Everything under `/api` except `/api/auth/*` requires a Bearer token.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        // Goal tree
        .route("/api/goals", get(goals::get_goals).post(goals::save_goals))
        // Journal
        .route("/api/journal", get(journal::list).post(journal::create))
        .route("/api/goals/:goal_id/journals", get(journal::list_for_goal))
        // Summaries
        .route(
            "/api/goals/:goal_id/journals/summary",
            get(summaries::journal_summary),
        )
        .route(
            "/api/goals/:goal_id/children/summary",
            get(summaries::children_summary),
        )
        .route("/api/goals/:goal_id/wordcloud", get(summaries::wordcloud))
        // Progress
        .route(
            "/api/goals/:goal_id/progress",
            get(progress::list).post(progress::create),
        )
        .route("/api/goals/:goal_id/progress/summary", get(progress::summary))
        .route(
            "/api/goals/:goal_id/progress/analytics",
            get(progress::analytics),
        )
        .route("/api/goals/:goal_id/progress/insights", get(progress::insights))
        // Journey
        .route(
            "/api/goals/:goal_id/emotional-journey",
            get(journey::emotional_journey),
        )
        .route(
            "/api/goals/:goal_id/narrative-timeline",
            get(journey::narrative_timeline),
        )
        // Mapping and conversion
        .route("/api/analyze-goal-mapping", post(mapping::analyze))
        .route("/api/convert-to-diary", post(mapping::convert_to_diary))
        // Personas
        .route("/api/personas", get(personas::list).post(personas::create))
        .route(
            "/api/personas/:id",
            put(personas::update).delete(personas::delete),
        )
        // Chat
        .route(
            "/api/chat/sessions",
            get(chat::list_sessions).post(chat::create_session),
        )
        .route(
            "/api/chat/sessions/:id/messages",
            get(chat::list_messages).post(chat::post_message),
        )
        .layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .merge(protected)
        .with_state(state)
}
