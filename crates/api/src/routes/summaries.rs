//! Goal summaries: journal narrative, children grouping, wordcloud.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use reflection::summary::{get_or_build, SummaryResult, SummaryType};

use crate::auth::Claims;
use crate::error::Result;
use crate::routes::goals::load_tree;
use crate::state::AppState;

async fn build(
    state: AppState,
    claims: Claims,
    goal_id: String,
    summary_type: SummaryType,
) -> Result<Json<SummaryResult>> {
    let root = load_tree(&state, &claims.sub).await?;
    let result = get_or_build(
        &state.db,
        state.model.as_ref(),
        &claims.sub,
        &root,
        &goal_id,
        summary_type,
    )
    .await?;
    Ok(Json(result))
}

/// `GET /api/goals/:goal_id/journals/summary`
pub async fn journal_summary(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(goal_id): Path<String>,
) -> Result<Json<SummaryResult>> {
    build(state, claims, goal_id, SummaryType::Journal).await
}

/// `GET /api/goals/:goal_id/children/summary`
pub async fn children_summary(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(goal_id): Path<String>,
) -> Result<Json<SummaryResult>> {
    build(state, claims, goal_id, SummaryType::Children).await
}

/// `GET /api/goals/:goal_id/wordcloud`
pub async fn wordcloud(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(goal_id): Path<String>,
) -> Result<Json<SummaryResult>> {
    build(state, claims, goal_id, SummaryType::Wordcloud).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::routes::tests::{register, request, save_sample_tree, test_state_with_model};
    use axum::http::{Method, StatusCode};
    use mock_insight::ScriptedModel;
    use serde_json::json;

    #[tokio::test]
    async fn test_summary_caches_across_requests() {
        // One mapping verdict for the entry, one narrative. The second
        // summary request must be served from the cache.
        let model = Arc::new(ScriptedModel::new([
            r#"{"goal_id": "g1", "confidence": 0.9}"#,
            "A fine narrative.",
        ]));
        let app = crate::routes::router(test_state_with_model(model.clone()).await);
        let token = register(&app, "alice@example.com").await;
        save_sample_tree(&app, &token).await;

        let (status, _) = request(
            &app,
            Method::POST,
            "/api/journal",
            Some(&token),
            Some(json!({"title": "Rust", "content": "rust rust rust", "mood": "good"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let uri = "/api/goals/g1/journals/summary";
        let (status, first) = request(&app, Method::GET, uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["summary"], "A fine narrative.");
        assert_eq!(first["cached"], false);
        assert_eq!(first["entry_count"], 1);

        let (_, second) = request(&app, Method::GET, uri, Some(&token), None).await;
        assert_eq!(second["cached"], true);
        assert_eq!(second["summary"], first["summary"]);
        assert_eq!(model.remaining(), 0);
    }

    #[tokio::test]
    async fn test_wordcloud_needs_no_model() {
        let model = Arc::new(ScriptedModel::new([
            r#"{"goal_id": "g1", "confidence": 0.9}"#,
        ]));
        let app = crate::routes::router(test_state_with_model(model).await);
        let token = register(&app, "alice@example.com").await;
        save_sample_tree(&app, &token).await;

        request(
            &app,
            Method::POST,
            "/api/journal",
            Some(&token),
            Some(json!({"title": "Rust", "content": "rust rust coffee", "mood": "good"})),
        )
        .await;

        let (status, body) = request(
            &app,
            Method::GET,
            "/api/goals/g1/wordcloud",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metadata"]["wordcloud"][0]["word"], "rust");
        assert_eq!(body["metadata"]["wordcloud"][0]["count"], 2);
    }

    #[tokio::test]
    async fn test_unknown_node_is_404() {
        let app = crate::routes::tests::test_app().await;
        let token = register(&app, "alice@example.com").await;
        save_sample_tree(&app, &token).await;

        let (status, _) = request(
            &app,
            Method::GET,
            "/api/goals/missing/journals/summary",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
