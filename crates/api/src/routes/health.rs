//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// `GET /health` — liveness plus model readiness.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": state.model.name(),
        "model_ready": state.model.is_ready().await,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::routes::tests::{request, test_app, test_state_with_model};
    use axum::http::{Method, StatusCode};
    use mock_insight::FailingModel;

    #[tokio::test]
    async fn test_health_is_public() {
        let app = test_app().await;
        let (status, body) = request(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model_ready"], true);
    }

    // An unconfigured model backend degrades, it does not take the
    // server down with it.
    #[tokio::test]
    async fn test_health_reports_unready_model() {
        let app =
            crate::routes::router(test_state_with_model(Arc::new(FailingModel::new())).await);
        let (status, body) = request(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model_ready"], false);
    }
}
