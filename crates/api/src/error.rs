//! Error types for the API server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::{DatabaseError, ValidationError};
use insight_core::InsightError;
use reflection::ReflectionError;
use thiserror::Error;

/// Errors that can occur while handling a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed validation.
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid, or expired credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// The caller may not touch this resource.
    #[error("{0}")]
    Forbidden(String),

    /// The resource does not exist (or is not visible to the caller).
    #[error("{0}")]
    NotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(DatabaseError),

    /// Domain engine error.
    #[error("{0}")]
    Reflection(ReflectionError),

    /// The model backend failed on a path with no fallback.
    #[error("Model error: {0}")]
    Model(#[from] InsightError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} not found: {}", entity, id))
            }
            DatabaseError::AlreadyExists { entity, id } => {
                ApiError::Validation(format!("{} already exists: {}", entity, id))
            }
            other => ApiError::Database(other),
        }
    }
}

impl From<ReflectionError> for ApiError {
    fn from(err: ReflectionError) -> Self {
        match err {
            ReflectionError::GoalNotFound { id } => {
                ApiError::NotFound(format!("Goal node not found: {}", id))
            }
            ReflectionError::Database(db) => ApiError::from(db),
            ReflectionError::InvalidTree(msg) => ApiError::Validation(msg),
            other => ApiError::Reflection(other),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            // Details go to the log, not the client.
            ApiError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            ApiError::Reflection(err) => {
                tracing::error!("Domain error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            ApiError::Model(err) => {
                tracing::error!("Model error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Model backend unavailable".to_string())
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for request handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
