//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use insight_core::InsightModel;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Model backend for mapping, summaries, and chat.
    pub model: Arc<dyn InsightModel>,
    /// Secret used to sign and verify JWTs.
    pub jwt_secret: Arc<str>,
    /// Token lifetime in seconds.
    pub token_expiry_secs: u64,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        db: Database,
        model: Arc<dyn InsightModel>,
        jwt_secret: &str,
        token_expiry_secs: u64,
    ) -> Self {
        Self {
            db,
            model,
            jwt_secret: Arc::from(jwt_secret),
            token_expiry_secs,
        }
    }
}
