//! The InsightModel trait definition.

use async_trait::async_trait;

use crate::error::InsightError;
use crate::message::ChatMessage;

/// A trait for chat-completion backends.
///
/// Implementations range from deterministic test doubles to the OpenAI
/// API. This trait is object-safe and is used as `Arc<dyn InsightModel>`
/// throughout the server.
#[async_trait]
pub trait InsightModel: Send + Sync {
    /// Run a chat completion over the given messages and return the
    /// assistant's text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, InsightError>;

    /// Get a human-readable name for this model backend.
    fn name(&self) -> &str;

    /// Check if the backend is ready to serve completions.
    ///
    /// Default implementation always returns true.
    async fn is_ready(&self) -> bool {
        true
    }
}
