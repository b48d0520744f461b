//! Failing model - every completion errors.

use async_trait::async_trait;

use insight_core::{ChatMessage, InsightError, InsightModel};

/// A model whose every call fails with a network error.
///
/// Exercises the degrade-to-fallback contracts: goal mapping must return
/// no match, summaries must fall back to templated text, and the
/// surrounding save must still succeed.
#[derive(Debug, Clone, Default)]
pub struct FailingModel;

impl FailingModel {
    /// Create a new FailingModel.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InsightModel for FailingModel {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, InsightError> {
        Err(InsightError::Network("mock failure".to_string()))
    }

    fn name(&self) -> &str {
        "FailingModel"
    }

    async fn is_ready(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_fails() {
        let model = FailingModel::new();
        let result = model.complete(&[ChatMessage::user("hi")]).await;
        assert!(matches!(result, Err(InsightError::Network(_))));
        assert!(!model.is_ready().await);
    }
}
