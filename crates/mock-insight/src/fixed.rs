//! Fixed-reply model - always returns the same text.

use async_trait::async_trait;

use insight_core::{ChatMessage, InsightError, InsightModel};

/// A model that answers every completion with the same text.
///
/// Useful for cache-idempotence tests where the narrative must be
/// byte-identical across regenerations.
#[derive(Debug, Clone)]
pub struct FixedModel {
    reply: String,
}

impl FixedModel {
    /// Create a new FixedModel with the given reply.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl InsightModel for FixedModel {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, InsightError> {
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "FixedModel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_reply() {
        let model = FixedModel::new("always this");
        let reply = model.complete(&[ChatMessage::user("anything")]).await.unwrap();
        assert_eq!(reply, "always this");
        assert_eq!(model.name(), "FixedModel");
        assert!(model.is_ready().await);
    }
}
