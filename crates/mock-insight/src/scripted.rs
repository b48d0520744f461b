//! Scripted model - returns queued replies in order.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use insight_core::{ChatMessage, InsightError, InsightModel};

/// A model that pops replies from a queue, one per completion.
///
/// When the queue runs dry the model fails, which doubles as a check that
/// the code under test makes exactly the expected number of calls.
#[derive(Debug)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
}

impl ScriptedModel {
    /// Create a new ScriptedModel from a list of replies.
    pub fn new(replies: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
        }
    }

    /// Number of replies still queued.
    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl InsightModel for ScriptedModel {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, InsightError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| InsightError::CompletionFailed("script exhausted".to_string()))
    }

    fn name(&self) -> &str {
        "ScriptedModel"
    }
}
