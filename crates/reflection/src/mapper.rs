//! Journal-to-goal mapping.
//!
//! The model acts as an opaque classifier; all policy is local. The one
//! contract that matters: a failed or low-confidence classification never
//! attaches an entry to a wrong goal. Every failure mode — transport
//! error, malformed JSON, unknown id, sub-threshold confidence — comes
//! back as "no match" so the entry saves unlinked and the user can link
//! it by hand later.

use insight_core::{ChatMessage, InsightModel};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::llm_json;
use crate::tree::{FlatGoal, GoalKind};

/// Minimum confidence at which a model verdict is accepted.
pub const CONFIDENCE_THRESHOLD: f32 = 0.3;

/// Outcome of a mapping attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingDecision {
    /// Accepted node id, if any.
    pub goal_id: Option<String>,
    /// Depth tag of the accepted node.
    pub goal_kind: Option<GoalKind>,
    /// Confidence reported by the model, clamped to [0, 1]. Zero on
    /// failure.
    pub confidence: f32,
}

impl MappingDecision {
    fn no_match() -> Self {
        Self {
            goal_id: None,
            goal_kind: None,
            confidence: 0.0,
        }
    }
}

/// The JSON verdict the model is asked to produce.
#[derive(Debug, Deserialize)]
struct Verdict {
    goal_id: Option<String>,
    confidence: Option<f32>,
    #[allow(dead_code)]
    reason: Option<String>,
}

/// Decide which goal, if any, a piece of journal text relates to.
pub async fn analyze_goal_mapping(
    model: &dyn InsightModel,
    goals: &[FlatGoal],
    text: &str,
) -> MappingDecision {
    if goals.is_empty() || text.trim().is_empty() {
        return MappingDecision::no_match();
    }

    let messages = build_messages(goals, text);

    let reply = match model.complete(&messages).await {
        Ok(reply) => reply,
        Err(err) => {
            warn!("goal mapping call failed, leaving entry unlinked: {}", err);
            return MappingDecision::no_match();
        }
    };

    match parse_verdict(&reply, goals) {
        Some(decision) => decision,
        None => {
            warn!("goal mapping verdict unusable, leaving entry unlinked");
            MappingDecision::no_match()
        }
    }
}

fn build_messages(goals: &[FlatGoal], text: &str) -> Vec<ChatMessage> {
    let mut context = String::from("Goals:\n");
    for goal in goals {
        context.push_str(&format!("- id={} [{}] {}", goal.id, goal.kind.as_str(), goal.text));
        if !goal.description.is_empty() {
            context.push_str(&format!(" — {}", goal.description));
        }
        context.push('\n');
    }

    vec![
        ChatMessage::system(
            "You relate a journal entry to the single most relevant goal from a list. \
             Reply with only a JSON object: {\"goal_id\": \"<id or null>\", \
             \"confidence\": <0.0-1.0>, \"reason\": \"<short>\"}. \
             Use null and confidence 0 when nothing fits.",
        ),
        ChatMessage::user(format!("{}\nJournal entry:\n{}", context, text)),
    ]
}

/// Parse and validate a verdict. `None` means unusable.
fn parse_verdict(reply: &str, goals: &[FlatGoal]) -> Option<MappingDecision> {
    let json = llm_json::extract_object(reply)?;
    let verdict: Verdict = serde_json::from_str(json).ok()?;

    let confidence = verdict.confidence.unwrap_or(0.0).clamp(0.0, 1.0);

    let goal_id = match verdict.goal_id {
        Some(id) if !id.is_empty() && id != "null" => id,
        // An explicit "nothing fits" is a valid verdict.
        _ => return Some(MappingDecision::no_match()),
    };

    // Reject ids the model invented.
    let matched = goals.iter().find(|g| g.id == goal_id)?;

    if confidence < CONFIDENCE_THRESHOLD {
        debug!(
            "mapping confidence {} below threshold for {}",
            confidence, goal_id
        );
        return Some(MappingDecision::no_match());
    }

    Some(MappingDecision {
        goal_id: Some(matched.id.clone()),
        goal_kind: Some(matched.kind),
        confidence,
    })
}
