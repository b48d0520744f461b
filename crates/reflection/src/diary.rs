//! Persona chat replies and chat-to-diary conversion.
//!
//! Chat replies go through the model directly and surface failures to the
//! caller. Diary conversion is an enrichment path: any model failure falls
//! back to a locally templated draft built from the user's own messages,
//! so the conversion endpoint always produces an entry.

use database::models::ChatMessage as TranscriptRow;
use insight_core::{ChatMessage, InsightError, InsightModel};
use serde::Deserialize;
use tracing::warn;

use crate::llm_json;
use crate::mood::Mood;
use crate::time;

/// Transcript messages included in a conversion or reply prompt.
const MAX_TRANSCRIPT_MESSAGES: usize = 40;

/// A journal entry drafted from a chat transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct DiaryDraft {
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub tags: Vec<String>,
}

/// What the model is asked to return for a conversion.
#[derive(Debug, Deserialize)]
struct DraftPayload {
    title: Option<String>,
    content: Option<String>,
    mood: Option<String>,
    tags: Option<Vec<String>>,
}

fn to_chat_messages(transcript: &[TranscriptRow]) -> Vec<ChatMessage> {
    transcript
        .iter()
        .rev()
        .take(MAX_TRANSCRIPT_MESSAGES)
        .rev()
        .map(|row| ChatMessage {
            role: row.role.clone(),
            content: row.content.clone(),
        })
        .collect()
}

/// Answer the latest user message in a session as the given persona.
///
/// The transcript must already contain the newest user message. Failures
/// propagate; chat has no meaningful fallback text.
pub async fn persona_reply(
    model: &dyn InsightModel,
    system_prompt: &str,
    transcript: &[TranscriptRow],
) -> Result<String, InsightError> {
    let mut messages = vec![ChatMessage::system(system_prompt)];
    messages.extend(to_chat_messages(transcript));
    model.complete(&messages).await
}

/// Convert a chat transcript into a diary draft.
///
/// `date` is the entry date used in the fallback title. Never fails: a
/// model error or unusable reply yields the templated fallback.
pub async fn convert_transcript(
    model: &dyn InsightModel,
    transcript: &[TranscriptRow],
    date: &str,
) -> DiaryDraft {
    if transcript.iter().all(|row| row.role != "user") {
        return fallback_draft(transcript, date);
    }

    let mut listing = String::new();
    for message in to_chat_messages(transcript) {
        listing.push_str(&format!("{}: {}\n", message.role, message.content));
    }

    let messages = [
        ChatMessage::system(
            "You turn a chat conversation into a first-person diary entry. Reply \
             with only a JSON object: {\"title\": \"<short title>\", \"content\": \
             \"<the entry>\", \"mood\": \"<verygood|good|neutral|bad|verybad>\", \
             \"tags\": [\"<tag>\", ...]}. Write the content from the user's \
             perspective, keeping their own words and feelings.",
        ),
        ChatMessage::user(format!("Conversation:\n{}", listing)),
    ];

    let reply = match model.complete(&messages).await {
        Ok(reply) => reply,
        Err(err) => {
            warn!("diary conversion call failed, using fallback: {}", err);
            return fallback_draft(transcript, date);
        }
    };

    match parse_draft(&reply) {
        Some(draft) => draft,
        None => {
            warn!("diary conversion reply unusable, using fallback");
            fallback_draft(transcript, date)
        }
    }
}

/// Parse a conversion reply. `None` means unusable.
fn parse_draft(reply: &str) -> Option<DiaryDraft> {
    let json = llm_json::extract_object(reply)?;
    let payload: DraftPayload = serde_json::from_str(json).ok()?;

    let content = payload.content?.trim().to_string();
    if content.is_empty() {
        return None;
    }

    Some(DiaryDraft {
        title: payload
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Diary entry".to_string()),
        content,
        mood: payload
            .mood
            .as_deref()
            .and_then(Mood::parse)
            .unwrap_or(Mood::Neutral),
        tags: payload.tags.unwrap_or_default(),
    })
}

/// The entry built when the model cannot be used: the user's own messages,
/// a dated title, and a neutral mood.
fn fallback_draft(transcript: &[TranscriptRow], date: &str) -> DiaryDraft {
    let content: Vec<&str> = transcript
        .iter()
        .filter(|row| row.role == "user")
        .map(|row| row.content.as_str())
        .collect();

    let day = time::parse_date(date)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| date.to_string());

    DiaryDraft {
        title: format!("Diary for {}", day),
        content: content.join("\n\n"),
        mood: Mood::Neutral,
        tags: Vec::new(),
    }
}
