//! Database row models.
//!
//! Rows are deliberately stringly typed: enums (mood, summary type, progress
//! type) and timestamps are stored as TEXT and interpreted by the domain
//! layer. Timestamps are RFC 3339 so lexicographic order is chronological.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// UUID string.
    pub id: String,
    /// Login email (unique).
    pub email: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// The per-user Mandalart document.
///
/// The `tree` column holds the root goal node serialized as JSON. The row id
/// is a storage detail and never crosses the API boundary; tree-node
/// references always use the node ids inside the JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GoalDocument {
    /// Row UUID.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Root goal node as JSON.
    pub tree: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last save timestamp.
    pub updated_at: String,
}

/// A journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    /// Row UUID.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Entry title.
    pub title: String,
    /// Entry body.
    pub content: String,
    /// Mood name (verygood | good | neutral | bad | verybad).
    pub mood: String,
    /// Tags as a JSON array of strings.
    pub tags: String,
    /// Entry date (RFC 3339).
    pub date: String,
    /// Whether the entry was generated from a chat transcript.
    pub is_ai_generated: bool,
    /// Mandalart node id this entry relates to, if any.
    pub related_goal_id: Option<String>,
    /// Node kind of the related goal (main | sub | subsub).
    pub related_goal_kind: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// A cached (or permanent) goal summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GoalSummary {
    /// Row UUID.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Mandalart node id the summary describes.
    pub goal_id: String,
    /// Summary type (journal | children | wordcloud).
    pub summary_type: String,
    /// Narrative or rendered summary text.
    pub summary: String,
    /// Computed aggregates as JSON (wordcloud, mood distribution, date range).
    pub metadata: String,
    /// Number of journal entries that contributed.
    pub entry_count: i64,
    /// SHA-256 over the contributing entry set.
    pub content_hash: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Expiry timestamp; NULL means permanent.
    pub expires_at: Option<String>,
}

/// An append-only progress check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GoalProgress {
    /// Row UUID.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Mandalart node id the check-in targets.
    pub goal_id: String,
    /// Optional more specific node under `goal_id`.
    pub sub_goal_id: Option<String>,
    /// Progress type (checkin | milestone | reflection).
    pub progress_type: String,
    /// Mood at check-in time.
    pub mood: String,
    /// Perceived difficulty, 1-5.
    pub difficulty: i64,
    /// Minutes spent.
    pub time_spent_minutes: i64,
    /// Self-reported completion, 0-100.
    pub completion_percentage: i64,
    /// Whether the user marked this as a milestone.
    pub is_milestone: bool,
    /// Tags as a JSON array of strings.
    pub tags: String,
    /// Free-text note.
    pub note: Option<String>,
    /// Check-in date (RFC 3339).
    pub date: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// A chat persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Persona {
    /// Row UUID.
    pub id: String,
    /// Unique machine name.
    pub name: String,
    /// Human-facing name.
    pub display_name: String,
    /// System prompt sent ahead of every chat exchange.
    pub system_prompt: String,
    /// Category (coach | friend | mentor | analyst).
    pub category: String,
    /// Whether this is a seeded default persona.
    pub is_default: bool,
    /// Owning user; NULL for defaults.
    pub user_id: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// A chat session with a persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ChatSession {
    /// Row UUID.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Persona the session talks to.
    pub persona_id: String,
    /// Session title.
    pub title: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// A single message within a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    /// Row UUID.
    pub id: String,
    /// Parent session.
    pub session_id: String,
    /// "user" or "assistant".
    pub role: String,
    /// Message text.
    pub content: String,
    /// Creation timestamp.
    pub created_at: String,
}
