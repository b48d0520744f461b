//! Goal summary aggregation and caching.
//!
//! A summary is computed over the journal entries of a goal node and its
//! descendants. Cache rows are keyed by (user, goal, type, content hash)
//! with a 7-day TTL: the hash covers the contributing entry set, so a new
//! or re-dated entry forces regeneration instead of serving week-old text,
//! and the TTL bounds how long even an unchanged set keeps its narrative.
//!
//! Rows are inserted, never updated; concurrent misses may both rebuild
//! and both insert, which is duplicate cost rather than a correctness
//! problem. Narratives that had to fall back because the model failed are
//! returned but not persisted, so the next request retries the model.

use std::collections::HashSet;

use database::models::GoalSummary as SummaryRow;
use database::{journal, summary as summary_store, Database, JournalEntry};
use insight_core::{ChatMessage, InsightModel};
use serde::Serialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ReflectionError, Result};
use crate::mood::Mood;
use crate::time;
use crate::tree::{find_node, subtree_ids, GoalNode};
use crate::wordcloud;

/// How long a cached summary stays valid.
pub const SUMMARY_TTL_DAYS: i64 = 7;

/// Characters of entry content quoted into summarization prompts.
const PROMPT_CONTENT_CHARS: usize = 300;

/// The kinds of summary the dashboard requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryType {
    /// Narrative over the node's own and descendant entries.
    Journal,
    /// Entries grouped by the node's immediate children.
    Children,
    /// Word-frequency table only; no model involved.
    Wordcloud,
}

impl SummaryType {
    /// String form used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryType::Journal => "journal",
            SummaryType::Children => "children",
            SummaryType::Wordcloud => "wordcloud",
        }
    }
}

/// A summary, fresh or from cache.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResult {
    /// Node the summary describes.
    pub goal_id: String,
    /// Requested type.
    pub summary_type: SummaryType,
    /// Narrative or rendered text.
    pub summary: String,
    /// Aggregates: wordcloud, mood distribution, date range, children.
    pub metadata: Value,
    /// Entries that contributed.
    pub entry_count: i64,
    /// Whether this came from the cache.
    pub cached: bool,
}

/// Return a valid cached summary or build, persist, and return a new one.
pub async fn get_or_build(
    db: &Database,
    model: &dyn InsightModel,
    user_id: &str,
    tree: &GoalNode,
    goal_id: &str,
    summary_type: SummaryType,
) -> Result<SummaryResult> {
    let node = find_node(tree, goal_id).ok_or_else(|| ReflectionError::GoalNotFound {
        id: goal_id.to_string(),
    })?;
    let ids = subtree_ids(tree, goal_id).unwrap_or_default();

    let entries = journal::list_entries_for_goal_ids(db.pool(), user_id, &ids).await?;
    let hash = content_hash(&entries);
    let now = time::now();

    if let Some(row) =
        summary_store::find_valid_summary(db.pool(), user_id, goal_id, summary_type.as_str(), &hash, &now)
            .await?
    {
        debug!(goal_id, summary_type = summary_type.as_str(), "summary cache hit");
        return Ok(SummaryResult {
            goal_id: goal_id.to_string(),
            summary_type,
            summary: row.summary,
            metadata: serde_json::from_str(&row.metadata).unwrap_or_else(|_| json!({})),
            entry_count: row.entry_count,
            cached: true,
        });
    }

    let mut metadata = base_metadata(&entries);
    let entry_count = entries.len() as i64;

    let (summary_text, model_ok) = match summary_type {
        SummaryType::Wordcloud => (render_wordcloud_text(&metadata), true),
        SummaryType::Journal => narrative_or_fallback(model, node, &entries).await,
        SummaryType::Children => {
            let groups = group_by_child(node, goal_id, &entries);
            metadata["children"] = children_metadata(&groups);
            children_narrative_or_fallback(model, node, &groups).await
        }
    };

    // A fallback produced without the model is served but not cached, so
    // the next request gets another shot at a real narrative.
    if model_ok {
        let row = SummaryRow {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            goal_id: goal_id.to_string(),
            summary_type: summary_type.as_str().to_string(),
            summary: summary_text.clone(),
            metadata: metadata.to_string(),
            entry_count,
            content_hash: hash,
            created_at: now,
            expires_at: Some(time::days_from_now(SUMMARY_TTL_DAYS)),
        };
        summary_store::insert_summary(db.pool(), &row).await?;
    }

    Ok(SummaryResult {
        goal_id: goal_id.to_string(),
        summary_type,
        summary: summary_text,
        metadata,
        entry_count,
        cached: false,
    })
}

/// SHA-256 over the sorted (id, date) pairs of the contributing entries.
fn content_hash(entries: &[JournalEntry]) -> String {
    let mut pairs: Vec<(&str, &str)> = entries
        .iter()
        .map(|e| (e.id.as_str(), e.date.as_str()))
        .collect();
    pairs.sort_unstable();

    let mut hasher = Sha256::new();
    for (id, date) in pairs {
        hasher.update(id.as_bytes());
        hasher.update(b"|");
        hasher.update(date.as_bytes());
        hasher.update(b"\n");
    }
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Wordcloud, mood distribution, and date range for an entry set.
fn base_metadata(entries: &[JournalEntry]) -> Value {
    let words = wordcloud::word_frequencies(entries.iter().map(|e| e.content.as_str()));
    let wordcloud: Vec<Value> = words
        .into_iter()
        .map(|(word, count)| json!({"word": word, "count": count}))
        .collect();

    let mut moods = serde_json::Map::new();
    for mood in Mood::ALL {
        let count = entries.iter().filter(|e| e.mood == mood.as_str()).count();
        if count > 0 {
            moods.insert(mood.as_str().to_string(), json!(count));
        }
    }

    // Entries arrive date-ascending from the store.
    let date_range = match (entries.first(), entries.last()) {
        (Some(first), Some(last)) => json!({"start": first.date, "end": last.date}),
        _ => Value::Null,
    };

    json!({
        "wordcloud": wordcloud,
        "mood_distribution": moods,
        "date_range": date_range,
    })
}

fn render_wordcloud_text(metadata: &Value) -> String {
    let words: Vec<String> = metadata["wordcloud"]
        .as_array()
        .into_iter()
        .flatten()
        .take(10)
        .filter_map(|w| w["word"].as_str().map(str::to_string))
        .collect();

    if words.is_empty() {
        "No journal entries to build a word cloud from yet.".to_string()
    } else {
        format!("Most frequent words: {}.", words.join(", "))
    }
}

fn most_common_mood(entries: &[JournalEntry]) -> Option<Mood> {
    Mood::ALL
        .iter()
        .map(|m| (*m, entries.iter().filter(|e| e.mood == m.as_str()).count()))
        .filter(|(_, count)| *count > 0)
        .max_by_key(|(_, count)| *count)
        .map(|(mood, _)| mood)
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Ask the model for a narrative; degrade to a template on any failure.
///
/// The bool is whether the model succeeded (and the result may be cached).
async fn narrative_or_fallback(
    model: &dyn InsightModel,
    node: &GoalNode,
    entries: &[JournalEntry],
) -> (String, bool) {
    if entries.is_empty() {
        return (
            format!("No journal entries yet for \"{}\".", node.text),
            true,
        );
    }

    let mut listing = String::new();
    for entry in entries {
        listing.push_str(&format!(
            "- {} [{}] {}: {}\n",
            entry.date,
            entry.mood,
            entry.title,
            truncate_chars(&entry.content, PROMPT_CONTENT_CHARS)
        ));
    }

    let messages = [
        ChatMessage::system(
            "You summarize a user's journal entries about one goal in 3-4 warm, \
             concrete sentences. Mention themes and mood shifts. Plain text only.",
        ),
        ChatMessage::user(format!("Goal: {}\nEntries:\n{}", node.text, listing)),
    ];

    match model.complete(&messages).await {
        Ok(text) => (text, true),
        Err(err) => {
            warn!("summary narrative failed, using fallback: {}", err);
            (fallback_narrative(node, entries), false)
        }
    }
}

fn fallback_narrative(node: &GoalNode, entries: &[JournalEntry]) -> String {
    let mood = most_common_mood(entries)
        .map(|m| m.as_str())
        .unwrap_or("neutral");
    let start = entries.first().map(|e| e.date.as_str()).unwrap_or("-");
    let end = entries.last().map(|e| e.date.as_str()).unwrap_or("-");
    format!(
        "{} journal entries about \"{}\" between {} and {}. Most frequent mood: {}.",
        entries.len(),
        node.text,
        start,
        end,
        mood
    )
}

/// One immediate child of the summarized node and its share of entries.
struct ChildGroup<'a> {
    child_id: String,
    child_text: String,
    entries: Vec<&'a JournalEntry>,
}

/// Group entries by the immediate child whose subtree contains them.
///
/// An entry related to `g1-1` lands in `g1`'s group for child `g1-1`,
/// never back at the root; entries related to the node itself go into a
/// group keyed by the node's own id.
fn group_by_child<'a>(
    node: &GoalNode,
    goal_id: &str,
    entries: &'a [JournalEntry],
) -> Vec<ChildGroup<'a>> {
    let mut groups: Vec<(ChildGroup<'a>, HashSet<String>)> = node
        .children()
        .map(|child| {
            let ids: HashSet<String> =
                subtree_ids(child, &child.id).unwrap_or_default().into_iter().collect();
            (
                ChildGroup {
                    child_id: child.id.clone(),
                    child_text: child.text.clone(),
                    entries: Vec::new(),
                },
                ids,
            )
        })
        .collect();

    let mut own = ChildGroup {
        child_id: goal_id.to_string(),
        child_text: node.text.clone(),
        entries: Vec::new(),
    };

    for entry in entries {
        let Some(related) = entry.related_goal_id.as_deref() else {
            continue;
        };
        if related == goal_id {
            own.entries.push(entry);
            continue;
        }
        for (group, ids) in groups.iter_mut() {
            if ids.contains(related) {
                group.entries.push(entry);
                break;
            }
        }
    }

    let mut out: Vec<ChildGroup<'a>> = Vec::new();
    if !own.entries.is_empty() {
        out.push(own);
    }
    out.extend(groups.into_iter().map(|(g, _)| g).filter(|g| !g.entries.is_empty()));
    out
}

fn children_metadata(groups: &[ChildGroup<'_>]) -> Value {
    let children: Vec<Value> = groups
        .iter()
        .map(|g| {
            json!({
                "goal_id": g.child_id,
                "text": g.child_text,
                "entry_count": g.entries.len(),
            })
        })
        .collect();
    Value::Array(children)
}

async fn children_narrative_or_fallback(
    model: &dyn InsightModel,
    node: &GoalNode,
    groups: &[ChildGroup<'_>],
) -> (String, bool) {
    if groups.is_empty() {
        return (
            format!("No journal entries yet under \"{}\".", node.text),
            true,
        );
    }

    let mut listing = String::new();
    for group in groups {
        listing.push_str(&format!(
            "- {} ({} entries)\n",
            group.child_text,
            group.entries.len()
        ));
        for entry in group.entries.iter().take(5) {
            listing.push_str(&format!(
                "    {} [{}] {}\n",
                entry.date, entry.mood, entry.title
            ));
        }
    }

    let messages = [
        ChatMessage::system(
            "You summarize how a user's journaling spreads across the sub-goals of \
             one goal, in 3-4 plain sentences. Note which areas get attention and \
             which are quiet.",
        ),
        ChatMessage::user(format!("Goal: {}\nSub-goals:\n{}", node.text, listing)),
    ];

    match model.complete(&messages).await {
        Ok(text) => (text, true),
        Err(err) => {
            warn!("children narrative failed, using fallback: {}", err);
            let parts: Vec<String> = groups
                .iter()
                .map(|g| format!("{} ({})", g.child_text, g.entries.len()))
                .collect();
            (
                format!(
                    "Journal activity under \"{}\": {}.",
                    node.text,
                    parts.join(", ")
                ),
                false,
            )
        }
    }
}
