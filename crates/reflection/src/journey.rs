//! Emotional journey and narrative timeline for a goal subtree.

use database::{GoalProgress, JournalEntry};
use insight_core::{ChatMessage, InsightModel};
use serde::Serialize;
use tracing::warn;

use crate::mood::Mood;

/// Timeline events quoted into the narrative prompt.
const NARRATIVE_EVENT_LIMIT: usize = 30;

/// One mood observation on the journey chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodPoint {
    /// Observation date (RFC 3339).
    pub date: String,
    /// Mood name.
    pub mood: String,
    /// Chart score, -2 to 2.
    pub score: i32,
    /// "journal" or "progress".
    pub source: &'static str,
    /// Entry title or progress note, for tooltips.
    pub label: String,
}

/// Merge journal and progress moods into one time-ordered series.
///
/// Rows whose mood does not parse are skipped.
pub fn emotional_journey(entries: &[JournalEntry], progress: &[GoalProgress]) -> Vec<MoodPoint> {
    let mut points: Vec<MoodPoint> = Vec::with_capacity(entries.len() + progress.len());

    for entry in entries {
        if let Some(mood) = Mood::parse(&entry.mood) {
            points.push(MoodPoint {
                date: entry.date.clone(),
                mood: mood.as_str().to_string(),
                score: mood.score(),
                source: "journal",
                label: entry.title.clone(),
            });
        }
    }
    for record in progress {
        if let Some(mood) = Mood::parse(&record.mood) {
            points.push(MoodPoint {
                date: record.date.clone(),
                mood: mood.as_str().to_string(),
                score: mood.score(),
                source: "progress",
                label: record.note.clone().unwrap_or_default(),
            });
        }
    }

    // RFC 3339 strings sort chronologically.
    points.sort_by(|a, b| a.date.cmp(&b.date));
    points
}

/// One dated event on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEvent {
    pub date: String,
    /// "milestone" or "journal".
    pub kind: &'static str,
    pub title: String,
    pub completion_percentage: Option<i64>,
}

/// A dated timeline with a narrative over it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeTimeline {
    pub events: Vec<TimelineEvent>,
    pub narrative: String,
}

/// Build the timeline from milestones and journal titles and narrate it.
///
/// The narrative degrades to templated text on model failure; the events
/// themselves are always returned.
pub async fn narrative_timeline(
    model: &dyn InsightModel,
    goal_text: &str,
    entries: &[JournalEntry],
    progress: &[GoalProgress],
) -> NarrativeTimeline {
    let mut events: Vec<TimelineEvent> = Vec::new();

    for record in progress.iter().filter(|r| r.is_milestone) {
        events.push(TimelineEvent {
            date: record.date.clone(),
            kind: "milestone",
            title: record
                .note
                .clone()
                .unwrap_or_else(|| format!("{}% complete", record.completion_percentage)),
            completion_percentage: Some(record.completion_percentage),
        });
    }
    for entry in entries {
        events.push(TimelineEvent {
            date: entry.date.clone(),
            kind: "journal",
            title: entry.title.clone(),
            completion_percentage: None,
        });
    }
    events.sort_by(|a, b| a.date.cmp(&b.date));

    let narrative = narrate(model, goal_text, &events).await;
    NarrativeTimeline { events, narrative }
}

async fn narrate(model: &dyn InsightModel, goal_text: &str, events: &[TimelineEvent]) -> String {
    if events.is_empty() {
        return format!("Nothing recorded yet for \"{}\".", goal_text);
    }

    let mut listing = String::new();
    for event in events.iter().take(NARRATIVE_EVENT_LIMIT) {
        listing.push_str(&format!("- {} [{}] {}\n", event.date, event.kind, event.title));
    }

    let messages = [
        ChatMessage::system(
            "You narrate the story of someone's work toward a goal from a dated \
             list of milestones and journal titles, in 3-5 encouraging plain \
             sentences. Do not invent events.",
        ),
        ChatMessage::user(format!("Goal: {}\nEvents:\n{}", goal_text, listing)),
    ];

    match model.complete(&messages).await {
        Ok(text) => text,
        Err(err) => {
            warn!("timeline narrative failed, using fallback: {}", err);
            let milestones = events.iter().filter(|e| e.kind == "milestone").count();
            format!(
                "{} events toward \"{}\" between {} and {}, including {} milestones.",
                events.len(),
                goal_text,
                events.first().map(|e| e.date.as_str()).unwrap_or("-"),
                events.last().map(|e| e.date.as_str()).unwrap_or("-"),
                milestones
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_insight::{FailingModel, FixedModel};

    fn entry(id: &str, date: &str, mood: &str, title: &str) -> JournalEntry {
        JournalEntry {
            id: id.to_string(),
            user_id: "u1".to_string(),
            title: title.to_string(),
            content: "content".to_string(),
            mood: mood.to_string(),
            tags: "[]".to_string(),
            date: date.to_string(),
            is_ai_generated: false,
            related_goal_id: Some("g1".to_string()),
            related_goal_kind: None,
            created_at: date.to_string(),
        }
    }

    fn record(id: &str, date: &str, mood: &str, milestone: bool, completion: i64) -> GoalProgress {
        GoalProgress {
            id: id.to_string(),
            user_id: "u1".to_string(),
            goal_id: "g1".to_string(),
            sub_goal_id: None,
            progress_type: "checkin".to_string(),
            mood: mood.to_string(),
            difficulty: 3,
            time_spent_minutes: 30,
            completion_percentage: completion,
            is_milestone: milestone,
            tags: "[]".to_string(),
            note: None,
            date: date.to_string(),
            created_at: date.to_string(),
        }
    }

    #[test]
    fn test_journey_merges_and_orders_both_sources() {
        let entries = [entry("e1", "2026-01-06T00:00:00.000Z", "good", "A day")];
        let progress = [
            record("r1", "2026-01-05T00:00:00.000Z", "bad", false, 10),
            record("r2", "2026-01-07T00:00:00.000Z", "verygood", false, 20),
        ];
        let points = emotional_journey(&entries, &progress);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].source, "progress");
        assert_eq!(points[0].score, -1);
        assert_eq!(points[1].source, "journal");
        assert_eq!(points[1].score, 1);
        assert_eq!(points[2].score, 2);
    }

    #[test]
    fn test_journey_skips_unparseable_moods() {
        let entries = [entry("e1", "2026-01-06T00:00:00.000Z", "ecstatic", "A day")];
        assert!(emotional_journey(&entries, &[]).is_empty());
    }

    #[tokio::test]
    async fn test_timeline_orders_milestones_and_journal_titles() {
        let entries = [entry("e1", "2026-01-06T00:00:00.000Z", "good", "Read chapter 3")];
        let progress = [
            record("r1", "2026-01-05T00:00:00.000Z", "good", true, 25),
            // Not a milestone, excluded.
            record("r2", "2026-01-08T00:00:00.000Z", "good", false, 30),
        ];

        let model = FixedModel::new("A fine story.");
        let timeline = narrative_timeline(&model, "Learn Rust", &entries, &progress).await;
        assert_eq!(timeline.events.len(), 2);
        assert_eq!(timeline.events[0].kind, "milestone");
        assert_eq!(timeline.events[0].completion_percentage, Some(25));
        assert_eq!(timeline.events[1].title, "Read chapter 3");
        assert_eq!(timeline.narrative, "A fine story.");
    }

    #[tokio::test]
    async fn test_timeline_narrative_falls_back_but_keeps_events() {
        let entries = [entry("e1", "2026-01-06T00:00:00.000Z", "good", "Read chapter 3")];
        let model = FailingModel::new();
        let timeline = narrative_timeline(&model, "Learn Rust", &entries, &[]).await;
        assert_eq!(timeline.events.len(), 1);
        assert!(timeline.narrative.contains("Learn Rust"));
    }

    #[tokio::test]
    async fn test_empty_timeline_is_local() {
        let model = FailingModel::new();
        let timeline = narrative_timeline(&model, "Learn Rust", &[], &[]).await;
        assert!(timeline.events.is_empty());
        assert!(timeline.narrative.contains("Nothing recorded yet"));
    }
}
