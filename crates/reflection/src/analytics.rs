//! Progress analytics over check-in records.
//!
//! All aggregates are pure functions over a slice of progress rows and are
//! defined for every input size: zero records yield empty-but-valid
//! results, a single record yields a streak of one and no extrapolation.
//! Rows with unparseable dates are skipped rather than failing the whole
//! computation.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use database::GoalProgress;
use serde::Serialize;

use crate::mood::Mood;
use crate::time;

/// Maximum day gap between records that still counts as consecutive.
pub const STREAK_MAX_GAP_DAYS: i64 = 2;

/// Weeks of velocity history considered for the trend direction.
const TREND_WINDOW_WEEKS: usize = 4;

/// Totals and averages for a goal's check-ins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub total_records: usize,
    pub milestone_count: usize,
    pub total_minutes: i64,
    pub average_completion: f64,
    pub average_difficulty: f64,
    pub latest_completion: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

/// One ISO week of check-in activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VelocityBucket {
    /// ISO week label, e.g. "2026-W07".
    pub week: String,
    /// Check-ins recorded that week.
    pub count: usize,
    /// Mean change in completion percentage between consecutive records,
    /// attributed to the week of the later record.
    pub average_completion_delta: f64,
}

/// Mood against the average completion reported alongside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodCorrelation {
    pub mood: String,
    pub count: usize,
    pub average_completion: f64,
}

/// Chained-record streak lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streaks {
    /// Length of the chain ending at the most recent record.
    pub current: usize,
    /// Longest chain anywhere in the history.
    pub longest: usize,
}

/// Check-in count per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub date: String,
    pub count: usize,
}

/// The full analytics payload for a goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub velocity: Vec<VelocityBucket>,
    pub mood_correlation: Vec<MoodCorrelation>,
    pub streaks: Streaks,
    pub heatmap: Vec<HeatmapCell>,
}

/// Rule-of-thumb observations derived from the history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    /// Weekday with the most check-ins.
    pub most_productive_weekday: Option<String>,
    /// Most frequently reported difficulty.
    pub preferred_difficulty: Option<i64>,
    /// "improving", "declining", or "steady" over the last four weeks.
    pub trend: String,
    /// Linear estimate of when completion reaches 100, if the velocity
    /// history supports one.
    pub estimated_completion_date: Option<String>,
}

/// A record with its parsed date, ordered oldest first.
struct Dated<'a> {
    record: &'a GoalProgress,
    date: NaiveDate,
}

fn dated(records: &[GoalProgress]) -> Vec<Dated<'_>> {
    let mut out: Vec<Dated<'_>> = records
        .iter()
        .filter_map(|record| {
            time::parse_date(&record.date).map(|date| Dated { record, date })
        })
        .collect();
    out.sort_by_key(|d| d.date);
    out
}

fn iso_week_label(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Totals and averages over all records.
pub fn progress_summary(records: &[GoalProgress]) -> ProgressSummary {
    let ordered = dated(records);
    let total = ordered.len();
    let sum_completion: i64 = ordered.iter().map(|d| d.record.completion_percentage).sum();
    let sum_difficulty: i64 = ordered.iter().map(|d| d.record.difficulty).sum();

    ProgressSummary {
        total_records: total,
        milestone_count: ordered.iter().filter(|d| d.record.is_milestone).count(),
        total_minutes: ordered.iter().map(|d| d.record.time_spent_minutes).sum(),
        average_completion: if total == 0 {
            0.0
        } else {
            sum_completion as f64 / total as f64
        },
        average_difficulty: if total == 0 {
            0.0
        } else {
            sum_difficulty as f64 / total as f64
        },
        latest_completion: ordered
            .last()
            .map(|d| d.record.completion_percentage)
            .unwrap_or(0),
        first_date: ordered.first().map(|d| d.record.date.clone()),
        last_date: ordered.last().map(|d| d.record.date.clone()),
    }
}

/// Velocity, correlation, streaks, and heatmap in one pass.
pub fn analyze(records: &[GoalProgress]) -> Analytics {
    let ordered = dated(records);
    Analytics {
        velocity: velocity_buckets(&ordered),
        mood_correlation: mood_correlation(&ordered),
        streaks: streaks(&ordered),
        heatmap: heatmap(&ordered),
    }
}

fn velocity_buckets(ordered: &[Dated<'_>]) -> Vec<VelocityBucket> {
    // BTreeMap keys sort "YYYY-Www" labels chronologically.
    let mut weeks: BTreeMap<String, (usize, Vec<f64>)> = BTreeMap::new();

    for (index, d) in ordered.iter().enumerate() {
        let bucket = weeks.entry(iso_week_label(d.date)).or_default();
        bucket.0 += 1;
        if index > 0 {
            let delta = (d.record.completion_percentage
                - ordered[index - 1].record.completion_percentage) as f64;
            bucket.1.push(delta);
        }
    }

    weeks
        .into_iter()
        .map(|(week, (count, deltas))| VelocityBucket {
            week,
            count,
            average_completion_delta: if deltas.is_empty() {
                0.0
            } else {
                deltas.iter().sum::<f64>() / deltas.len() as f64
            },
        })
        .collect()
}

fn mood_correlation(ordered: &[Dated<'_>]) -> Vec<MoodCorrelation> {
    let mut by_mood: HashMap<&str, (usize, i64)> = HashMap::new();
    for d in ordered {
        let slot = by_mood.entry(d.record.mood.as_str()).or_default();
        slot.0 += 1;
        slot.1 += d.record.completion_percentage;
    }

    // Report in scale order so output is stable.
    Mood::ALL
        .iter()
        .filter_map(|mood| {
            by_mood.get(mood.as_str()).map(|(count, sum)| MoodCorrelation {
                mood: mood.as_str().to_string(),
                count: *count,
                average_completion: *sum as f64 / *count as f64,
            })
        })
        .collect()
}

fn streaks(ordered: &[Dated<'_>]) -> Streaks {
    if ordered.is_empty() {
        return Streaks {
            current: 0,
            longest: 0,
        };
    }

    // Distinct days only; several check-ins on one day are one step.
    let mut days: Vec<NaiveDate> = ordered.iter().map(|d| d.date).collect();
    days.dedup();

    let mut longest = 1;
    let mut run = 1;
    for pair in days.windows(2) {
        if (pair[1] - pair[0]).num_days() <= STREAK_MAX_GAP_DAYS {
            run += 1;
        } else {
            run = 1;
        }
        longest = longest.max(run);
    }

    Streaks {
        current: run,
        longest,
    }
}

fn heatmap(ordered: &[Dated<'_>]) -> Vec<HeatmapCell> {
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for d in ordered {
        *days.entry(d.date).or_default() += 1;
    }
    days.into_iter()
        .map(|(date, count)| HeatmapCell {
            date: date.format("%Y-%m-%d").to_string(),
            count,
        })
        .collect()
}

/// Derive insights from the history.
pub fn insights(records: &[GoalProgress]) -> Insights {
    let ordered = dated(records);
    let velocity = velocity_buckets(&ordered);

    let most_productive_weekday = {
        let mut by_weekday: HashMap<Weekday, usize> = HashMap::new();
        for d in &ordered {
            *by_weekday.entry(d.date.weekday()).or_default() += 1;
        }
        by_weekday
            .into_iter()
            .max_by_key(|(weekday, count)| (*count, std::cmp::Reverse(weekday.num_days_from_monday())))
            .map(|(weekday, _)| weekday_name(weekday).to_string())
    };

    let preferred_difficulty = {
        let mut by_difficulty: HashMap<i64, usize> = HashMap::new();
        for d in &ordered {
            *by_difficulty.entry(d.record.difficulty).or_default() += 1;
        }
        by_difficulty
            .into_iter()
            .max_by_key(|(difficulty, count)| (*count, std::cmp::Reverse(*difficulty)))
            .map(|(difficulty, _)| difficulty)
    };

    let recent: Vec<&VelocityBucket> = velocity
        .iter()
        .rev()
        .take(TREND_WINDOW_WEEKS)
        .collect();
    let recent_delta = if recent.is_empty() {
        0.0
    } else {
        recent
            .iter()
            .map(|b| b.average_completion_delta)
            .sum::<f64>()
            / recent.len() as f64
    };
    let trend = if recent_delta > 0.0 {
        "improving"
    } else if recent_delta < 0.0 {
        "declining"
    } else {
        "steady"
    };

    let estimated_completion_date =
        estimate_completion(&ordered, &velocity, recent_delta);

    Insights {
        most_productive_weekday,
        preferred_difficulty,
        trend: trend.to_string(),
        estimated_completion_date,
    }
}

/// Linear extrapolation to 100% completion.
///
/// Needs at least two velocity buckets and a positive recent weekly delta;
/// anything else returns no estimate.
fn estimate_completion(
    ordered: &[Dated<'_>],
    velocity: &[VelocityBucket],
    weekly_delta: f64,
) -> Option<String> {
    if velocity.len() < 2 || weekly_delta <= 0.0 {
        return None;
    }
    let last = ordered.last()?;
    let remaining = (100 - last.record.completion_percentage).max(0) as f64;
    if remaining == 0.0 {
        return Some(last.date.format("%Y-%m-%d").to_string());
    }
    let weeks_needed = (remaining / weekly_delta).ceil() as i64;
    let date = last.date + Duration::weeks(weeks_needed);
    Some(date.format("%Y-%m-%d").to_string())
}
