//! Mood scale shared by journal entries and progress check-ins.

use serde::{Deserialize, Serialize};

/// The five-step mood scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[serde(rename = "verygood")]
    VeryGood,
    Good,
    Neutral,
    Bad,
    #[serde(rename = "verybad")]
    VeryBad,
}

impl Mood {
    /// All moods, best to worst.
    pub const ALL: [Mood; 5] = [
        Mood::VeryGood,
        Mood::Good,
        Mood::Neutral,
        Mood::Bad,
        Mood::VeryBad,
    ];

    /// Parse a stored mood name.
    pub fn parse(value: &str) -> Option<Mood> {
        match value {
            "verygood" => Some(Mood::VeryGood),
            "good" => Some(Mood::Good),
            "neutral" => Some(Mood::Neutral),
            "bad" => Some(Mood::Bad),
            "verybad" => Some(Mood::VeryBad),
            _ => None,
        }
    }

    /// String form used in storage and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::VeryGood => "verygood",
            Mood::Good => "good",
            Mood::Neutral => "neutral",
            Mood::Bad => "bad",
            Mood::VeryBad => "verybad",
        }
    }

    /// Numeric score for charting, -2 (very bad) to 2 (very good).
    pub fn score(&self) -> i32 {
        match self {
            Mood::VeryGood => 2,
            Mood::Good => 1,
            Mood::Neutral => 0,
            Mood::Bad => -1,
            Mood::VeryBad => -2,
        }
    }
}
