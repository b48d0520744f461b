//! Mandalog domain engine.
//!
//! Everything between the HTTP layer and storage lives here: the Mandalart
//! goal tree, the journal-to-goal mapper, summary aggregation and caching,
//! progress analytics, chat-to-diary conversion, the emotional journey,
//! and default persona seeding. All model access goes through the
//! [`insight_core::InsightModel`] trait, so every path is testable with
//! the deterministic models from `mock-insight`.

pub mod analytics;
pub mod diary;
pub mod error;
pub mod journey;
mod llm_json;
pub mod mapper;
pub mod mood;
pub mod persona;
pub mod summary;
pub mod time;
pub mod tree;
pub mod wordcloud;

pub use error::{ReflectionError, Result};
pub use mood::Mood;
pub use tree::{FlatGoal, GoalKind, GoalNode};
