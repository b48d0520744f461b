//! OpenAI chat-completions backend for Mandalog.
//!
//! Implements [`insight_core::InsightModel`] against the OpenAI
//! chat-completions API (or any compatible endpoint via `OPENAI_API_URL`).

mod api_types;
mod config;
mod model;

pub use config::{OpenAiConfig, OpenAiConfigBuilder};
pub use model::OpenAiModel;
