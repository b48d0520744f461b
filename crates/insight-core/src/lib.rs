//! Core trait and types for insight model backends.
//!
//! All "AI" behavior in Mandalog — goal-mapping verdicts, summary
//! narratives, persona chat replies, diary conversion — flows through the
//! [`InsightModel`] trait. It defines:
//!
//! - [`InsightModel`] - The trait that all model backends must implement
//! - [`ChatMessage`] - Role-tagged prompt messages
//! - [`InsightError`] - Error types for model calls
//!
//! Callers must treat model output as untrusted free text: any JSON a
//! prompt asks for has to be parsed defensively, and every caller owns a
//! non-AI fallback path for when the call fails or the output is garbage.
//!
//! # Example
//!
//! ```rust
//! use insight_core::{ChatMessage, InsightError, InsightModel};
//! use async_trait::async_trait;
//!
//! struct MyModel;
//!
//! #[async_trait]
//! impl InsightModel for MyModel {
//!     async fn complete(&self, messages: &[ChatMessage]) -> Result<String, InsightError> {
//!         Ok("Hello!".to_string())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "MyModel"
//!     }
//! }
//! ```

mod error;
mod message;
mod trait_def;

pub use error::InsightError;
pub use message::ChatMessage;
pub use trait_def::InsightModel;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
