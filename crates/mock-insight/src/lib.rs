//! Deterministic insight model implementations for testing.
//!
//! - [`FixedModel`] - always returns the same reply
//! - [`ScriptedModel`] - returns queued replies in order
//! - [`FailingModel`] - always fails, for exercising fallback paths

mod failing;
mod fixed;
mod scripted;

pub use failing::FailingModel;
pub use fixed::FixedModel;
pub use scripted::ScriptedModel;
