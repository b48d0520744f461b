//! Error types for insight model calls.

use thiserror::Error;

/// Errors that can occur when calling an insight model.
#[derive(Debug, Error)]
pub enum InsightError {
    /// The backend is misconfigured (missing key, bad URL).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request could not reach the backend.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered but the call failed (API error, bad status).
    #[error("completion failed: {0}")]
    CompletionFailed(String),

    /// The backend answered with something that cannot be used.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The call timed out.
    #[error("completion timed out")]
    Timeout,
}
