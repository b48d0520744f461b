//! Error types for domain operations.

use thiserror::Error;

/// Errors that can occur in the domain engine.
#[derive(Debug, Error)]
pub enum ReflectionError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] database::DatabaseError),

    /// Stored JSON could not be read or written.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No node with this id exists in the caller's tree.
    #[error("goal node not found: {id}")]
    GoalNotFound { id: String },

    /// A submitted tree violates a structural rule.
    #[error("invalid goal tree: {0}")]
    InvalidTree(String),
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, ReflectionError>;
