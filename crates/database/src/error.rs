//! Error surface of the persistence layer.

use thiserror::Error;

/// Failures from the persistence layer.
///
/// Several columns hold JSON documents (the goal tree, tag lists, summary
/// metadata) that are decoded lazily by callers; a corrupt row surfaces as
/// [`DatabaseError::Document`] rather than a query failure.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Query or connection failure from the pool.
    #[error("query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Schema migration failure at startup.
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored JSON document column could not be decoded.
    #[error("stored {entity} document is unreadable: {source}")]
    Document {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Lookup matched no row visible to the caller.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Insert would collide with an existing row.
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },
}

impl DatabaseError {
    /// Wrap a decode failure for the named document column.
    pub fn document(entity: &'static str, source: serde_json::Error) -> Self {
        DatabaseError::Document { entity, source }
    }
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
