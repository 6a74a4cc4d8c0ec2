//! Storage error types.

use thiserror::Error;

/// Errors returned by storage backends.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record with the given id exists.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind (`"question"`, `"event"`, `"speaker"`).
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },
    /// A record with the given id or token already exists.
    #[error("{entity} already exists: {id}")]
    Conflict {
        /// Entity kind.
        entity: &'static str,
        /// Conflicting identifier.
        id: String,
    },
    /// The backend cannot serve requests right now.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { entity, id: id.into() }
    }

    /// Whether this is a [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
