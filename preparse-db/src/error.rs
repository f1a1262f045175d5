//! Error types for the content store.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored id or datetime could not be read back.
    #[error(transparent)]
    Value(#[from] preparse_types::Error),

    /// The field configuration failed validation.
    #[error(transparent)]
    Config(#[from] preparse_model::ConfigError),

    /// No column exists for the field handle.
    #[error("unknown field column: {0}")]
    UnknownField(String),

    /// A stored value could not be represented as JSON.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The connection mutex was poisoned by a panicking writer.
    #[error("connection lock poisoned")]
    LockPoisoned,
}
