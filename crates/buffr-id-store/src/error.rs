//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Identity record not found.
    #[error("identity record not found: {0}")]
    NotFound(String),

    /// A record with this exact identifier string already exists while its
    /// tuple slot is free (a revoked record issued in the same second).
    /// Retryable with a fresh timestamp.
    #[error("identifier already exists: {0}")]
    IdentifierExists(String),

    /// Invalid data in storage (e.g. a stored identifier that no longer
    /// parses, or an unknown status code).
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Attempted status change other than Active -> Revoked.
    #[error("invalid status transition for {identifier}: {from} -> {to}")]
    InvalidTransition {
        identifier: String,
        from: String,
        to: String,
    },

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
