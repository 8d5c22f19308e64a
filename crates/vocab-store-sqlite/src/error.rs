//! Error types for SQLite store operations.

use thiserror::Error;
use vocab_core::{TimestampError, WordId};

/// Errors that can occur during `SqliteStore` operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No row matched the requested word or id.
    #[error("word not found: {0}")]
    NotFound(String),

    /// A row with the same id already exists.
    #[error("word id already exists: {0}")]
    Conflict(WordId),

    /// Stored id is not a valid UUID.
    #[error("invalid word id in storage: {0}")]
    InvalidId(String),

    /// Stored timestamp could not be decoded, or a timestamp could not be encoded.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(#[from] TimestampError),

    /// SQLite error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
