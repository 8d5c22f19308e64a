//! Error kinds surfaced to the command-line front end.

use thiserror::Error;
use vocab_core::WordId;
use vocab_store_sqlite::StoreError;

/// Errors returned by [`WordService`](crate::service::WordService) operations.
#[derive(Debug, Error)]
pub enum WordError {
    /// No entry matched the given word or id.
    #[error("word not found: {0}")]
    NotFound(String),
    /// An entry with the same id already exists.
    #[error("word id {0} already exists")]
    Conflict(WordId),
    /// Caller-supplied input was rejected before reaching the store.
    #[error("invalid input: {0}")]
    Validation(String),
    /// Backing store or file system failure.
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<StoreError> for WordError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => Self::NotFound(key),
            StoreError::Conflict(id) => Self::Conflict(id),
            other => Self::Storage(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_maps_to_not_found() {
        let err = WordError::from(StoreError::NotFound("absent".into()));
        assert!(matches!(err, WordError::NotFound(ref key) if key == "absent"));
        assert_eq!(err.to_string(), "word not found: absent");
    }

    #[test]
    fn store_conflict_maps_to_conflict() {
        let id = WordId::new();
        let err = WordError::from(StoreError::Conflict(id));
        assert!(matches!(err, WordError::Conflict(found) if found == id));
    }

    #[test]
    fn other_store_failures_map_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = WordError::from(StoreError::Io(io));
        assert!(matches!(err, WordError::Storage(_)));
        assert!(err.to_string().contains("read-only"));
    }
}
