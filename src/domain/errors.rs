//! Error types for the storage and allocation layers.
//!
//! Storage backends report raw outcomes as [`StorageError`]. The allocator
//! ([`crate::domain::allocator::Allocator`]) folds them into
//! [`RepositoryError`], which is what the shortening service branches on.

/// Errors produced by a [`crate::domain::repositories::UrlStorage`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A record with this short code already exists (live or deleted).
    #[error("short code already exists")]
    DuplicateCode,

    /// A live record for this original URL already exists.
    #[error("original URL already exists")]
    DuplicateUrl,

    /// The short code exists but has been soft-deleted.
    #[error("url has been deleted")]
    Deleted,

    /// File system failure in the file backend.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The file backend could not encode or decode its JSON document.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Relational backend failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Typed allocation outcomes returned by a
/// [`crate::domain::repositories::UrlRepository`].
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The candidate code is already taken. Retry with a fresh candidate.
    #[error("short code collision")]
    CodeCollision,

    /// The URL already has a live record; `code` is its short code.
    #[error("original URL already shortened as {code}")]
    UrlExists { code: String },

    /// No record has this short code.
    #[error("short code not found")]
    NotFound,

    /// The record exists but was soft-deleted.
    #[error("url has been deleted")]
    Deleted,

    /// Any other backend failure, passed through unchanged.
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for RepositoryError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DuplicateCode => Self::CodeCollision,
            StorageError::Deleted => Self::Deleted,
            other => Self::Storage(other),
        }
    }
}
