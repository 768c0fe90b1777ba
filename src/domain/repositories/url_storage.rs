//! Storage contract shared by the memory, file, and PostgreSQL backends.

use crate::domain::entities::UrlRecord;
use crate::domain::errors::StorageError;
use async_trait::async_trait;

/// Durable key/value persistence for [`UrlRecord`]s.
///
/// Callers hold an `Arc<dyn UrlStorage>` and never depend on a concrete
/// backend. Only the allocator writes through this trait.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryStorage`] - in-process maps
/// - [`crate::infrastructure::persistence::FileStorage`] - JSON file, rewritten on every mutation
/// - [`crate::infrastructure::persistence::PgStorage`] - PostgreSQL via SQLx
///
/// # Consistency
///
/// A reader must never observe a half-applied write: a record is either
/// fully visible through every lookup or not visible at all.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlStorage: Send + Sync {
    /// Returns every stored record, deleted ones included.
    async fn load(&self) -> Result<Vec<UrlRecord>, StorageError>;

    /// Persists a single record.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DuplicateCode`] if the short code exists,
    /// [`StorageError::DuplicateUrl`] if a live record has the same URL.
    async fn append(&self, record: UrlRecord) -> Result<(), StorageError>;

    /// Persists several records atomically: all of them or none.
    async fn append_batch(&self, records: Vec<UrlRecord>) -> Result<(), StorageError>;

    /// Returns the short code of the live record for `original_url`, if any.
    async fn find_by_original_url(&self, original_url: &str)
    -> Result<Option<String>, StorageError>;

    /// Returns the original URL for `short_code`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Deleted`] if the record is soft-deleted.
    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<String>, StorageError>;

    /// Returns all records owned by `owner_id`, deleted ones included.
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<UrlRecord>, StorageError>;

    /// Marks every record in `short_codes` owned by `owner_id` as deleted.
    ///
    /// Codes that are unknown or owned by someone else are skipped.
    async fn delete_batch(&self, short_codes: &[String], owner_id: &str)
    -> Result<(), StorageError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), StorageError>;
}
