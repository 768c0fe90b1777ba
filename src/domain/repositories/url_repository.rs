//! Allocation contract consumed by the shortening service.

use crate::domain::entities::UrlRecord;
use crate::domain::errors::RepositoryError;
use async_trait::async_trait;

/// The single writer in front of a [`super::UrlStorage`].
///
/// Enforces short-code uniqueness and live-URL uniqueness, and turns storage
/// ambiguity into [`RepositoryError`] variants the service can branch on.
///
/// # Implementations
///
/// - [`crate::domain::allocator::Allocator`] - lock-serialized allocator over any storage
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Stores `url` under `short_code` for `owner_id`.
    ///
    /// # Errors
    ///
    /// - [`RepositoryError::UrlExists`] if `url` already has a live record;
    ///   the existing code is carried in the error
    /// - [`RepositoryError::CodeCollision`] if `short_code` is taken
    /// - [`RepositoryError::Storage`] on any other backend failure
    async fn add(
        &self,
        short_code: &str,
        url: &str,
        owner_id: &str,
    ) -> Result<String, RepositoryError>;

    /// Resolves a short code.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::NotFound`] and [`RepositoryError::Deleted`] are
    /// distinct outcomes.
    async fn find(&self, short_code: &str) -> Result<String, RepositoryError>;

    /// Stores many `(candidate_code, url)` pairs in one atomic write.
    ///
    /// Pairs whose URL is already live get the existing code. The returned
    /// codes follow the input order.
    async fn add_batch(
        &self,
        pairs: Vec<(String, String)>,
        owner_id: &str,
    ) -> Result<Vec<String>, RepositoryError>;

    /// Lists every record owned by `owner_id`.
    async fn user_urls(&self, owner_id: &str) -> Result<Vec<UrlRecord>, RepositoryError>;

    /// Soft-deletes the codes in `short_codes` that belong to `owner_id`.
    async fn delete_batch(
        &self,
        short_codes: &[String],
        owner_id: &str,
    ) -> Result<(), RepositoryError>;

    /// Checks that the underlying storage is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}
