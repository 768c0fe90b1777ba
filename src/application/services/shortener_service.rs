//! Short code generation, lookup, and deletion service.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::domain::delete_worker::{DeleteWorkerConfig, spawn_delete_job};
use crate::domain::entities::UrlRecord;
use crate::domain::errors::{RepositoryError, StorageError};
use crate::domain::repositories::UrlRepository;
use crate::utils::code_generator::generate_code;

/// Candidates tried per URL before giving up.
pub const MAX_ATTEMPTS: usize = 10;

/// Outcomes of the shortening service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The URL was already shortened. `code` is usable by the caller.
    #[error("url already shortened as {code}")]
    Conflict { code: String },

    #[error("short code not found")]
    NotFound,

    #[error("short code has been deleted")]
    Deleted,

    /// Every candidate collided with an existing code.
    #[error("failed to generate a unique short code after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    /// A batch candidate collided with a stored code. The batch is not retried.
    #[error("short code collision while storing batch")]
    BatchCollision,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<RepositoryError> for ServiceError {
    /// Collisions surfacing outside [`ShortenerService::generate`]'s retry
    /// loop can only come from a batch write.
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UrlExists { code } => Self::Conflict { code },
            RepositoryError::CodeCollision => Self::BatchCollision,
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Deleted => Self::Deleted,
            RepositoryError::Storage(e) => Self::Storage(e),
        }
    }
}

/// Orchestrates candidate generation against a [`UrlRepository`].
///
/// Single URLs are retried on collision up to [`MAX_ATTEMPTS`] times. Batches
/// only avoid collisions inside the batch itself and fail as a whole on a
/// storage collision.
pub struct ShortenerService<R: UrlRepository> {
    repository: Arc<R>,
    delete_config: DeleteWorkerConfig,
}

impl<R: UrlRepository + 'static> ShortenerService<R> {
    /// Creates a new service.
    pub fn new(repository: Arc<R>, delete_config: DeleteWorkerConfig) -> Self {
        Self {
            repository,
            delete_config,
        }
    }

    /// Shortens `url` for `owner_id`.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Conflict`] if `url` already has a live record; the
    ///   existing code is carried in the error
    /// - [`ServiceError::GenerationExhausted`] if all [`MAX_ATTEMPTS`]
    ///   candidates collided
    /// - [`ServiceError::Storage`] on backend failure (not retried)
    pub async fn generate(&self, url: &str, owner_id: &str) -> Result<String, ServiceError> {
        for attempt in 1..=MAX_ATTEMPTS {
            let candidate = generate_code();

            match self.repository.add(&candidate, url, owner_id).await {
                Ok(code) => return Ok(code),
                Err(RepositoryError::CodeCollision) => {
                    debug!(attempt, code = %candidate, "short code collision, retrying");
                    metrics::counter!("shortcode_collisions_total").increment(1);
                }
                Err(e) => return Err(e.into()),
            }
        }

        error!(url, attempts = MAX_ATTEMPTS, "short code generation exhausted");
        metrics::counter!("shortcode_generation_exhausted_total").increment(1);

        Err(ServiceError::GenerationExhausted {
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Shortens every URL in `urls` in one storage write.
    ///
    /// Returned codes follow the input order. URLs that already have a live
    /// record get their existing code.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::BatchCollision`] if a candidate matches a stored code;
    ///   nothing is written
    /// - [`ServiceError::GenerationExhausted`] if no candidate distinct from the
    ///   rest of the batch was found
    pub async fn generate_batch(
        &self,
        urls: Vec<String>,
        owner_id: &str,
    ) -> Result<Vec<String>, ServiceError> {
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        let mut used = HashSet::with_capacity(urls.len());
        let mut pairs = Vec::with_capacity(urls.len());

        for url in urls {
            let candidate = (0..MAX_ATTEMPTS)
                .map(|_| generate_code())
                .find(|c| !used.contains(c))
                .ok_or(ServiceError::GenerationExhausted {
                    attempts: MAX_ATTEMPTS,
                })?;

            used.insert(candidate.clone());
            pairs.push((candidate, url));
        }

        match self.repository.add_batch(pairs, owner_id).await {
            Ok(codes) => Ok(codes),
            Err(RepositoryError::CodeCollision) => {
                warn!(owner_id, "batch candidate collided with a stored code");
                metrics::counter!("shortcode_collisions_total").increment(1);
                Err(ServiceError::BatchCollision)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolves a short code to its original URL.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] for unknown codes and
    /// [`ServiceError::Deleted`] for soft-deleted ones.
    pub async fn original_url(&self, short_code: &str) -> Result<String, ServiceError> {
        Ok(self.repository.find(short_code).await?)
    }

    /// Lists every record owned by `owner_id`, deleted ones included.
    pub async fn user_urls(&self, owner_id: &str) -> Result<Vec<UrlRecord>, ServiceError> {
        Ok(self.repository.user_urls(owner_id).await?)
    }

    /// Starts a background job that soft-deletes `short_codes` owned by
    /// `owner_id` and returns immediately.
    ///
    /// See [`spawn_delete_job`] for batching and deadline behavior.
    pub fn delete_urls_async(&self, short_codes: Vec<String>, owner_id: String) -> JoinHandle<()> {
        spawn_delete_job(
            Arc::clone(&self.repository),
            short_codes,
            owner_id,
            self.delete_config,
        )
    }

    /// Checks that storage is reachable.
    pub async fn ping(&self) -> Result<(), ServiceError> {
        Ok(self.repository.ping().await?)
    }
}
