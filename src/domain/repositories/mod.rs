//! Repository and storage trait definitions for the domain layer.
//!
//! # Architecture
//!
//! - [`UrlStorage`] - backend contract, implemented in `crate::infrastructure::persistence`
//! - [`UrlRepository`] - allocation contract, implemented by [`crate::domain::allocator::Allocator`]
//! - Mock implementations are auto-generated via `mockall` for testing

pub mod url_repository;
pub mod url_storage;

pub use url_repository::UrlRepository;
pub use url_storage::UrlStorage;

#[cfg(test)]
pub use url_repository::MockUrlRepository;
#[cfg(test)]
pub use url_storage::MockUrlStorage;
