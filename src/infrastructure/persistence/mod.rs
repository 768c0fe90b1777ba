//! Storage backend implementations.
//!
//! Concrete implementations of [`crate::domain::repositories::UrlStorage`].
//!
//! # Backends
//!
//! - [`MemoryStorage`] - in-process, lost on restart
//! - [`FileStorage`] - single JSON document rewritten on each mutation
//! - [`PgStorage`] - PostgreSQL via SQLx

pub mod file_storage;
pub mod memory_storage;
pub mod pg_storage;

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;
pub use pg_storage::PgStorage;
