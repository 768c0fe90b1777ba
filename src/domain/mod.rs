//! Domain layer: the record model, storage contracts, allocation, and the
//! background workers.
//!
//! # Architecture
//!
//! - [`entities`] - The persisted [`entities::UrlRecord`]
//! - [`repositories`] - [`repositories::UrlStorage`] and [`repositories::UrlRepository`] traits
//! - [`errors`] - Storage and allocation error types
//! - [`allocator`] - The single writer in front of storage
//! - [`delete_worker`] - Detached batched soft-delete jobs
//! - [`audit_event`] / [`audit_worker`] - Fire-and-forget audit stream
//!
//! # Delete Flow
//!
//! 1. `DELETE /api/user/urls` hands the codes to the shortening service
//! 2. [`delete_worker::spawn_delete_job`] starts a detached task and the handler returns 202
//! 3. The task calls [`repositories::UrlRepository::delete_batch`] once per batch

pub mod allocator;
pub mod audit_event;
pub mod audit_worker;
pub mod delete_worker;
pub mod entities;
pub mod errors;
pub mod repositories;
