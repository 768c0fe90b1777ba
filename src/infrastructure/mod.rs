//! Infrastructure layer: storage backends and audit observers.
//!
//! - [`persistence`] - Implementations of [`crate::domain::repositories::UrlStorage`]
//! - [`audit`] - Sinks for [`crate::domain::audit_event::AuditEvent`]s

pub mod audit;
pub mod persistence;
