//! HTTP middleware: owner cookies and request tracing.

pub mod owner;
pub mod tracing;

pub use owner::OwnerId;
