//! HTTP layer: request/response types, handlers, middleware, and routes.
//!
//! # Modules
//!
//! - [`dto`] - Request/response bodies of the JSON API
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Owner cookies and request tracing
//! - [`routes`] - API route composition

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
