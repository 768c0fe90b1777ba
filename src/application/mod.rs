//! Application layer services.
//!
//! Services consume the repository traits from [`crate::domain`] and give the
//! HTTP handlers a small API to call.
//!
//! # Available Services
//!
//! - [`services::shortener_service::ShortenerService`] - Generation, lookup, listing, deletion
//! - [`services::auth_service::AuthService`] - Signed owner cookies

pub mod services;
