//! Helpers shared across layers.
//!
//! - [`code_generator`] - Random short code candidates
//! - [`url_validator`] - `http`/`https` URL checks
//! - [`db_error`] - PostgreSQL error classification

pub mod code_generator;
pub mod db_error;
pub mod url_validator;
