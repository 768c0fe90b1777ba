//! Core domain entities.
//!
//! - [`UrlRecord`] - A short code mapped to its original URL and owner

pub mod url_record;

pub use url_record::UrlRecord;
