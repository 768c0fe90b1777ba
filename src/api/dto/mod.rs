//! Request and response bodies of the JSON API.

pub mod batch;
pub mod shorten;
pub mod user_urls;
