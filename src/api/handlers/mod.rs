//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod create;
pub mod ping;
pub mod redirect;
pub mod shorten;
pub mod user_urls;

pub use create::create_handler;
pub use ping::ping_handler;
pub use redirect::redirect_handler;
pub use shorten::{shorten_batch_handler, shorten_handler};
pub use user_urls::{delete_user_urls_handler, user_urls_handler};
