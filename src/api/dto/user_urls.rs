//! DTOs for the per-user URL endpoints.

use serde::{Deserialize, Serialize};

/// One element of `GET /api/user/urls`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserUrlItem {
    pub short_url: String,
    pub original_url: String,
}
