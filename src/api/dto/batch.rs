//! DTOs for batch shortening.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::shorten::validate_http_url;

/// One element of the `POST /api/shorten/batch` request array.
#[derive(Debug, Deserialize, Validate)]
pub struct BatchRequestItem {
    #[validate(length(min = 1, message = "correlation_id is required"))]
    pub correlation_id: String,

    #[validate(custom(function = "validate_http_url"))]
    pub original_url: String,
}

/// One element of the response array, in request order.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResponseItem {
    pub correlation_id: String,
    pub short_url: String,
}
