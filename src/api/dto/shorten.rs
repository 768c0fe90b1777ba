//! DTOs for single URL shortening.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::utils::url_validator::validate_url;

/// `validator` adapter for [`validate_url`].
pub fn validate_http_url(url: &str) -> Result<(), ValidationError> {
    validate_url(url).map_err(|e| {
        let mut err = ValidationError::new("url");
        err.message = Some(e.to_string().into());
        err
    })
}

/// Request body of `POST /api/shorten`.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(custom(function = "validate_http_url"))]
    pub url: String,
}

/// Response body of `POST /api/shorten`, for both 201 and 409.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub result: String,
}
