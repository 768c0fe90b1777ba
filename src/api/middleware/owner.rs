//! Owner identity from the signed `user_id` cookie.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, HeaderValue, header, request::Parts},
    middleware::Next,
    response::Response,
};
use serde_json::json;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::state::AppState;

/// Name of the owner cookie.
pub const COOKIE_NAME: &str = "user_id";

/// The verified owner of the current request.
///
/// Inserted into request extensions by [`layer`]; handlers take it as an
/// extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for OwnerId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<OwnerId>().cloned().ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Owner cookie is missing or invalid" }),
            )
        })
    }
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Resolves the request owner, issuing a new signed cookie when the request
/// carries none or an invalid one.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/api/user/urls", get(user_urls_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), owner::layer));
/// ```
pub async fn layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let verified = cookie_value(req.headers(), COOKIE_NAME)
        .and_then(|value| state.auth_service.verify(value));

    let (owner_id, issued) = match verified {
        Some(owner_id) => (owner_id, None),
        None => {
            let (owner_id, cookie) = state.auth_service.issue();
            debug!(owner_id = %owner_id, "issuing owner cookie");
            (owner_id, Some(cookie))
        }
    };

    req.extensions_mut().insert(OwnerId(owner_id));
    let mut response = next.run(req).await;

    if let Some(value) = issued {
        let cookie = format!("{COOKIE_NAME}={value}; Path=/; HttpOnly");
        match HeaderValue::from_str(&cookie) {
            Ok(header_value) => {
                response
                    .headers_mut()
                    .append(header::SET_COOKIE, header_value);
            }
            Err(e) => warn!(error = %e, "failed to encode owner cookie"),
        }
    }

    response
}
