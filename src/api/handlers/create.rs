//! Handler for plain-text shortening at the root path.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::middleware::OwnerId;
use crate::application::services::ServiceError;
use crate::domain::audit_event::AuditEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_validator::validate_url;

/// Shortens a URL sent as a `text/plain` body.
///
/// # Endpoint
///
/// `POST /`
///
/// # Response Codes
///
/// - **201 Created**: body is the new short URL
/// - **409 Conflict**: URL already shortened; body is the existing short URL
/// - **400 Bad Request**: wrong content type or invalid URL
pub async fn create_handler(
    State(state): State<AppState>,
    owner: OwnerId,
    headers: HeaderMap,
    body: String,
) -> Result<Response, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !content_type.starts_with("text/plain") {
        return Err(AppError::bad_request(
            "Unsupported media type",
            json!({ "expected": "text/plain", "got": content_type }),
        ));
    }

    let url = body.trim();
    validate_url(url).map_err(|e| {
        AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
    })?;

    let (status, code) = match state.shortener.generate(url, owner.as_str()).await {
        Ok(code) => (StatusCode::CREATED, code),
        Err(ServiceError::Conflict { code }) => (StatusCode::CONFLICT, code),
        Err(e) => return Err(e.into()),
    };

    state.audit.publish(AuditEvent::shorten(owner.as_str(), url));

    Ok((status, state.short_url(&code)).into_response())
}
