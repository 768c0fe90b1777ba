//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use serde_json::json;

use crate::application::services::ServiceError;
use crate::domain::audit_event::AuditEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Response Codes
///
/// - **307 Temporary Redirect**: `Location` is the original URL
/// - **410 Gone**: the link was deleted by its owner
/// - **400 Bad Request**: no such code
///
/// Every successful redirect emits a `follow` audit event.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let url = match state.shortener.original_url(&code).await {
        Ok(url) => url,
        Err(ServiceError::NotFound) => {
            return Err(AppError::bad_request(
                "Short link not found",
                json!({ "code": code }),
            ));
        }
        Err(ServiceError::Deleted) => {
            return Err(AppError::gone(
                "Short link has been deleted",
                json!({ "code": code }),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    state.audit.publish(AuditEvent::follow(None, &url));

    Ok(Redirect::temporary(&url))
}
