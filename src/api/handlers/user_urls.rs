//! Handlers for listing and deleting the caller's links.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::info;

use crate::api::dto::user_urls::UserUrlItem;
use crate::api::middleware::OwnerId;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::is_valid_code;

/// Lists the caller's live links.
///
/// # Endpoint
///
/// `GET /api/user/urls`
///
/// # Response Codes
///
/// - **200 OK**: `[{ "short_url", "original_url" }]`
/// - **204 No Content**: the caller has no live links
pub async fn user_urls_handler(
    State(state): State<AppState>,
    owner: OwnerId,
) -> Result<Response, AppError> {
    let records = state.shortener.user_urls(owner.as_str()).await?;

    let items: Vec<UserUrlItem> = records
        .into_iter()
        .filter(|r| !r.is_deleted)
        .map(|r| UserUrlItem {
            short_url: state.short_url(&r.short_code),
            original_url: r.original_url,
        })
        .collect();

    if items.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    Ok(Json(items).into_response())
}

/// Schedules deletion of the caller's links and returns immediately.
///
/// # Endpoint
///
/// `DELETE /api/user/urls`
///
/// # Request Body
///
/// ```json
/// ["Ab3_-xYz", "Qw8-pL0_"]
/// ```
///
/// # Response Codes
///
/// - **202 Accepted**: deletion runs in the background; codes the caller
///   does not own are ignored
/// - **400 Bad Request**: empty list or malformed codes
pub async fn delete_user_urls_handler(
    State(state): State<AppState>,
    owner: OwnerId,
    Json(codes): Json<Vec<String>>,
) -> Result<StatusCode, AppError> {
    if codes.is_empty() {
        return Err(AppError::bad_request("Empty list of codes", json!({})));
    }

    let invalid: Vec<&String> = codes.iter().filter(|c| !is_valid_code(c)).collect();
    if !invalid.is_empty() {
        return Err(AppError::bad_request(
            "Invalid short codes",
            json!({ "codes": invalid }),
        ));
    }

    info!(owner_id = %owner.as_str(), count = codes.len(), "scheduling delete");
    drop(state.shortener.delete_urls_async(codes, owner.0));

    Ok(StatusCode::ACCEPTED)
}
