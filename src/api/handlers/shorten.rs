//! Handlers for the JSON shortening endpoints.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::json;
use validator::Validate;

use crate::api::dto::batch::{BatchRequestItem, BatchResponseItem};
use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::middleware::OwnerId;
use crate::application::services::ServiceError;
use crate::domain::audit_event::AuditEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a single URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com" }
/// ```
///
/// # Response
///
/// ```json
/// { "result": "http://localhost:8080/Ab3_-xYz" }
/// ```
///
/// Returned with **201 Created** for a new link and **409 Conflict** when the
/// URL was already shortened (the existing short URL is returned).
pub async fn shorten_handler(
    State(state): State<AppState>,
    owner: OwnerId,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let (status, code) = match state.shortener.generate(&payload.url, owner.as_str()).await {
        Ok(code) => (StatusCode::CREATED, code),
        Err(ServiceError::Conflict { code }) => (StatusCode::CONFLICT, code),
        Err(e) => return Err(e.into()),
    };

    state
        .audit
        .publish(AuditEvent::shorten(owner.as_str(), &payload.url));

    Ok((
        status,
        Json(ShortenResponse {
            result: state.short_url(&code),
        }),
    ))
}

/// Shortens many URLs in one storage write.
///
/// # Endpoint
///
/// `POST /api/shorten/batch`
///
/// # Request Body
///
/// ```json
/// [
///   { "correlation_id": "1", "original_url": "https://a.com" },
///   { "correlation_id": "2", "original_url": "https://b.com" }
/// ]
/// ```
///
/// # Response
///
/// **201 Created** with one `{ "correlation_id", "short_url" }` per input, in
/// input order. URLs already shortened get their existing short URL.
///
/// # Errors
///
/// - **400 Bad Request**: empty batch, missing `correlation_id`, or invalid URL
/// - **500 Internal Server Error**: a generated code collided with a stored
///   one; nothing was written and the request can be retried
pub async fn shorten_batch_handler(
    State(state): State<AppState>,
    owner: OwnerId,
    Json(items): Json<Vec<BatchRequestItem>>,
) -> Result<(StatusCode, Json<Vec<BatchResponseItem>>), AppError> {
    if items.is_empty() {
        return Err(AppError::bad_request("Empty batch", json!({})));
    }

    for (index, item) in items.iter().enumerate() {
        item.validate().map_err(|e| {
            AppError::bad_request("Validation failed", json!({ "index": index, "errors": e }))
        })?;
    }

    let (correlation_ids, urls): (Vec<String>, Vec<String>) = items
        .into_iter()
        .map(|item| (item.correlation_id, item.original_url))
        .unzip();

    let codes = state
        .shortener
        .generate_batch(urls.clone(), owner.as_str())
        .await?;

    for url in &urls {
        state.audit.publish(AuditEvent::shorten(owner.as_str(), url));
    }

    let response = correlation_ids
        .into_iter()
        .zip(codes)
        .map(|(correlation_id, code)| BatchResponseItem {
            correlation_id,
            short_url: state.short_url(&code),
        })
        .collect();

    Ok((StatusCode::CREATED, Json(response)))
}
