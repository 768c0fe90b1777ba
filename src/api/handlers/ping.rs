//! Handler for the storage health check.

use axum::{extract::State, http::StatusCode};
use tracing::error;

use crate::state::AppState;

/// Reports whether storage is reachable.
///
/// # Endpoint
///
/// `GET /ping`
///
/// # Response Codes
///
/// - **200 OK**: storage answered
/// - **500 Internal Server Error**: storage check failed
pub async fn ping_handler(State(state): State<AppState>) -> StatusCode {
    match state.shortener.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            error!(error = %e, "storage ping failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
