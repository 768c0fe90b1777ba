//! Top-level router.
//!
//! # Route Structure
//!
//! - `POST /`          - Shorten a `text/plain` URL
//! - `GET  /ping`      - Storage health check
//! - `GET  /{code}`    - Short link redirect
//! - `/api/*`          - JSON API (see [`crate::api::routes`])
//!
//! # Middleware
//!
//! - **Owner cookie** - Issues or verifies the signed `user_id` cookie
//! - **Compression** - gzip responses, gzip request bodies
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{create_handler, ping_handler, redirect_handler};
use crate::api::middleware::{owner, tracing};
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower::Layer;
use tower_http::compression::CompressionLayer;
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds every route with its middleware, without path normalization.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_handler))
        .route("/ping", get(ping_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api::routes::api_routes())
        .layer(middleware::from_fn_with_state(state.clone(), owner::layer))
        .with_state(state)
        .layer(RequestDecompressionLayer::new())
        .layer(CompressionLayer::new())
        .layer(tracing::layer())
}

/// Constructs the application router with trailing slashes trimmed.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
