#![allow(dead_code)]

use axum_test::TestServer;
use std::sync::Arc;
use tokio::sync::mpsc;
use url_shorter::application::services::{AuthService, ShortenerService};
use url_shorter::domain::allocator::Allocator;
use url_shorter::domain::audit_event::AuditEvent;
use url_shorter::domain::audit_worker::AuditPublisher;
use url_shorter::domain::delete_worker::DeleteWorkerConfig;
use url_shorter::domain::repositories::UrlStorage;
use url_shorter::infrastructure::persistence::MemoryStorage;
use url_shorter::routes;
use url_shorter::state::AppState;

pub const BASE_URL: &str = "http://localhost:8080";
pub const COOKIE_SECRET: &str = "test-signing-secret";

pub async fn create_test_state_with(
    storage: Arc<dyn UrlStorage>,
) -> (AppState, mpsc::Receiver<AuditEvent>) {
    let (tx, rx) = mpsc::channel(100);

    let allocator = Arc::new(Allocator::new(storage).await.unwrap());
    let shortener = Arc::new(ShortenerService::new(
        allocator,
        DeleteWorkerConfig::default(),
    ));
    let auth_service = Arc::new(AuthService::new(COOKIE_SECRET.to_string()));

    let state = AppState::new(shortener, auth_service, AuditPublisher::new(tx), BASE_URL);

    (state, rx)
}

pub async fn create_test_state() -> (AppState, mpsc::Receiver<AuditEvent>) {
    create_test_state_with(Arc::new(MemoryStorage::new())).await
}

/// Full router over in-memory storage, with cookies persisted between requests.
pub async fn create_test_server() -> (TestServer, AppState, mpsc::Receiver<AuditEvent>) {
    let (state, rx) = create_test_state().await;
    let mut server = TestServer::new(routes::router(state.clone())).unwrap();
    server.save_cookies();

    (server, state, rx)
}

/// Cookie header value for `owner_id`, signed with the test secret.
pub fn owner_cookie(owner_id: &str) -> String {
    let value = AuthService::new(COOKIE_SECRET.to_string()).cookie_value(owner_id);
    format!("user_id={value}")
}

/// Strips the base URL from a short URL.
pub fn code_of(short_url: &str) -> &str {
    short_url
        .strip_prefix(BASE_URL)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap()
}
