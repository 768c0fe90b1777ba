mod common;

use axum_test::TestServer;
use serde_json::{Value, json};
use url_shorter::domain::audit_event::AuditAction;
use url_shorter::routes;
use url_shorter::utils::code_generator::is_valid_code;

#[tokio::test]
async fn test_create_plain_text() {
    let (server, _state, _rx) = common::create_test_server().await;

    let response = server.post("/").text("https://example.com/page").await;

    assert_eq!(response.status_code(), 201);
    let short_url = response.text();
    assert!(short_url.starts_with("http://localhost:8080/"));
    assert!(is_valid_code(common::code_of(&short_url)));
}

#[tokio::test]
async fn test_create_trims_body() {
    let (server, state, _rx) = common::create_test_server().await;

    let response = server.post("/").text("  https://example.com/trim\n").await;

    assert_eq!(response.status_code(), 201);
    let short_url = response.text();
    let url = state
        .shortener
        .original_url(common::code_of(&short_url))
        .await
        .unwrap();
    assert_eq!(url, "https://example.com/trim");
}

#[tokio::test]
async fn test_create_existing_url_conflict() {
    let (server, _state, _rx) = common::create_test_server().await;

    let first = server.post("/").text("https://example.com/dup").await;
    assert_eq!(first.status_code(), 201);

    let second = server.post("/").text("https://example.com/dup").await;
    assert_eq!(second.status_code(), 409);
    assert_eq!(second.text(), first.text());
}

#[tokio::test]
async fn test_create_rejects_wrong_content_type() {
    let (server, _state, _rx) = common::create_test_server().await;

    let response = server
        .post("/")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_create_rejects_invalid_url() {
    let (server, _state, _rx) = common::create_test_server().await;

    for body in ["", "not a url", "ftp://example.com/file"] {
        let response = server.post("/").text(body).await;
        assert_eq!(response.status_code(), 400, "body: {body:?}");
    }
}

#[tokio::test]
async fn test_create_publishes_audit_event() {
    let (server, _state, mut rx) = common::create_test_server().await;

    let response = server.post("/").text("https://example.com/audit").await;
    assert_eq!(response.status_code(), 201);

    let event = rx.try_recv().unwrap();
    assert_eq!(event.action, AuditAction::Shorten);
    assert_eq!(event.url, "https://example.com/audit");
    assert!(event.user_id.is_some());
}

#[tokio::test]
async fn test_shorten_json() {
    let (server, _state, _rx) = common::create_test_server().await;

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/json" }))
        .await;

    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    let result = body["result"].as_str().unwrap();
    assert!(is_valid_code(common::code_of(result)));
}

#[tokio::test]
async fn test_shorten_json_conflict_returns_existing() {
    let (server, _state, _rx) = common::create_test_server().await;

    let first: Value = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/again" }))
        .await
        .json();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/again" }))
        .await;

    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert_eq!(body["result"], first["result"]);
}

#[tokio::test]
async fn test_shorten_json_invalid_url() {
    let (server, _state, _rx) = common::create_test_server().await;

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "javascript:alert(1)" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_batch_preserves_input_order() {
    let (server, _state, _rx) = common::create_test_server().await;

    let response = server
        .post("/api/shorten/batch")
        .json(&json!([
            { "correlation_id": "c", "original_url": "https://c.example.com" },
            { "correlation_id": "a", "original_url": "https://a.example.com" },
            { "correlation_id": "b", "original_url": "https://b.example.com" }
        ]))
        .await;

    assert_eq!(response.status_code(), 201);
    let body: Vec<Value> = response.json();
    let ids: Vec<&str> = body
        .iter()
        .map(|item| item["correlation_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["c", "a", "b"]);

    let codes: Vec<&str> = body
        .iter()
        .map(|item| common::code_of(item["short_url"].as_str().unwrap()))
        .collect();
    assert!(codes.iter().all(|c| is_valid_code(c)));
    assert_ne!(codes[0], codes[1]);
    assert_ne!(codes[1], codes[2]);
}

#[tokio::test]
async fn test_batch_reuses_existing_codes() {
    let (server, _state, _rx) = common::create_test_server().await;

    let existing = server.post("/").text("https://known.example.com").await.text();

    let response = server
        .post("/api/shorten/batch")
        .json(&json!([
            { "correlation_id": "1", "original_url": "https://known.example.com" },
            { "correlation_id": "2", "original_url": "https://fresh.example.com" }
        ]))
        .await;

    assert_eq!(response.status_code(), 201);
    let body: Vec<Value> = response.json();
    assert_eq!(body[0]["short_url"], existing.as_str());
    assert_ne!(body[1]["short_url"], existing.as_str());
}

#[tokio::test]
async fn test_batch_empty_is_bad_request() {
    let (server, _state, _rx) = common::create_test_server().await;

    let response = server.post("/api/shorten/batch").json(&json!([])).await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_batch_rejects_empty_correlation_id() {
    let (server, _state, _rx) = common::create_test_server().await;

    let response = server
        .post("/api/shorten/batch")
        .json(&json!([
            { "correlation_id": "", "original_url": "https://example.com" }
        ]))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_batch_invalid_item_writes_nothing() {
    let (server, _state, _rx) = common::create_test_server().await;

    let response = server
        .post("/api/shorten/batch")
        .json(&json!([
            { "correlation_id": "1", "original_url": "https://ok.example.com" },
            { "correlation_id": "2", "original_url": "nope" }
        ]))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["details"]["index"], 1);

    let retry = server.post("/").text("https://ok.example.com").await;
    assert_eq!(retry.status_code(), 201);
}

#[tokio::test]
async fn test_handlers_accept_router_without_cookie_persistence() {
    let (state, _rx) = common::create_test_state().await;
    let server = TestServer::new(routes::router(state)).unwrap();

    let response = server.post("/").text("https://example.com/once").await;

    assert_eq!(response.status_code(), 201);
    let cookie = response.cookie("user_id");
    assert!(cookie.value().contains('.'));
}
