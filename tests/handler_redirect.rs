mod common;

use std::time::Duration;
use url_shorter::application::services::ServiceError;
use url_shorter::domain::audit_event::AuditAction;

#[tokio::test]
async fn test_redirect_success() {
    let (server, _state, _rx) = common::create_test_server().await;

    let short_url = server
        .post("/")
        .text("https://example.com/target")
        .await
        .text();

    let response = server.get(&format!("/{}", common::code_of(&short_url))).await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_unknown_code() {
    let (server, _state, _rx) = common::create_test_server().await;

    let response = server.get("/Zz9_Zz9-").await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_redirect_deleted_code_is_gone() {
    let (server, state, _rx) = common::create_test_server().await;

    let short_url = server
        .post("/")
        .add_header("Cookie", common::owner_cookie("owner-1"))
        .text("https://example.com/gone")
        .await
        .text();
    let code = common::code_of(&short_url).to_string();

    state
        .shortener
        .delete_urls_async(vec![code.clone()], "owner-1".to_string())
        .await
        .unwrap();

    let response = server.get(&format!("/{code}")).await;

    assert_eq!(response.status_code(), 410);
}

#[tokio::test]
async fn test_redirect_publishes_follow_event() {
    let (server, _state, mut rx) = common::create_test_server().await;

    let short_url = server
        .post("/")
        .text("https://example.com/followed")
        .await
        .text();
    let shorten = rx.try_recv().unwrap();
    assert_eq!(shorten.action, AuditAction::Shorten);

    server.get(&format!("/{}", common::code_of(&short_url))).await;

    let follow = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(follow.action, AuditAction::Follow);
    assert_eq!(follow.url, "https://example.com/followed");
    assert!(follow.user_id.is_none());
}

#[tokio::test]
async fn test_redirect_after_delete_by_other_owner_still_works() {
    let (server, state, _rx) = common::create_test_server().await;

    let short_url = server
        .post("/")
        .text("https://example.com/kept")
        .await
        .text();
    let code = common::code_of(&short_url).to_string();

    state
        .shortener
        .delete_urls_async(vec![code.clone()], "someone-else".to_string())
        .await
        .unwrap();

    let url = state.shortener.original_url(&code).await;
    assert!(!matches!(url, Err(ServiceError::Deleted)));

    let response = server.get(&format!("/{code}")).await;
    assert_eq!(response.status_code(), 307);
}
