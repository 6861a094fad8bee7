mod common;

use axum::http::{Method, StatusCode};
use link_shortener::application::services::ClientInfo;
use link_shortener::domain::pagination::PageRequest;
use link_shortener::state::{AppState, Repositories};
use serde_json::Value;

#[tokio::test]
async fn test_redirect_found() {
    let server = common::create_test_server(common::create_test_state());
    let token = common::register_and_login(&server, "alice", "alice@example.com").await;
    let created = common::shorten(&server, &token, "https://example.com/target?x=1").await;
    let code = created["short_code"].as_str().unwrap();

    let response = server.get(&format!("/s/{code}")).await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/target?x=1");
}

#[tokio::test]
async fn test_redirect_unknown_code() {
    let server = common::create_test_server(common::create_test_state());

    let response = server.get("/s/nope42").await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"]["message"], "URL not found");
}

#[tokio::test]
async fn test_head_redirects_and_counts() {
    let server = common::create_test_server(common::create_test_state());
    let token = common::register_and_login(&server, "alice", "alice@example.com").await;
    let created = common::shorten(&server, &token, "https://example.com").await;
    let code = created["short_code"].as_str().unwrap();

    let response = server.method(Method::HEAD, &format!("/s/{code}")).await;
    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com");

    server.get(&format!("/s/{code}")).await;

    let links = server
        .get("/api/links")
        .add_header("Authorization", common::bearer(&token))
        .await
        .json::<Value>();
    assert_eq!(links["data"][0]["click_count"], 2);
}

#[tokio::test]
async fn test_redirect_records_client_details() {
    let state = AppState::new(Repositories::in_memory(), common::test_settings(true));
    let server = common::create_test_server(state);
    let token = common::register_and_login(&server, "alice", "alice@example.com").await;
    let created = common::shorten(&server, &token, "https://example.com").await;
    let code = created["short_code"].as_str().unwrap();

    server
        .get(&format!("/s/{code}"))
        .add_header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
        .add_header("Referer", "https://news.example/item")
        .add_header("User-Agent", "curl/8.5")
        .await
        .assert_status(StatusCode::FOUND);

    let analytics = server
        .get(&format!("/api/links/{code}/analytics"))
        .add_header("Authorization", common::bearer(&token))
        .await
        .json::<Value>();

    let click = &analytics["analytics"][0];
    assert_eq!(click["ip_address"], "203.0.113.7");
    assert_eq!(click["referrer"], "https://news.example/item");
    assert_eq!(click["user_agent"], "curl/8.5");
}

#[tokio::test]
async fn test_forwarded_for_ignored_without_proxy() {
    let server = common::create_test_server(common::create_test_state());
    let token = common::register_and_login(&server, "alice", "alice@example.com").await;
    let created = common::shorten(&server, &token, "https://example.com").await;
    let code = created["short_code"].as_str().unwrap();

    server
        .get(&format!("/s/{code}"))
        .add_header("X-Forwarded-For", "203.0.113.7")
        .await;

    let analytics = server
        .get(&format!("/api/links/{code}/analytics"))
        .add_header("Authorization", common::bearer(&token))
        .await
        .json::<Value>();

    assert_ne!(analytics["analytics"][0]["ip_address"], "203.0.113.7");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_redirects_count_every_click() {
    const N: usize = 200;

    let state = common::create_test_state();
    let user = state
        .auth_service
        .register("alice", "alice@example.com", "hunter22")
        .await
        .unwrap();
    let link = state
        .link_service
        .shorten(user.id, "https://example.com")
        .await
        .unwrap();

    let tasks: Vec<_> = (0..N)
        .map(|i| {
            let redirect = state.redirect_service.clone();
            let code = link.short_code.clone();
            tokio::spawn(async move {
                let client = ClientInfo {
                    ip_address: format!("10.0.0.{}", i % 250),
                    ..ClientInfo::default()
                };
                redirect.resolve(&code, client).await
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), "https://example.com");
    }

    let page = state
        .analytics_service
        .get_analytics(user.id, &link.short_code, PageRequest::new(None, None))
        .await
        .unwrap();

    assert_eq!(page.link.click_count, N as i64);
    assert_eq!(page.clicks.total, N as i64);
}
