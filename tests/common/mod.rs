#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::{Value, json};
use link_shortener::routes::router;
use link_shortener::state::{AppState, Repositories, StateSettings};

pub const TEST_PASSWORD: &str = "correct-horse";

pub fn test_settings(behind_proxy: bool) -> StateSettings {
    StateSettings {
        jwt_secret: "integration-test-secret".to_string(),
        token_ttl: chrono::Duration::hours(1),
        bcrypt_cost: 4,
        base_url: None,
        behind_proxy,
    }
}

pub fn create_test_state() -> AppState {
    AppState::new(Repositories::in_memory(), test_settings(false))
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(router(state)).unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub async fn register(server: &TestServer, username: &str, email: &str) {
    server
        .post("/auth/register")
        .json(&json!({
            "username": username,
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);
}

pub async fn login(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/auth/login")
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .await;
    response.assert_status_ok();

    response.json::<Value>()["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Registers an account and returns a fresh session token for it.
pub async fn register_and_login(server: &TestServer, username: &str, email: &str) -> String {
    register(server, username, email).await;
    login(server, email).await
}

/// Shortens `url` as the token's owner and returns the response body.
pub async fn shorten(server: &TestServer, token: &str, url: &str) -> Value {
    let response = server
        .post("/api/shorten")
        .add_header("Authorization", bearer(token))
        .json(&json!({ "original_url": url }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

/// Id of the owner's link with the given short code.
pub async fn link_id(server: &TestServer, token: &str, code: &str) -> i64 {
    let response = server
        .get("/api/links")
        .add_header("Authorization", bearer(token))
        .add_query_param("search", code)
        .await;
    response.assert_status_ok();

    response.json::<Value>()["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["short_code"] == code)
        .and_then(|l| l["id"].as_i64())
        .unwrap()
}
