mod common;

use axum::http::StatusCode;
use serde_json::Value;

/// register → login → shorten → redirect → analytics → export → logout
#[tokio::test]
async fn test_full_link_lifecycle() {
    let server = common::create_test_server(common::create_test_state());

    common::register(&server, "alice", "alice@example.com").await;
    let token = common::login(&server, "alice@example.com").await;

    let created = common::shorten(&server, &token, "https://www.rust-lang.org/learn").await;
    let code = created["short_code"].as_str().unwrap();

    let redirect = server
        .get(&format!("/s/{code}"))
        .add_header("Referer", "https://search.example")
        .await;
    redirect.assert_status(StatusCode::FOUND);
    assert_eq!(redirect.header("location"), "https://www.rust-lang.org/learn");

    let analytics = server
        .get(&format!("/api/links/{code}/analytics"))
        .add_header("Authorization", common::bearer(&token))
        .await;
    analytics.assert_status_ok();
    let analytics = analytics.json::<Value>();
    assert_eq!(analytics["click_count"], 1);
    assert_eq!(analytics["analytics"][0]["referrer"], "https://search.example");

    let csv = server
        .get(&format!("/api/links/{code}/export"))
        .add_header("Authorization", common::bearer(&token))
        .await
        .text();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains("https://search.example"));

    server
        .post("/auth/logout")
        .add_header("Authorization", common::bearer(&token))
        .await
        .assert_status_ok();
    server
        .get(&format!("/api/links/{code}/analytics"))
        .add_header("Authorization", common::bearer(&token))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    // Redirects do not depend on the owner's session.
    server
        .get(&format!("/s/{code}"))
        .await
        .assert_status(StatusCode::FOUND);
}
