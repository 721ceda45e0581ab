//! Integration tests for `/api/v1/auth` and the session requirement.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_empty, post_json};
use serde_json::json;

#[tokio::test]
async fn login_with_any_password_returns_demo_user() {
    let app = common::build_test_app().await;

    let response = post_json(
        app.router(),
        "/api/v1/auth/login",
        json!({ "email": "ana@example.com", "password": "anything" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], "1");
    assert_eq!(json["data"]["name"], "Demo User");
    assert_eq!(json["data"]["email"], "ana@example.com");
    assert_eq!(json["data"]["role"], "admin");
}

#[tokio::test]
async fn login_accepts_blank_credentials() {
    let app = common::build_test_app().await;
    let response = post_json(
        app.router(),
        "/api/v1/auth/login",
        json!({ "email": "", "password": "" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Demo User");
    assert_eq!(json["data"]["email"], "");
    assert!(app.state.auth.read().await.is_authenticated());
}

#[tokio::test]
async fn me_requires_session() {
    let app = common::build_test_app().await;
    let response = get(app.router(), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_after_login_then_logout() {
    let app = common::build_test_app().await;
    post_json(
        app.router(),
        "/api/v1/auth/login",
        json!({ "email": "sam@example.com", "password": "" }),
    )
    .await;

    let me = body_json(get(app.router(), "/api/v1/auth/me").await).await;
    assert_eq!(me["data"]["email"], "sam@example.com");

    let response = post_empty(app.router(), "/api/v1/auth/logout").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.router(), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_api_rejects_without_session() {
    let app = common::build_test_app().await;
    for uri in ["/api/v1/funnels", "/api/v1/workspace", "/api/v1/dashboard"] {
        let response = get(app.router(), uri).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}
