//! Integration tests for `/api/v1/funnels`.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{body_json, delete, get, post_empty, post_json};
use kickflip_core::funnel::Funnel;
use kickflip_db::FailOp;
use serde_json::json;

fn seeded(name: &str) -> Funnel {
    let mut funnel = Funnel::draft(Utc::now());
    funnel.name = name.to_string();
    funnel
}

#[tokio::test]
async fn list_reports_loaded_funnels() {
    let app = common::build_test_app_with(vec![seeded("Launch"), seeded("Webinar")]).await;
    common::sign_in(&app).await;

    let response = get(app.router(), "/api/v1/funnels").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["loadState"]["state"], "ready");
    assert_eq!(json["data"]["funnels"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["funnels"][0]["id"], 1);
}

#[tokio::test]
async fn save_creates_then_updates() {
    let app = common::signed_in_app().await;

    let response = post_json(
        app.router(),
        "/api/v1/funnels",
        json!({
            "name": "Spring Sale",
            "elements": [{ "id": "e1", "type": "header", "content": "Hello" }]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["id"], 1);
    assert_eq!(created["data"]["elements"][0]["type"], "header");

    let response = post_json(
        app.router(),
        "/api/v1/funnels",
        json!({ "id": 1, "name": "Summer Sale", "elements": [] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let list = body_json(get(app.router(), "/api/v1/funnels").await).await;
    let funnels = list["data"]["funnels"].as_array().unwrap();
    assert_eq!(funnels.len(), 1);
    assert_eq!(funnels[0]["name"], "Summer Sale");
    assert_eq!(funnels[0]["createdAt"], created["data"]["createdAt"]);
}

#[tokio::test]
async fn save_with_repeated_element_ids_is_rejected() {
    let app = common::signed_in_app().await;

    let response = post_json(
        app.router(),
        "/api/v1/funnels",
        json!({
            "name": "Twins",
            "elements": [
                { "id": "e1", "type": "header", "content": "One" },
                { "id": "e1", "type": "text", "content": "Two" }
            ]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.service.is_empty().await);
}

#[tokio::test]
async fn save_failure_returns_503_and_records_error() {
    let app = common::signed_in_app().await;
    app.service.fail_next(FailOp::Save).await;

    let response = post_json(app.router(), "/api/v1/funnels", json!({ "name": "x" })).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let list = body_json(get(app.router(), "/api/v1/funnels").await).await;
    assert_eq!(list["data"]["error"], "Failed to save funnel");
    assert!(list["data"]["funnels"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn delete_removes_funnel_and_unknown_id_is_404() {
    let app = common::build_test_app_with(vec![seeded("Doomed")]).await;
    common::sign_in(&app).await;

    let response = delete(app.router(), "/api/v1/funnels/1").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete(app.router(), "/api/v1/funnels/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn select_makes_funnel_current() {
    let app = common::build_test_app_with(vec![seeded("Pick me")]).await;
    common::sign_in(&app).await;

    let response = post_empty(app.router(), "/api/v1/funnels/1/select").await;
    assert_eq!(response.status(), StatusCode::OK);

    let snapshot = body_json(get(app.router(), "/api/v1/workspace").await).await;
    assert_eq!(snapshot["data"]["current"]["name"], "Pick me");

    let response = post_empty(app.router(), "/api/v1/funnels/99/select").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reload_recovers_after_failed_load() {
    let app = common::signed_in_app().await;
    app.service.fail_next(FailOp::List).await;

    let response = post_empty(app.router(), "/api/v1/funnels/reload").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let list = body_json(get(app.router(), "/api/v1/funnels").await).await;
    assert_eq!(list["data"]["loadState"]["state"], "errored");

    let response = post_empty(app.router(), "/api/v1/funnels/reload").await;
    assert_eq!(response.status(), StatusCode::OK);
}
