//! Integration tests for `/api/v1/advisory`.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json};
use kickflip_core::advisory::{DEFAULT_TIP, GREETING};
use kickflip_core::chat::FAILURE_REPLY;
use serde_json::json;

#[tokio::test]
async fn transcript_starts_with_greeting() {
    let app = common::build_test_app().await;
    let json = body_json(get(app.router(), "/api/v1/advisory/chat").await).await;

    let messages = json["data"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["sender"], "ai");
    assert_eq!(messages[0]["text"], GREETING);
}

#[tokio::test]
async fn chat_replies_and_records_exchange() {
    let app = common::build_test_app().await;

    let response = post_json(
        app.router(),
        "/api/v1/advisory/chat",
        json!({ "message": "Hello!" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["text"], GREETING);

    let response = post_json(
        app.router(),
        "/api/v1/advisory/chat",
        json!({ "message": "Pricing question" }),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["text"], DEFAULT_TIP);

    let json = body_json(get(app.router(), "/api/v1/advisory/chat").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn blank_chat_message_is_rejected() {
    let app = common::build_test_app().await;
    let response = post_json(
        app.router(),
        "/api/v1/advisory/chat",
        json!({ "message": "   " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_message_gets_apology() {
    let app = common::build_test_app().await;
    let response = post_json(
        app.router(),
        "/api/v1/advisory/chat",
        json!({ "message": "y".repeat(5000) }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["text"], FAILURE_REPLY);
}

#[tokio::test]
async fn generate_returns_insights_and_template() {
    let app = common::build_test_app().await;
    let response = post_json(
        app.router(),
        "/api/v1/advisory/generate",
        json!({ "industry": "E-commerce", "funnel_type": "Product Launch" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["insights"]["averageConversion"], 2.8);
    assert_eq!(json["data"]["template"]["steps"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn generate_requires_both_fields() {
    let app = common::build_test_app().await;
    let response = post_json(
        app.router(),
        "/api/v1/advisory/generate",
        json!({ "industry": "SaaS" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Please select both an industry and funnel type"
    );
}

#[tokio::test]
async fn catalog_lists_choices() {
    let app = common::build_test_app().await;
    let json = body_json(get(app.router(), "/api/v1/advisory/catalog").await).await;

    assert_eq!(json["data"]["industries"].as_array().unwrap().len(), 10);
    assert_eq!(json["data"]["funnelTypes"].as_array().unwrap().len(), 10);
    assert_eq!(json["data"]["suggestions"].as_array().unwrap().len(), 3);
    assert_eq!(json["data"]["palette"][0], "header");
}
