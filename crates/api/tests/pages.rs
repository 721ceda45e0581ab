//! Integration tests for the HTML page surface and its login guard.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{body_text, get, post_form};
use kickflip_core::funnel::Funnel;

fn location(response: &axum::http::Response<axum::body::Body>) -> &str {
    response
        .headers()
        .get("location")
        .expect("redirect must carry a Location header")
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn protected_pages_redirect_to_login() {
    let app = common::build_test_app().await;
    for uri in ["/dashboard", "/builder", "/builder/3"] {
        let response = get(app.router(), uri).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/login");
    }
}

#[tokio::test]
async fn public_pages_render_without_session() {
    let app = common::build_test_app().await;

    let response = get(app.router(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Kickflip Funnels"));

    let response = get(app.router(), "/login").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(r#"name="email""#));
}

#[tokio::test]
async fn form_login_redirects_to_dashboard() {
    let app = common::build_test_app().await;

    let response = post_form(app.router(), "/login", "email=lee%40example.com&password=x").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    let response = get(app.router(), "/dashboard").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Welcome, Demo User"));
    assert!(html.contains("Total Funnels"));
}

#[tokio::test]
async fn form_login_with_blank_email_still_signs_in() {
    let app = common::build_test_app().await;
    let response = post_form(app.router(), "/login", "email=&password=").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    let response = get(app.router(), "/dashboard").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn logout_redirects_and_ends_session() {
    let app = common::signed_in_app().await;

    let response = post_form(app.router(), "/logout", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let response = get(app.router(), "/dashboard").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn builder_renders_toolbox_and_empty_canvas() {
    let app = common::signed_in_app().await;

    let response = get(app.router(), "/builder").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Available Elements"));
    assert!(html.contains("New Funnel"));
    assert!(html.contains("Drag elements here to build your funnel"));
}

#[tokio::test]
async fn builder_with_id_selects_funnel() {
    let mut funnel = Funnel::draft(Utc::now());
    funnel.name = "Black Friday".into();
    funnel.elements = kickflip_core::element_list::ElementList::demo();
    let app = common::build_test_app_with(vec![funnel]).await;
    common::sign_in(&app).await;

    let response = get(app.router(), "/builder/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Black Friday"));
    assert!(html.contains("Welcome to Our Product"));

    let response = get(app.router(), "/builder/42").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app.router(), "/builder/not-a-number").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_renders_404_page() {
    let app = common::build_test_app().await;
    let response = get(app.router(), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("404"));
}
