#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use kickflip_api::config::{LogFormat, ServerConfig};
use kickflip_api::router::build_app_router;
use kickflip_api::state::AppState;
use kickflip_core::advisory::AdvisoryEngine;
use kickflip_core::funnel::Funnel;
use kickflip_db::{InMemoryFunnelService, MemorySessionStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults and no advisory delay.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: None,
        session_file: "unused-session.json".into(),
        advisory_delay_ms: 0,
        log_format: LogFormat::Pretty,
    }
}

/// A router over in-memory stores, plus handles for arranging state.
#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub service: Arc<InMemoryFunnelService>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router with all middleware layers, backed by
/// an in-memory funnel store seeded with `funnels`.
pub async fn build_test_app_with(funnels: Vec<Funnel>) -> TestApp {
    let config = test_config();
    let service = Arc::new(InMemoryFunnelService::with_funnels(funnels));
    let advisory = AdvisoryEngine::new(Duration::ZERO, StdRng::seed_from_u64(7));

    let state = AppState::initialise(
        config.clone(),
        service.clone(),
        Arc::new(MemorySessionStore::new()),
        advisory,
        None,
    )
    .await;

    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        service,
    }
}

pub async fn build_test_app() -> TestApp {
    build_test_app_with(Vec::new()).await
}

/// A test app with the demo user already signed in.
pub async fn signed_in_app() -> TestApp {
    let app = build_test_app().await;
    sign_in(&app).await;
    app
}

pub async fn sign_in(app: &TestApp) {
    app.state
        .auth
        .write()
        .await
        .login(app.state.session_store.as_ref(), "demo@example.com", "pw")
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_form(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
