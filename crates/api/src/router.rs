//! Top-level router: JSON API, HTML pages and the shared middleware stack.
//!
//! The binary and the integration tests both build their app through
//! [`build_app_router`], so tests exercise the same layers as production.

use std::time::Duration;

use axum::http::header::{CONTENT_TYPE, InvalidHeaderValue};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Header carrying the per-request UUID, set on the way in and echoed back.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Assemble the application.
///
/// `/health` sits at the root, the JSON API under `/api/v1`, and the page
/// routes (with the 404 fallback) take everything else. Layers run outermost
/// first: CORS, request id, tracing, request id echo, timeout, panic guard.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(build_cors_layer(config))
        .map_response(|res: axum::response::Response<_>| res.map(axum::body::Body::new))
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(CatchPanicLayer::new());

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .merge(routes::pages::router())
        .layer(middleware)
        .with_state(state)
}

/// Parse the configured origins into header values.
pub fn parse_origins(origins: &[String]) -> Result<Vec<HeaderValue>, InvalidHeaderValue> {
    origins.iter().map(|o| o.parse()).collect()
}

/// CORS for the browser builder. Sessions are server-side, so only the
/// JSON content type and the request id need to cross origins.
///
/// Panics on an unparseable origin; this only runs at start-up.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins = parse_origins(&config.cors_origins)
        .unwrap_or_else(|e| panic!("Invalid CORS origin in {:?}: {e}", config.cors_origins));

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE, REQUEST_ID_HEADER])
        .expose_headers([REQUEST_ID_HEADER])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
