pub mod advisory;
pub mod auth;
pub mod dashboard;
pub mod funnels;
pub mod health;
pub mod pages;
pub mod workspace;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/login                          login (public)
/// /auth/logout                         logout
/// /auth/me                             current user (session required)
///
/// /funnels                             list, save (session required)
/// /funnels/reload                      reload from store
/// /funnels/{id}                        delete
/// /funnels/{id}/select                 make current
///
/// /workspace                           snapshot of the builder session
/// /workspace/...                       current funnel editing
///
/// /advisory/chat                       transcript, send message
/// /advisory/generate                   insights + template
/// /advisory/catalog                    industries, funnel types, suggestions
///
/// /dashboard                           stats + recent funnels
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/funnels", funnels::router())
        .nest("/workspace", workspace::router())
        .nest("/advisory", advisory::router())
        .nest("/dashboard", dashboard::router())
}
