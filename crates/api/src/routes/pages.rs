//! Server-rendered HTML pages.
//!
//! Protected pages redirect to `/login` (303) while signed out; anything
//! unmatched renders the 404 page.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// ```text
/// GET    /               -> home
/// GET    /login          -> login_form
/// POST   /login          -> login_submit
/// POST   /logout         -> logout_submit
/// GET    /builder        -> builder
/// GET    /builder/{id}   -> builder_with_id
/// GET    /dashboard      -> dashboard
/// *                      -> not_found
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/login", get(pages::login_form).post(pages::login_submit))
        .route("/logout", post(pages::logout_submit))
        .route("/builder", get(pages::builder))
        .route("/builder/{id}", get(pages::builder_with_id))
        .route("/dashboard", get(pages::dashboard))
        .fallback(pages::not_found)
}
