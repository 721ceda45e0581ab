//! Route definitions for the `/funnels` collection.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::funnels;
use crate::state::AppState;

/// Routes mounted at `/funnels`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> save
/// POST   /reload         -> reload
/// DELETE /{id}           -> delete
/// POST   /{id}/select    -> select
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(funnels::list).post(funnels::save))
        .route("/reload", post(funnels::reload))
        .route("/{id}", delete(funnels::delete))
        .route("/{id}/select", post(funnels::select))
}
