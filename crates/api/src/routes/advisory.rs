//! Route definitions for `/advisory`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::advisory;
use crate::state::AppState;

/// ```text
/// GET    /chat       -> transcript
/// POST   /chat       -> chat
/// POST   /generate   -> generate
/// GET    /catalog    -> catalog
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", get(advisory::transcript).post(advisory::chat))
        .route("/generate", post(advisory::generate))
        .route("/catalog", get(advisory::catalog))
}
