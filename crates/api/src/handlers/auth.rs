//! Handlers for `/auth`.
//!
//! Authentication is a mock: any email and password sign in as the demo user.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use kickflip_core::session::User;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::session::SessionUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = state
        .auth
        .write()
        .await
        .login(state.session_store.as_ref(), &input.email, &input.password)
        .await?;
    Ok(Json(DataResponse::new(user)))
}

/// POST /api/v1/auth/logout
pub async fn logout(State(state): State<AppState>) -> AppResult<StatusCode> {
    state
        .auth
        .write()
        .await
        .logout(state.session_store.as_ref())
        .await?;
    tracing::info!("User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(SessionUser(user): SessionUser) -> Json<DataResponse<User>> {
    Json(DataResponse::new(user))
}
