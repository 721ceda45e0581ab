//! Session extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use kickflip_core::error::CoreError;
use kickflip_core::session::User;

use crate::error::AppError;
use crate::state::AppState;

/// The signed-in user. Handlers taking this extractor reject requests with
/// 401 while no session is present.
///
/// ```ignore
/// async fn my_handler(SessionUser(user): SessionUser) -> AppResult<Json<()>> {
///     tracing::info!(email = %user.email, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SessionUser(pub User);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state
            .auth
            .read()
            .await
            .user()
            .cloned()
            .map(SessionUser)
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Sign in required".into())))
    }
}
