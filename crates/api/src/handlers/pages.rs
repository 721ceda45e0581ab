//! Handlers for the HTML page surface.

use axum::extract::{OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use kickflip_core::routing::{resolve, AppRoute, RouteDecision};
use kickflip_core::session::User;
use serde::Deserialize;

use crate::handlers::dashboard::summary_for;
use crate::state::AppState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

async fn current_user(state: &AppState) -> Option<User> {
    state.auth.read().await.user().cloned()
}

/// Apply the login guard for `path`. `Err` carries the redirect response.
async fn guard(state: &AppState, path: &str) -> Result<(AppRoute, Option<User>), Response> {
    let user = current_user(state).await;
    match resolve(path, user.is_some()) {
        RouteDecision::Render(route) => Ok((route, user)),
        RouteDecision::Redirect(to) => Err(Redirect::to(to).into_response()),
    }
}

fn not_found_page(user: Option<&User>) -> Response {
    (StatusCode::NOT_FOUND, Html(views::not_found(user))).into_response()
}

/// GET /
pub async fn home(State(state): State<AppState>) -> Html<String> {
    Html(views::home(current_user(&state).await.as_ref()))
}

/// GET /login
pub async fn login_form(State(state): State<AppState>) -> Response {
    if current_user(&state).await.is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    let auth = state.auth.read().await;
    Html(views::login(auth.error())).into_response()
}

/// POST /login
pub async fn login_submit(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let result = state
        .auth
        .write()
        .await
        .login(state.session_store.as_ref(), &form.email, &form.password)
        .await;

    match result {
        Ok(_) => Redirect::to("/dashboard").into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Could not persist session from login form");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Html(views::login(Some("Login failed"))),
            )
                .into_response()
        }
    }
}

/// POST /logout
pub async fn logout_submit(State(state): State<AppState>) -> Redirect {
    if let Err(err) = state
        .auth
        .write()
        .await
        .logout(state.session_store.as_ref())
        .await
    {
        tracing::error!(error = %err, "Failed to clear stored session");
    }
    Redirect::to("/login")
}

/// GET /builder
pub async fn builder(State(state): State<AppState>, OriginalUri(uri): OriginalUri) -> Response {
    render_builder(&state, uri.path()).await
}

/// GET /builder/{id}
pub async fn builder_with_id(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(_id): Path<String>,
) -> Response {
    render_builder(&state, uri.path()).await
}

async fn render_builder(state: &AppState, path: &str) -> Response {
    let (route, user) = match guard(state, path).await {
        Ok(decision) => decision,
        Err(redirect) => return redirect,
    };
    let Some(user) = user else {
        return Redirect::to("/login").into_response();
    };

    match route {
        AppRoute::Builder(Some(id)) => {
            if state.workspace.select(id).await.is_none() {
                return not_found_page(Some(&user));
            }
        }
        AppRoute::Builder(None) => {
            if state.workspace.current().await.is_none() {
                state.workspace.create_new().await;
            }
        }
        _ => return not_found_page(Some(&user)),
    }

    let snapshot = state.workspace.snapshot().await;
    Html(views::builder(&user, &snapshot)).into_response()
}

/// GET /dashboard
pub async fn dashboard(State(state): State<AppState>, OriginalUri(uri): OriginalUri) -> Response {
    let user = match guard(&state, uri.path()).await {
        Ok((_, Some(user))) => user,
        Ok((_, None)) => return Redirect::to("/login").into_response(),
        Err(redirect) => return redirect,
    };
    let summary = summary_for(&state).await;
    Html(views::dashboard(&user, &summary)).into_response()
}

/// Fallback for unmatched paths.
pub async fn not_found(State(state): State<AppState>) -> Response {
    not_found_page(current_user(&state).await.as_ref())
}
