//! Page route table and the login guard.

use crate::types::DbId;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRoute {
    Home,
    Login,
    /// `/builder` or `/builder/{id}`.
    Builder(Option<DbId>),
    Dashboard,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Render(AppRoute),
    Redirect(&'static str),
}

impl AppRoute {
    /// Match a request path. Trailing slashes are ignored; a builder id
    /// that is not an integer matches nothing.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

        match segments.as_slice() {
            [] | [""] => Self::Home,
            ["login"] => Self::Login,
            ["dashboard"] => Self::Dashboard,
            ["builder"] => Self::Builder(None),
            ["builder", id] => id
                .parse::<DbId>()
                .map(|id| Self::Builder(Some(id)))
                .unwrap_or(Self::NotFound),
            _ => Self::NotFound,
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Builder(_) | Self::Dashboard)
    }
}

/// Decide what to serve for `path` given whether a session is present.
pub fn resolve(path: &str, authenticated: bool) -> RouteDecision {
    let route = AppRoute::parse(path);
    if route.is_protected() && !authenticated {
        tracing::debug!(path, "Redirecting unauthenticated request to login");
        return RouteDecision::Redirect(LOGIN_PATH);
    }
    RouteDecision::Render(route)
}
