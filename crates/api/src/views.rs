//! HTML views for the page surface.

use kickflip_core::advisory::{FUNNEL_TYPES, INDUSTRIES};
use kickflip_core::chat::SUGGESTIONS;
use kickflip_core::element::ElementType;
use kickflip_core::render::{escape_html, render_funnel};
use kickflip_core::session::User;
use kickflip_core::workspace::WorkspaceSnapshot;

use crate::handlers::dashboard::DashboardSummary;

const APP_NAME: &str = "Kickflip Funnels";

fn layout(title: &str, user: Option<&User>, body: &str) -> String {
    let nav = match user {
        Some(user) => format!(
            concat!(
                r#"<a href="/dashboard">Dashboard</a> <a href="/builder">Builder</a> "#,
                r#"<span>{name}</span> "#,
                r#"<form method="post" action="/logout" style="display:inline">"#,
                r#"<button type="submit">Logout</button></form>"#
            ),
            name = escape_html(&user.name)
        ),
        None => r#"<a href="/login">Login</a>"#.to_string(),
    };

    format!(
        concat!(
            "<!DOCTYPE html>\n",
            r#"<html lang="en"><head><meta charset="utf-8"><title>{title} | {app}</title></head>"#,
            r#"<body><header><a href="/">{app}</a> <nav>{nav}</nav></header>"#,
            "<main>{body}</main>",
            "<footer>&copy; {app}</footer></body></html>"
        ),
        title = escape_html(title),
        app = APP_NAME,
        nav = nav,
        body = body,
    )
}

fn options(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!(r#"<option value="{v}">{v}</option>"#, v = escape_html(v)))
        .collect()
}

pub fn home(user: Option<&User>) -> String {
    let cta = if user.is_some() {
        r#"<a href="/builder">Start Building</a>"#
    } else {
        r#"<a href="/login">Get Started</a>"#
    };
    layout(
        "Home",
        user,
        &format!(
            "<h1>Build high-converting funnels</h1>\
             <p>Drag, drop and preview landing pages with an assistant at your side.</p>{cta}"
        ),
    )
}

pub fn login(error: Option<&str>) -> String {
    let error = error
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape_html(e)))
        .unwrap_or_default();
    layout(
        "Login",
        None,
        &format!(
            concat!(
                "<h1>Sign in</h1>{error}",
                r#"<form method="post" action="/login">"#,
                r#"<label>Email <input type="email" name="email"></label>"#,
                r#"<label>Password <input type="password" name="password"></label>"#,
                r#"<button type="submit">Login</button></form>"#
            ),
            error = error
        ),
    )
}

pub fn builder(user: &User, snapshot: &WorkspaceSnapshot) -> String {
    let palette: String = ElementType::PALETTE
        .iter()
        .map(|t| format!(r#"<li data-type="{t}">{t}</li>"#))
        .collect();

    let (name, canvas) = match &snapshot.current {
        Some(funnel) => (funnel.name.as_str(), render_funnel(&funnel.elements)),
        None => (
            "No funnel selected",
            r#"<p>Create a new funnel or pick one from the dashboard.</p>"#.to_string(),
        ),
    };
    let mode = if snapshot.preview { "Preview" } else { "Edit" };
    let error = snapshot
        .error
        .as_deref()
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape_html(e)))
        .unwrap_or_default();
    let suggestions: String = SUGGESTIONS
        .iter()
        .map(|s| format!("<li>{}</li>", escape_html(s)))
        .collect();

    layout(
        "Builder",
        Some(user),
        &format!(
            concat!(
                "<h1>{name}</h1>{error}",
                r#"<section class="toolbox"><h2>Available Elements</h2><ul>{palette}</ul></section>"#,
                r#"<section class="canvas" data-mode="{mode}">{canvas}</section>"#,
                r#"<section class="generator"><h2>Funnel Generator</h2>"#,
                r#"<select name="industry">{industries}</select>"#,
                r#"<select name="funnel_type">{funnel_types}</select></section>"#,
                r#"<section class="chat"><h2>AI Assistant</h2><ul>{suggestions}</ul></section>"#
            ),
            name = escape_html(name),
            error = error,
            palette = palette,
            mode = mode,
            canvas = canvas,
            industries = options(&INDUSTRIES),
            funnel_types = options(&FUNNEL_TYPES),
            suggestions = suggestions,
        ),
    )
}

pub fn dashboard(user: &User, summary: &DashboardSummary) -> String {
    let recent = if summary.recent.is_empty() {
        "<p>No funnels yet.</p>".to_string()
    } else {
        let rows: String = summary
            .recent
            .iter()
            .map(|f| {
                let link = f
                    .id
                    .map(|id| format!("/builder/{id}"))
                    .unwrap_or_else(|| "/builder".to_string());
                format!(
                    r#"<li><a href="{link}">{name}</a> <small>{count} elements</small></li>"#,
                    name = escape_html(&f.name),
                    count = f.elements.len(),
                )
            })
            .collect();
        format!("<ul>{rows}</ul>")
    };

    layout(
        "Dashboard",
        Some(user),
        &format!(
            concat!(
                "<h1>Welcome, {name}</h1>",
                r#"<dl><dt>Total Funnels</dt><dd>{total}</dd>"#,
                r#"<dt>Active Campaigns</dt><dd>{active}</dd>"#,
                r#"<dt>Total Conversions</dt><dd>{conversions}</dd></dl>"#,
                "<h2>Recent Funnels</h2>{recent}"
            ),
            name = escape_html(&user.name),
            total = summary.stats.total_funnels,
            active = summary.stats.active_campaigns,
            conversions = summary.stats.total_conversions,
            recent = recent,
        ),
    )
}

pub fn not_found(user: Option<&User>) -> String {
    layout(
        "Page Not Found",
        user,
        r#"<h1>404</h1><p>The page you are looking for does not exist.</p><a href="/">Go Home</a>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_view_escapes_error() {
        let html = login(Some("<bad>"));
        assert!(html.contains("&lt;bad&gt;"));
        assert!(html.contains(r#"action="/login""#));
    }

    #[test]
    fn home_links_to_login_when_signed_out() {
        assert!(home(None).contains(r#"href="/login""#));
        assert!(home(Some(&User::demo("a@b.c"))).contains("Start Building"));
    }
}
