//! HTML pages behind the page gate
//!
//! Rendering is a placeholder; the gate decides who reaches each page.

use axum::{Extension, Router, middleware, response::Html, routing::get};
use salon_auth::{AuthUser, page_gate};
use std::sync::Arc;

use crate::state::AppState;

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{title} | SEA Salon</title></head><body>{body}</body></html>"
    ))
}

async fn home() -> Html<String> {
    page("Home", "<h1>SEA Salon</h1>")
}

async fn login() -> Html<String> {
    page("Login", "<h1>Login</h1>")
}

async fn register() -> Html<String> {
    page("Register", "<h1>Register</h1>")
}

async fn dashboard(Extension(user): Extension<AuthUser>) -> Html<String> {
    let body = if user.current_role().is_admin() {
        "<h1>Dashboard</h1><section id=\"reservations\"></section>"
    } else {
        "<h1>Dashboard</h1><section id=\"reservation-form\"></section><section id=\"review-form\"></section>"
    };
    page("Dashboard", body)
}

/// Create page routes, gated by the session cookie
pub fn routes(jwt: Arc<salon_auth::JwtManager>) -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/login", get(login))
        .route("/register", get(register))
        .route("/dashboard", get(dashboard))
        // The wildcard does not match an empty remainder
        .route("/dashboard/", get(dashboard))
        .route("/dashboard/{*rest}", get(dashboard))
        .layer(middleware::from_fn_with_state(jwt, page_gate))
}
