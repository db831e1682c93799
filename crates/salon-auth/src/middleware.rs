//! Page-routing gate for Axum
//!
//! Runs in front of the HTML pages. API handlers use their own extractor
//! (see `salon-api`) but share [`SessionState`] with this gate.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use crate::cookie::{
    ACCESS_TOKEN_COOKIE, USER_ROLE_COOKIE, clear_role_cookie, clear_session_cookies, read_cookie,
    set_role_cookie,
};
use crate::jwt::{AuthUser, JwtManager};

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Pages the gate applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRoute {
    Home,
    Login,
    Register,
    Dashboard,
}

impl PageRoute {
    /// Match a request path; `None` means the gate does not apply
    pub fn classify(path: &str) -> Option<Self> {
        match path {
            "/" => Some(PageRoute::Home),
            "/login" => Some(PageRoute::Login),
            "/register" => Some(PageRoute::Register),
            _ if path == DASHBOARD_PATH || path.starts_with("/dashboard/") => {
                Some(PageRoute::Dashboard)
            }
            _ => None,
        }
    }
}

/// Authentication state of one request, derived only from the session cookie
#[derive(Debug, Clone)]
pub enum SessionState {
    NoToken,
    Valid(AuthUser),
    Invalid,
}

impl SessionState {
    pub fn from_headers(jwt: &JwtManager, headers: &HeaderMap) -> Self {
        let Some(token) = read_cookie(headers, ACCESS_TOKEN_COOKIE) else {
            return SessionState::NoToken;
        };

        match jwt.verify(token) {
            Ok(user) => SessionState::Valid(user),
            Err(_) => {
                metrics::counter!("salon_sessions_rejected_total", "reason" => "invalid")
                    .increment(1);
                SessionState::Invalid
            }
        }
    }
}

/// Whether the request's role cookie already mirrors the verified role
fn role_cookie_matches(headers: &HeaderMap, user: &AuthUser) -> bool {
    read_cookie(headers, USER_ROLE_COOKIE) == Some(user.current_role().as_str())
}

/// Page gate middleware
///
/// - `/` is public; the role cookie is reconciled with the session or cleared.
/// - `/login` and `/register` bounce signed-in users to the dashboard.
/// - `/dashboard` and below require a valid session, otherwise redirect to login.
///
/// Every path that finds the session missing or invalid clears the role
/// cookie, and invalid sessions lose the session cookie too.
pub async fn page_gate(
    State(jwt): State<Arc<JwtManager>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(route) = PageRoute::classify(request.uri().path()) else {
        return next.run(request).await;
    };

    let session = SessionState::from_headers(&jwt, request.headers());
    debug!("Page gate: {:?} with {:?}", route, session);

    match (route, session) {
        (PageRoute::Home, SessionState::NoToken) => {
            let mut response = next.run(request).await;
            clear_role_cookie(response.headers_mut());
            response
        }
        (PageRoute::Login | PageRoute::Register, SessionState::NoToken) => {
            next.run(request).await
        }
        (PageRoute::Home | PageRoute::Login | PageRoute::Register, SessionState::Invalid) => {
            let mut response = next.run(request).await;
            clear_session_cookies(response.headers_mut());
            response
        }
        (PageRoute::Login | PageRoute::Register, SessionState::Valid(_)) => {
            Redirect::temporary(DASHBOARD_PATH).into_response()
        }
        (PageRoute::Home | PageRoute::Dashboard, SessionState::Valid(user)) => {
            let stale = !role_cookie_matches(request.headers(), &user);
            let role = user.current_role();
            let max_age = user.remaining_secs(Utc::now().timestamp());

            request.extensions_mut().insert(user);
            let mut response = next.run(request).await;
            if stale {
                set_role_cookie(response.headers_mut(), role, max_age);
            }
            response
        }
        (PageRoute::Dashboard, SessionState::NoToken) => {
            metrics::counter!("salon_sessions_rejected_total", "reason" => "missing").increment(1);
            let mut response = Redirect::temporary(LOGIN_PATH).into_response();
            clear_role_cookie(response.headers_mut());
            response
        }
        (PageRoute::Dashboard, SessionState::Invalid) => {
            let mut response = Redirect::temporary(LOGIN_PATH).into_response();
            clear_session_cookies(response.headers_mut());
            response
        }
    }
}
