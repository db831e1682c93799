//! JSON API routes
//!
//! Every route answers unsupported methods with a 405 envelope before any
//! extractor runs, so method errors take precedence over authentication.

pub mod auth;
pub mod reservations;
pub mod reviews;
pub mod types;
pub mod users;

use axum::{Router, routing::MethodRouter};

use crate::error::ApiError;
use crate::state::AppState;

/// Restrict a route to the methods in `allow`, which becomes the `Allow` header
pub(crate) fn allow_only(
    allow: &'static str,
    router: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    router.fallback(move || async move { ApiError::MethodNotAllowed { allow } })
}

/// Create JSON API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(users::routes())
        .merge(reservations::routes())
        .merge(reviews::routes())
}
