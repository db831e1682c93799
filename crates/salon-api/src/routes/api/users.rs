//! Signed-in user routes

use axum::{Router, extract::State, routing::get};

use crate::error::ApiError;
use crate::response::ApiSuccess;
use crate::state::AppState;

use super::allow_only;
use super::auth::RequireSession;
use super::types::MeResponse;

/// GET /api/users/me
async fn me(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
) -> Result<ApiSuccess<MeResponse>, ApiError> {
    let user = state
        .db
        .get_user_by_id(session.subject())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(ApiSuccess::ok(MeResponse {
        full_name: user.full_name,
        phone_number: user.phone_number,
    }))
}

/// Create user routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/users/me", allow_only("GET", get(me)))
}
