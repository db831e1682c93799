//! Session extractor and authentication routes

use axum::{
    Router,
    extract::{FromRef, FromRequestParts, State},
    http::{HeaderMap, request::Parts},
    routing::{get, post},
};
use salon_auth::cookie::{clear_session_cookies, set_session_cookies};
use salon_auth::{AuthUser, SessionState};
use salon_db::{DbError, NewUser, UserRole};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::response::{ApiJson, ApiSuccess};
use crate::state::AppState;
use crate::validation::{
    validate_email, validate_full_name, validate_new_password, validate_password_length,
    validate_phone_number,
};

use super::allow_only;
use super::types::{LoginRequest, LoginResponse, RegisterRequest};

// ==================== Auth Extractor ====================

/// Extractor for a verified session (required)
///
/// Rejects with 401 before the handler body runs: a missing cookie clears
/// the role cookie, an invalid one clears both.
pub struct RequireSession(pub AuthUser);

impl<S> FromRequestParts<S> for RequireSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        match SessionState::from_headers(&app_state.jwt, &parts.headers) {
            SessionState::Valid(user) => {
                debug!(
                    "Authenticated session: {} ({})",
                    user.subject(),
                    user.current_role()
                );
                Ok(RequireSession(user))
            }
            SessionState::NoToken => {
                metrics::counter!("salon_sessions_rejected_total", "reason" => "missing")
                    .increment(1);
                Err(ApiError::MissingSession)
            }
            SessionState::Invalid => Err(ApiError::InvalidSession),
        }
    }
}

// ==================== Auth Routes ====================

/// POST /api/login
async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<(HeaderMap, ApiSuccess<LoginResponse>), ApiError> {
    validate_email(&request.email)?;
    validate_password_length(&request.password)?;

    debug!("Login attempt for {}", request.email);

    // Unknown emails still pay for one verification against the dummy hash
    let user = state.db.get_user_by_email(&request.email).await?;
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let password_valid = state
        .passwords
        .verify_blocking(stored_hash, request.password)
        .await?;

    let user = match (user, password_valid) {
        (Some(u), true) => u,
        _ => {
            metrics::counter!("salon_logins_total", "outcome" => "failed").increment(1);
            return Err(ApiError::LoginFailed);
        }
    };

    let token = state.jwt.issue_session(&user.id, user.role)?;

    let mut headers = HeaderMap::new();
    set_session_cookies(&mut headers, &token, user.role, state.jwt.session_ttl_secs());

    metrics::counter!("salon_logins_total", "outcome" => "success").increment(1);
    info!("User {} logged in as {}", user.id, user.role);

    Ok((headers, ApiSuccess::ok(LoginResponse { role: user.role })))
}

/// POST /api/register
async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    validate_full_name(&request.full_name)?;
    validate_email(&request.email)?;
    validate_phone_number(&request.phone_number)?;
    validate_new_password(&request.password)?;

    let password_hash = state.passwords.hash_blocking(request.password).await?;

    let result = state
        .db
        .insert_user(NewUser {
            full_name: request.full_name.trim().to_string(),
            email: request.email,
            phone_number: request.phone_number,
            password_hash,
            role: UserRole::Customer,
        })
        .await;

    match result {
        Ok(user) => {
            metrics::counter!("salon_registrations_total", "outcome" => "success").increment(1);
            info!("Registered customer {}", user.id);
            Ok(ApiSuccess::ok(()))
        }
        Err(e @ DbError::Duplicate(_)) => {
            metrics::counter!("salon_registrations_total", "outcome" => "duplicate").increment(1);
            debug!("Registration rejected: {}", e);
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /api/logout
async fn logout() -> (HeaderMap, ApiSuccess<()>) {
    let mut headers = HeaderMap::new();
    clear_session_cookies(&mut headers);
    (headers, ApiSuccess::ok(()))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/login", allow_only("POST", post(login)))
        .route("/api/register", allow_only("POST", post(register)))
        .route("/api/logout", allow_only("GET", get(logout)))
}
