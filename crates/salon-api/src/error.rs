//! API error types

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode, header::ALLOW};
use axum::response::{IntoResponse, Response};
use salon_auth::AuthError;
use salon_auth::cookie::{clear_role_cookie, clear_session_cookies};
use salon_db::{DbError, UniqueField};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::response::FailedBody;

/// Machine-readable failure kind carried in every error envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentinel {
    #[serde(rename = "InvalidJSON")]
    InvalidJson,
    #[serde(rename = "InvalidHTTPMethod")]
    InvalidHttpMethod,
    LoginFailed,
    RegisteredEmail,
    RegisteredPhoneNumber,
    MissingCredentials,
    InvalidCredentials,
    NotFound,
    ServerError,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidJson(String),

    #[error("Invalid HTTP method")]
    MethodNotAllowed { allow: &'static str },

    #[error("Email or password is incorrect")]
    LoginFailed,

    #[error("Authentication credentials are missing")]
    MissingSession,

    #[error("Invalid authentication credentials")]
    InvalidSession,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidJson(format!("Invalid JSON schema: {}", rejection.body_text()))
    }
}

/// Cookies a failure response has to expire
#[derive(Clone, Copy, PartialEq, Eq)]
enum CookieReset {
    None,
    Role,
    Both,
}

const SERVER_ERROR_MESSAGE: &str = "Internal server error";

impl ApiError {
    fn parts(&self) -> (StatusCode, Sentinel, String, CookieReset) {
        match self {
            ApiError::InvalidJson(msg) => (
                StatusCode::BAD_REQUEST,
                Sentinel::InvalidJson,
                msg.clone(),
                CookieReset::None,
            ),
            ApiError::MethodNotAllowed { .. } => (
                StatusCode::METHOD_NOT_ALLOWED,
                Sentinel::InvalidHttpMethod,
                self.to_string(),
                CookieReset::None,
            ),
            ApiError::LoginFailed => (
                StatusCode::BAD_REQUEST,
                Sentinel::LoginFailed,
                self.to_string(),
                CookieReset::None,
            ),
            ApiError::MissingSession => (
                StatusCode::UNAUTHORIZED,
                Sentinel::MissingCredentials,
                self.to_string(),
                CookieReset::Role,
            ),
            ApiError::InvalidSession | ApiError::Auth(AuthError::InvalidToken) => (
                StatusCode::UNAUTHORIZED,
                Sentinel::InvalidCredentials,
                ApiError::InvalidSession.to_string(),
                CookieReset::Both,
            ),
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                Sentinel::NotFound,
                msg.clone(),
                CookieReset::None,
            ),
            ApiError::Database(DbError::NotFound(msg)) => (
                StatusCode::NOT_FOUND,
                Sentinel::NotFound,
                msg.clone(),
                CookieReset::None,
            ),
            ApiError::Database(DbError::Duplicate(UniqueField::Email)) => (
                StatusCode::BAD_REQUEST,
                Sentinel::RegisteredEmail,
                "Email is already registered".to_string(),
                CookieReset::None,
            ),
            ApiError::Database(DbError::Duplicate(UniqueField::PhoneNumber)) => (
                StatusCode::BAD_REQUEST,
                Sentinel::RegisteredPhoneNumber,
                "Phone number is already registered".to_string(),
                CookieReset::None,
            ),
            ApiError::Database(_) | ApiError::Auth(_) => {
                error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Sentinel::ServerError,
                    SERVER_ERROR_MESSAGE.to_string(),
                    CookieReset::None,
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, sentinel, message, reset) = self.parts();

        let mut response = (status, Json(FailedBody::new(status, sentinel, message))).into_response();

        if let ApiError::MethodNotAllowed { allow } = self {
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static(allow));
        }

        match reset {
            CookieReset::None => {}
            CookieReset::Role => clear_role_cookie(response.headers_mut()),
            CookieReset::Both => clear_session_cookies(response.headers_mut()),
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ErrorDetail;
    use axum::body::to_bytes;
    use axum::http::header::SET_COOKIE;
    use serde_json::Value;

    async fn error_detail(response: Response) -> ErrorDetail {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "failed");
        serde_json::from_value(body["error"].clone()).unwrap()
    }

    #[test]
    fn test_sentinel_wire_names() {
        assert_eq!(
            serde_json::to_string(&Sentinel::InvalidJson).unwrap(),
            "\"InvalidJSON\""
        );
        assert_eq!(
            serde_json::to_string(&Sentinel::InvalidHttpMethod).unwrap(),
            "\"InvalidHTTPMethod\""
        );
        assert_eq!(
            serde_json::to_string(&Sentinel::RegisteredPhoneNumber).unwrap(),
            "\"RegisteredPhoneNumber\""
        );
    }

    #[tokio::test]
    async fn test_method_not_allowed_sets_allow_header() {
        let response = ApiError::MethodNotAllowed { allow: "GET, POST" }.into_response();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET, POST");

        let detail = error_detail(response).await;
        assert_eq!(detail.code, 405);
        assert_eq!(detail.sentinel, Sentinel::InvalidHttpMethod);
    }

    #[tokio::test]
    async fn test_missing_session_clears_role_cookie_only() {
        let response = ApiError::MissingSession.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let cookies: Vec<_> = response.headers().get_all(SET_COOKIE).iter().collect();
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].to_str().unwrap().starts_with("user_role=;"));

        assert_eq!(
            error_detail(response).await.sentinel,
            Sentinel::MissingCredentials
        );
    }

    #[tokio::test]
    async fn test_invalid_session_clears_both_cookies() {
        let response = ApiError::InvalidSession.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get_all(SET_COOKIE).iter().count(), 2);
        assert_eq!(
            error_detail(response).await.sentinel,
            Sentinel::InvalidCredentials
        );
    }

    #[tokio::test]
    async fn test_duplicate_maps_to_field_sentinel() {
        let response = ApiError::Database(DbError::Duplicate(UniqueField::PhoneNumber)).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let detail = error_detail(response).await;
        assert_eq!(detail.sentinel, Sentinel::RegisteredPhoneNumber);
        assert_eq!(detail.message, "Phone number is already registered");
    }

    #[tokio::test]
    async fn test_server_errors_are_opaque() {
        let response =
            ApiError::Auth(AuthError::MalformedHash("bad salt".to_string())).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = error_detail(response).await;
        assert_eq!(detail.sentinel, Sentinel::ServerError);
        assert!(!detail.message.contains("bad salt"));
    }
}
