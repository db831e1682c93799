//! JSON envelope shared by every API response
//!
//! Success: `{"status": "success", "data": ...}`
//! Failure: `{"status": "failed", "error": {"code", "sentinel", "message"}}`

use axum::{
    Json,
    extract::FromRequest,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Sentinel};

/// JSON request body whose rejections become `InvalidJSON` envelopes
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Serialize)]
struct SuccessBody<T> {
    status: &'static str,
    data: T,
}

/// Failure payload inside the envelope
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    pub code: u16,
    pub sentinel: Sentinel,
    pub message: String,
}

#[derive(Serialize)]
pub(crate) struct FailedBody {
    status: &'static str,
    error: ErrorDetail,
}

impl FailedBody {
    pub(crate) fn new(status: StatusCode, sentinel: Sentinel, message: String) -> Self {
        Self {
            status: "failed",
            error: ErrorDetail {
                code: status.as_u16(),
                sentinel,
                message,
            },
        }
    }
}

/// Successful response; `()` data serializes as `null`
pub struct ApiSuccess<T> {
    status: StatusCode,
    data: T,
}

impl<T> ApiSuccess<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        let body = SuccessBody {
            status: "success",
            data: self.data,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unit_data_is_null() {
        let response = ApiSuccess::ok(()).into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"status": "success", "data": null})
        );
    }

    #[tokio::test]
    async fn test_created_status() {
        let response = ApiSuccess::created(json!({"id": 1})).into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["data"]["id"], 1);
    }
}
