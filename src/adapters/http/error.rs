//! JSON error body shared by every endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::foundation::ErrorCode;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Respond with the status that belongs to `code`.
    pub fn into_response_for(self, code: ErrorCode) -> Response {
        (status_for(code), Json(self)).into_response()
    }
}

/// HTTP status for a domain error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        c if c.is_not_found() => StatusCode::NOT_FOUND,
        c if c.is_validation() => StatusCode::BAD_REQUEST,
        ErrorCode::InvalidStateTransition => StatusCode::CONFLICT,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 400 for a path segment that is not a valid id.
pub fn invalid_id(kind: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(format!("Invalid {} ID", kind))),
    )
        .into_response()
}
