//! API error types for HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use calltree_core::Error as CoreError;
use serde::Serialize;

use super::state::SessionId;

/// Structured API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Machine-readable error code
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn session_not_found(id: SessionId) -> Self {
        Self::new("SESSION_NOT_FOUND", format!("Session {} not found", id))
    }

    pub fn too_many_sessions(max: usize) -> Self {
        Self::new(
            "TOO_MANY_SESSIONS",
            format!("At most {} sessions may be open; close one first", max),
        )
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn status(&self) -> StatusCode {
        match self.code {
            "SESSION_NOT_FOUND" | "FUNCTION_NOT_FOUND" | "PATH_NOT_FOUND" | "NOT_FOUND" => {
                StatusCode::NOT_FOUND
            }

            "INVALID_PARAMETER" | "VALIDATION_ERROR" | "BAD_REQUEST" | "WRONG_NODE_KIND"
            | "ABI_PARSE_ERROR" | "ABI_ERROR" | "ABI_ENCODE_ERROR" | "ABI_DECODE_ERROR"
            | "HEX_DECODE_ERROR" => StatusCode::BAD_REQUEST,

            "NO_METHOD_SELECTED" => StatusCode::CONFLICT,

            "TOO_MANY_SESSIONS" => StatusCode::TOO_MANY_REQUESTS,

            "SHAPE_MISMATCH" | "INCOMPLETE_ARGUMENTS" => StatusCode::UNPROCESSABLE_ENTITY,

            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = err.code();

        // For internal errors, don't expose details
        let message = if err.is_internal() {
            "An internal error occurred".to_string()
        } else {
            err.to_string()
        };

        Self { code, message }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
