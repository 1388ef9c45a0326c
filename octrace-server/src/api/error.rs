//! API Error Handling
//!
//! Maps the engine's error taxonomy onto HTTP responses: validation
//! failures are the caller's fault (400), configuration and directory
//! failures are ours (500). Per-task fetch failures never surface here;
//! they ride back inside the run summary.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use octrace_core::error::ValidationError;
use octrace_engine::error::EngineError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
