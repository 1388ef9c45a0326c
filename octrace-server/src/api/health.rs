//! Liveness probe
//!
//! Answers as soon as the server is up; deliberately independent of the
//! trace engine and its configuration.

use axum::{http::StatusCode, response::IntoResponse};

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
