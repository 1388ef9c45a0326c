//! API Module
//!
//! HTTP API layer for the trace server.

pub mod error;
pub mod health;
pub mod trace;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use octrace_engine::Tracer;

/// Create the API router with all endpoints
pub fn create_router(tracer: Arc<Tracer>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/request", post(trace::run_trace))
        .with_state(tracer)
        .layer(TraceLayer::new_for_http())
}
