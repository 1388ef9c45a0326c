//! Trace API Handlers

use std::sync::Arc;

use axum::{Json, extract::State};

use octrace_core::domain::task::RunSummary;
use octrace_core::dto::TraceParams;
use octrace_engine::Tracer;

use crate::api::error::ApiResult;

/// POST /request
/// Validate and execute one trace run
///
/// The request is an immutable per-call value; nothing about it is kept
/// in process-wide state. The response is sent only after every fetch
/// worker has finished, with per-task failures reported in the summary.
pub async fn run_trace(
    State(tracer): State<Arc<Tracer>>,
    Json(params): Json<TraceParams>,
) -> ApiResult<Json<RunSummary>> {
    tracing::info!("Received trace request (filter value: {})", params.filter.value);

    let request = params.validate()?;
    let summary = tracer.run(&request).await?;

    tracing::info!(
        "Trace run {} done: {}/{} task(s) succeeded",
        summary.run_id,
        summary.succeeded,
        summary.total
    );

    Ok(Json(summary))
}
