//! Octrace Server
//!
//! HTTP front end for the trace engine. Accepts a declarative trace
//! request, validates it, runs the fan-out, and answers with the run
//! summary once every fetch worker has finished.

mod api;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use octrace_engine::{Config, Tracer};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "octrace_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting octrace server");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        "Loaded configuration: results_root={}, {} app template(s), max_parallel_fetches={}",
        config.results_root.display(),
        config.apps.len(),
        config.max_parallel_fetches
    );

    let tracer = Arc::new(Tracer::new(Arc::new(config)));
    let app = api::create_router(tracer);

    let addr = std::env::var("OCTRACE_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
