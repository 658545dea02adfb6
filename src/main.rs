// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{routing::{get, post}, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::session_store::SessionStateStore;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::file_sink::DirectoryReportSink;
use crate::infrastructure::http_backend::HttpDiagnosticBackend;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    download_report, get_session, health_check, refresh_connectivity, start_analysis,
    stream_session,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create adapters (infrastructure layer)
    let backend = Arc::new(
        HttpDiagnosticBackend::new(config.backend.base_url.clone(), config.backend.timeout())
            .context("Failed to build HTTP client")?,
    );
    let sink = Arc::new(DirectoryReportSink::new(config.report.output_dir.clone()));

    // Create the session store (application layer)
    let session = SessionStateStore::new(backend, sink, config.session_settings());

    // Probe once at session start
    session.refresh_connectivity().await;

    let state = Arc::new(AppState { session });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/session", get(get_session))
        .route("/session/connectivity", post(refresh_connectivity))
        .route("/session/analysis", post(start_analysis))
        .route("/session/report", post(download_report))
        .route("/session/events", get(stream_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid server.listen_addr {}", config.server.listen_addr))?;
    tracing::info!(%addr, backend = %config.backend.base_url, "Starting diagnostic session controller");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
