//! SplitIt API Server - Backend for receipt scanning
//!
//! Provides REST endpoints for:
//! - Synchronous receipt analysis (upload, wait, get the normalized record)
//! - Decoupled analysis (submit a job, poll its status)
//!
//! The heavy lifting happens in a remote document-understanding service;
//! this server submits the image, awaits the asynchronous analysis and
//! normalizes the returned fields into a fixed receipt shape.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use splitit_recognizer::{RecognizerClient, RecognizerConfig};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
mod handlers;
mod models;
mod state;
#[cfg(test)]
mod tests;

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("splitit_api=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    info!("Initializing SplitIt API...");
    let config = recognizer_config_from_env()?;
    let state = Arc::new(AppState::new(RecognizerClient::new(config)));

    let app = router(state);

    // Parse bind address
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting SplitIt API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router
fn router(state: Arc<AppState>) -> Router {
    // CORS configuration for the mobile/web clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Synchronous analysis
        .route("/api/receipts/analyze", post(handlers::analyze_receipt))
        // Decoupled submit/status pair
        .route("/api/receipts", post(handlers::submit_receipt))
        .route("/api/receipts/:id", get(handlers::get_receipt_job))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Read recognizer settings from the process environment.
///
/// The credential and endpoint are required; polling policy and the
/// diagnostics dump directory are optional overrides.
fn recognizer_config_from_env() -> Result<RecognizerConfig> {
    let endpoint =
        std::env::var("RECOGNIZER_ENDPOINT").context("RECOGNIZER_ENDPOINT must be set")?;
    let api_key = std::env::var("RECOGNIZER_API_KEY").context("RECOGNIZER_API_KEY must be set")?;

    let mut config = RecognizerConfig::new(endpoint, api_key);

    if let Ok(secs) = std::env::var("RECOGNIZER_POLL_INTERVAL_SECS") {
        let secs: u64 = secs
            .parse()
            .context("RECOGNIZER_POLL_INTERVAL_SECS must be an integer")?;
        config = config.with_poll_interval(Duration::from_secs(secs));
    }
    if let Ok(max) = std::env::var("RECOGNIZER_MAX_POLLS") {
        let max: u32 = max
            .parse()
            .context("RECOGNIZER_MAX_POLLS must be an integer")?;
        config = config.with_max_polls(max);
    }
    if let Ok(dir) = std::env::var("RECOGNIZER_DUMP_DIR") {
        config = config.with_dump_dir(dir);
    }

    Ok(config)
}
