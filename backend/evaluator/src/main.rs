//! Project-script evaluator: entry point.
//!
//! Exposes a small Axum REST API that dry-runs the project-script validator
//! against a submitted datum, redeemer and script context, so off-chain
//! builders can check a transaction before submitting it.

mod api;
mod config;
mod errors;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use project_script::ProjectScript;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;
    info!(
        project_at_mph = %config.params.project_at_mph,
        protocol_nft_mph = %config.params.protocol_nft_mph,
        "validator parameters loaded"
    );

    // ─── REST API ─────────────────────────────────────────
    let api_state = Arc::new(api::ApiState {
        script: ProjectScript::new(config.params.clone()),
    });

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/params", get(api::params))
        .route("/evaluate", post(api::evaluate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(api_state);

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
