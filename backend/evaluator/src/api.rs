//! Axum REST API handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use project_script::{Data, ProjectScript, ScriptContext, ScriptParams};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Clone)]
pub struct ApiState {
    pub script: ProjectScript,
}

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EvaluationRequest {
    pub datum: Data,
    pub redeemer: Data,
    pub context: ScriptContext,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct EvaluationResponse {
    pub approved: bool,
    /// Label of the hard failure that aborted evaluation, if any.
    pub failure: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /params`
///
/// The parameters every evaluation runs with.
pub async fn params(State(state): State<Arc<ApiState>>) -> Json<ScriptParams> {
    Json(state.script.params().clone())
}

/// `POST /evaluate`
///
/// Dry-runs the validator. A labeled failure and a plain rejection both
/// report `approved: false`; only the former carries a `failure`.
pub async fn evaluate(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<EvaluationRequest>,
) -> Json<EvaluationResponse> {
    let verdict = state
        .script
        .validate(&request.datum, &request.redeemer, &request.context);

    let response = match verdict {
        Ok(approved) => EvaluationResponse {
            approved,
            failure: None,
        },
        Err(e) => EvaluationResponse {
            approved: false,
            failure: Some(e.to_string()),
        },
    };
    info!(
        approved = response.approved,
        failure = response.failure.as_deref(),
        "evaluation served"
    );
    Json(response)
}
