//! # Health Routes
//!
//! - `GET /health` — static payload kept for existing clients.
//! - `GET /health/liveness` — 200 while the process runs.
//! - `GET /health/readiness` — key setup state; 503 once setup has failed.
//!
//! None of these trigger key setup.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use sumproof_zkp::SetupStatus;
use utoipa::ToSchema;

use crate::state::AppState;

/// Build the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
}

/// Static service health payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Key setup state and the relation being proven.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    /// One of `not_started`, `in_progress`, `ready`, `failed`.
    pub status: String,
    pub backend: String,
    pub relation: String,
    /// Hex SHA-256 fingerprint of the relation.
    pub fingerprint: String,
    /// Setup failure reason, when failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /health — Static health payload.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "zkp-api".to_string(),
    })
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// GET /health/readiness — Key setup state.
///
/// Not-yet-run setup still counts as ready: the first request runs it.
#[utoipa::path(
    get,
    path = "/health/readiness",
    responses(
        (status = 200, description = "Setup pending or complete", body = ReadinessResponse),
        (status = 503, description = "Setup failed; restart required", body = ReadinessResponse),
    ),
    tag = "health"
)]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let status = state.service.setup_status();
    let relation = state.service.relation();
    let (code, error) = match &status {
        SetupStatus::Failed(reason) => (StatusCode::SERVICE_UNAVAILABLE, Some(reason.clone())),
        _ => (StatusCode::OK, None),
    };
    (
        code,
        Json(ReadinessResponse {
            status: status.as_str().to_string(),
            backend: state.service.backend_name().to_string(),
            relation: relation.name().to_string(),
            fingerprint: relation.fingerprint().to_string(),
            error,
        }),
    )
}
