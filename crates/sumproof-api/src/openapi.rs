//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "sumproof API",
        version = "0.1.0",
        description = "Zero-knowledge proofs that two secret numbers add up to a public sum (Groth16, BN254).",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::proof::generate_proof,
        crate::routes::proof::verify_proof,
        crate::routes::health::health,
        crate::routes::health::readiness,
    ),
    components(schemas(
        crate::routes::proof::ProofRequest,
        crate::routes::proof::ProofResponse,
        crate::routes::proof::VerifyRequest,
        crate::routes::proof::VerifyResponse,
        crate::routes::health::HealthResponse,
        crate::routes::health::ReadinessResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "proof", description = "Proof generation and verification"),
        (name = "health", description = "Health probes"),
    )
)]
pub struct ApiDoc;

/// Router serving the OpenAPI JSON document.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
