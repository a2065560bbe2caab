//! # Proof Routes
//!
//! `POST /api/proof/generate` and `POST /api/proof/verify`.
//!
//! Proof bytes travel as standard padded base64, the encoding Go's
//! `encoding/json` gives `[]byte`, so existing clients keep working.
//! Secret addends are never logged; only the public sum is.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sumproof_zkp::ProofError;
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::extractors::extract_json;
use crate::routes::run_blocking;
use crate::state::AppState;

pub const GENERATED_MESSAGE: &str = "Proof generated successfully. This proves you know two numbers that add up to the sum, without revealing the numbers themselves!";
pub const VALID_MESSAGE: &str =
    "Proof is valid! The prover knows two numbers that add up to the sum (without revealing them).";
pub const INVALID_MESSAGE: &str =
    "Proof is invalid. The prover does not know valid numbers that add up to the given sum.";

/// Build the proof router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/proof/generate", post(generate_proof))
        .route("/api/proof/verify", post(verify_proof))
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to prove knowledge of `a` and `b` summing to `sum`.
#[derive(Deserialize, ToSchema)]
pub struct ProofRequest {
    /// First secret number.
    pub a: i64,
    /// Second secret number.
    pub b: i64,
    /// Public sum.
    pub sum: i64,
}

impl std::fmt::Debug for ProofRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofRequest")
            .field("a", &"[REDACTED]")
            .field("b", &"[REDACTED]")
            .field("sum", &self.sum)
            .finish()
    }
}

/// A generated proof.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProofResponse {
    /// Serialized proof, base64.
    #[serde(with = "base64_bytes")]
    #[schema(value_type = String, format = Byte)]
    pub proof: Vec<u8>,
    /// The public sum the proof attests to.
    pub sum: i64,
    pub message: String,
}

/// Request to check a proof against a claimed sum.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyRequest {
    /// Serialized proof, base64.
    #[serde(with = "base64_bytes")]
    #[schema(value_type = String, format = Byte)]
    pub proof: Vec<u8>,
    /// The claimed sum.
    pub sum: i64,
}

/// Verification verdict. Returned with 200 whether or not the proof holds.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponse {
    pub valid: bool,
    pub message: String,
}

/// Standard padded base64 for byte fields.
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| serde::de::Error::custom(format!("proof is not valid base64: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Run key setup (or observe its recorded outcome) before anything else.
/// A setup failure outranks a malformed body, and a malformed first
/// request still triggers setup.
async fn ensure_keys(state: &AppState) -> Result<(), AppError> {
    let service = Arc::clone(&state.service);
    run_blocking(move || service.ensure_ready().map_err(ProofError::from)).await
}

/// POST /api/proof/generate — Prove that two secret numbers add up to `sum`.
#[utoipa::path(
    post,
    path = "/api/proof/generate",
    request_body = ProofRequest,
    responses(
        (status = 200, description = "Proof generated", body = ProofResponse),
        (status = 400, description = "Malformed request body", body = ErrorBody),
        (status = 500, description = "Setup, proving or serialization failed", body = ErrorBody),
    ),
    tag = "proof"
)]
pub async fn generate_proof(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ProofResponse>, AppError> {
    ensure_keys(&state).await?;
    let req: ProofRequest = extract_json(body)?;
    tracing::info!(sum = req.sum, "generating proof");

    let service = Arc::clone(&state.service);
    let generated = run_blocking(move || service.generate_proof(req.a, req.b, req.sum)).await?;

    tracing::info!(sum = generated.sum, bytes = generated.proof.len(), "proof generated");
    Ok(Json(ProofResponse {
        proof: generated.proof,
        sum: generated.sum,
        message: GENERATED_MESSAGE.to_string(),
    }))
}

/// POST /api/proof/verify — Check a proof against a claimed sum.
#[utoipa::path(
    post,
    path = "/api/proof/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verdict, valid or not", body = VerifyResponse),
        (status = 400, description = "Malformed body, bad base64, or malformed proof", body = ErrorBody),
        (status = 500, description = "Setup failed", body = ErrorBody),
    ),
    tag = "proof"
)]
pub async fn verify_proof(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<VerifyResponse>, AppError> {
    ensure_keys(&state).await?;
    let req: VerifyRequest = extract_json(body)?;
    tracing::info!(sum = req.sum, "verifying proof");

    let service = Arc::clone(&state.service);
    let sum = req.sum;
    let valid = run_blocking(move || service.verify_proof(&req.proof, sum)).await?;

    tracing::info!(sum, valid, "proof verification complete");
    let message = if valid { VALID_MESSAGE } else { INVALID_MESSAGE };
    Ok(Json(VerifyResponse {
        valid,
        message: message.to_string(),
    }))
}
