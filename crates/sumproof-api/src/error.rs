//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps proof-service errors to HTTP status codes with a JSON body of
//! `{"error": "<message>", "code": "<CODE>"}`. `error` carries the message
//! string existing clients read; `code` is machine-readable. Internal
//! details are logged, never returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use sumproof_zkp::ProofError;
use thiserror::Error;
use utoipa::ToSchema;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
    /// Machine-readable error code (e.g. "BAD_REQUEST", "SETUP_FAILED").
    pub code: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body could not be parsed, or proof bytes are malformed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Key setup failed; sticky until restart (500).
    #[error("setup failed: {0}")]
    SetupFailed(String),

    /// Proof could not be generated (500).
    #[error("failed to generate proof: {0}")]
    ProofGeneration(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),

    /// Dependency not ready (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::SetupFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SETUP_FAILED"),
            Self::ProofGeneration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PROOF_GENERATION_FAILED"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        }
    }

    /// Client-facing message. Server-side failures get a fixed message.
    fn public_message(&self) -> String {
        match self {
            Self::BadRequest(m) | Self::ServiceUnavailable(m) => m.clone(),
            Self::SetupFailed(_) => "Setup failed".to_string(),
            Self::ProofGeneration(_) => "Failed to generate proof".to_string(),
            Self::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorBody {
            error: self.public_message(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ProofError> for AppError {
    fn from(err: ProofError) -> Self {
        match err {
            ProofError::SetupUnavailable(e) => Self::SetupFailed(e.reason().to_string()),
            ProofError::ProveFailed(m) => Self::ProofGeneration(m),
            ProofError::MalformedProof(_) => Self::BadRequest("Invalid proof format".to_string()),
            ProofError::SerializationFailed(m) => {
                Self::Internal(format!("proof serialization failed: {m}"))
            }
            ProofError::Internal(m) => Self::Internal(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use sumproof_zkp::SetupError;

    #[test]
    fn status_codes() {
        let cases = [
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            (
                AppError::SetupFailed("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "SETUP_FAILED",
            ),
            (
                AppError::ProofGeneration("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "PROOF_GENERATION_FAILED",
            ),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
            (
                AppError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
            ),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_and_code(), (status, code));
        }
    }

    #[test]
    fn proof_errors_map_to_app_errors() {
        let setup = AppError::from(ProofError::SetupUnavailable(SetupError::new("rng")));
        assert!(matches!(setup, AppError::SetupFailed(ref r) if r == "rng"));
        assert!(matches!(
            AppError::from(ProofError::ProveFailed("unsatisfied".into())),
            AppError::ProofGeneration(_)
        ));
        assert!(matches!(
            AppError::from(ProofError::MalformedProof("short".into())),
            AppError::BadRequest(_)
        ));
        assert!(matches!(
            AppError::from(ProofError::SerializationFailed("io".into())),
            AppError::Internal(_)
        ));
    }

    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn bad_request_message_is_sent_verbatim() {
        let (status, body) = response_parts(AppError::BadRequest("Invalid proof format".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "BAD_REQUEST");
        assert_eq!(body.error, "Invalid proof format");
    }

    #[tokio::test]
    async fn error_field_is_a_plain_string() {
        let response = AppError::BadRequest("Invalid request body".into()).into_response();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": "Invalid request body", "code": "BAD_REQUEST"})
        );
    }

    #[tokio::test]
    async fn server_errors_hide_detail() {
        let (status, body) =
            response_parts(AppError::ProofGeneration("witness does not satisfy".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Failed to generate proof");

        let (_, body) = response_parts(AppError::Internal("panic in pairing".into())).await;
        assert!(!body.error.contains("pairing"));

        let (_, body) = response_parts(AppError::SetupFailed("rng".into())).await;
        assert_eq!(body.error, "Setup failed");
    }
}
