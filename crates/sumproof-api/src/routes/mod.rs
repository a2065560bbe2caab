//! # API Route Modules
//!
//! - `proof` — proof generation and verification.
//! - `health` — liveness, readiness, and the static `/health` payload.

pub mod health;
pub mod proof;

use sumproof_zkp::ProofError;

use crate::error::AppError;

/// Run a proof-service call on the blocking pool.
///
/// Setup, proving and verification are CPU-bound and setup blocks every
/// waiter until it resolves, so none of them may run on an async worker.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, ProofError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("blocking task failed: {e}")))?
        .map_err(AppError::from)
}
