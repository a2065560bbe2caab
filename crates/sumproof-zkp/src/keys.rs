//! # Key Material Manager
//!
//! Owns the process-wide proving/verifying key pair.
//!
//! ## Invariants
//!
//! - The backend's `compile` + `setup` run **at most once** per manager,
//!   no matter how many threads call [`KeyMaterialManager::key_material`]
//!   concurrently. Two setups would yield two incompatible key pairs and
//!   proofs produced under one would never verify under the other.
//! - Every caller blocks until setup resolves, then observes the same
//!   outcome: the same `Arc<KeyMaterial>` or an equal [`SetupError`].
//! - Failure is sticky. A failed (or panicked) setup is never retried;
//!   recovering requires a new process.
//! - Once published, key material is immutable and read without locking.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::OnceCell;
use sumproof_core::RelationDefinition;
use thiserror::Error;

use crate::traits::{BackendError, ProofBackend};

/// Setup failed; recorded once and returned to every later caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("key setup failed: {reason}")]
pub struct SetupError {
    reason: String,
}

impl SetupError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<BackendError> for SetupError {
    fn from(err: BackendError) -> Self {
        Self::new(err.to_string())
    }
}

/// Observable setup state, read without blocking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupStatus {
    /// No caller has needed keys yet.
    NotStarted,
    /// Setup is running; callers are waiting on it.
    InProgress,
    /// Keys are published.
    Ready,
    /// Setup failed with the given reason.
    Failed(String),
}

impl SetupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Ready => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

/// The compiled relation and the key pair generated for it.
pub struct KeyMaterial<B: ProofBackend> {
    constraint_system: B::ConstraintSystem,
    proving_key: B::ProvingKey,
    verifying_key: B::VerifyingKey,
}

impl<B: ProofBackend> KeyMaterial<B> {
    pub fn constraint_system(&self) -> &B::ConstraintSystem {
        &self.constraint_system
    }

    pub fn proving_key(&self) -> &B::ProvingKey {
        &self.proving_key
    }

    pub fn verifying_key(&self) -> &B::VerifyingKey {
        &self.verifying_key
    }
}

type SetupOutcome<B> = Result<Arc<KeyMaterial<B>>, SetupError>;

/// Runs setup exactly once and hands out the result.
pub struct KeyMaterialManager<B: ProofBackend> {
    backend: Arc<B>,
    relation: Arc<RelationDefinition>,
    started: AtomicBool,
    outcome: OnceCell<SetupOutcome<B>>,
}

impl<B: ProofBackend> KeyMaterialManager<B> {
    pub fn new(backend: Arc<B>, relation: Arc<RelationDefinition>) -> Self {
        Self {
            backend,
            relation,
            started: AtomicBool::new(false),
            outcome: OnceCell::new(),
        }
    }

    /// Make sure keys exist, running setup if this is the first call.
    pub fn ensure_ready(&self) -> Result<(), SetupError> {
        self.key_material().map(|_| ())
    }

    /// The published key material, running setup if this is the first call.
    ///
    /// Blocks while another thread is running setup.
    pub fn key_material(&self) -> Result<Arc<KeyMaterial<B>>, SetupError> {
        self.outcome.get_or_init(|| self.run_setup()).clone()
    }

    /// Current state without blocking or triggering setup.
    pub fn status(&self) -> SetupStatus {
        match self.outcome.get() {
            Some(Ok(_)) => SetupStatus::Ready,
            Some(Err(e)) => SetupStatus::Failed(e.reason().to_string()),
            None if self.started.load(Ordering::Acquire) => SetupStatus::InProgress,
            None => SetupStatus::NotStarted,
        }
    }

    fn run_setup(&self) -> SetupOutcome<B> {
        self.started.store(true, Ordering::Release);
        tracing::info!(
            backend = self.backend.name(),
            relation = self.relation.name(),
            fingerprint = self.relation.fingerprint(),
            "performing key setup"
        );
        let start = Instant::now();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.compile_and_setup()))
            .unwrap_or_else(|payload| {
                Err(SetupError::new(format!(
                    "backend panicked during setup: {}",
                    panic_message(payload.as_ref())
                )))
            });

        let elapsed = start.elapsed();
        metrics::histogram!("sumproof_setup_duration_seconds").record(elapsed.as_secs_f64());
        match &outcome {
            Ok(_) => {
                metrics::counter!("sumproof_setup_total", "outcome" => "ok").increment(1);
                tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "key setup complete");
            }
            Err(e) => {
                metrics::counter!("sumproof_setup_total", "outcome" => "failed").increment(1);
                tracing::error!(error = %e, "key setup failed; restart required to retry");
            }
        }
        outcome
    }

    fn compile_and_setup(&self) -> SetupOutcome<B> {
        let constraint_system = self.backend.compile(Arc::clone(&self.relation))?;
        let (proving_key, verifying_key) = self.backend.setup(&constraint_system)?;
        Ok(Arc::new(KeyMaterial {
            constraint_system,
            proving_key,
            verifying_key,
        }))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
