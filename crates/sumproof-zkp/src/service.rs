//! # Proof Service
//!
//! The generate and verify workflows over the addition relation.
//!
//! - **Generate:** key material → full witness `A=a, B=b, Sum=sum` →
//!   backend `prove` → canonical bytes. The service never checks
//!   `a + b == sum` itself; an unsatisfied witness surfaces as
//!   [`ProofError::ProveFailed`] from the backend.
//! - **Verify:** key material → decode bytes → public witness `Sum=sum` →
//!   backend `verify`. An invalid proof is `Ok(false)`, never an error.
//!
//! Both paths block on first use while key setup runs and are CPU-bound;
//! async callers should run them on a blocking thread.

use std::sync::Arc;

use sumproof_core::addition::{self, addition_relation};
use sumproof_core::RelationDefinition;
use thiserror::Error;

use crate::keys::{KeyMaterialManager, SetupError, SetupStatus};
use crate::traits::ProofBackend;

/// Failure of a generate or verify call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// Key setup failed (sticky until restart).
    #[error(transparent)]
    SetupUnavailable(#[from] SetupError),

    /// The backend could not produce a proof. Covers both an unsatisfied
    /// witness and an internal prover fault.
    #[error("proof generation failed: {0}")]
    ProveFailed(String),

    /// The supplied bytes are not a well-formed proof.
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// A generated proof could not be encoded.
    #[error("proof serialization failed: {0}")]
    SerializationFailed(String),

    /// Invariant violation inside the service.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A proof together with the public sum it attests to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProof {
    pub proof: Vec<u8>,
    pub sum: i64,
}

/// Generate/verify over one backend and one lazily-built key pair.
pub struct ProofService<B: ProofBackend> {
    backend: Arc<B>,
    relation: Arc<RelationDefinition>,
    keys: KeyMaterialManager<B>,
}

impl<B: ProofBackend> ProofService<B> {
    /// Service for the addition relation. Setup is deferred to first use.
    pub fn new(backend: B) -> Self {
        let backend = Arc::new(backend);
        let relation = Arc::new(addition_relation());
        let keys = KeyMaterialManager::new(Arc::clone(&backend), Arc::clone(&relation));
        Self {
            backend,
            relation,
            keys,
        }
    }

    pub fn keys(&self) -> &KeyMaterialManager<B> {
        &self.keys
    }

    pub fn relation(&self) -> &RelationDefinition {
        &self.relation
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Prove knowledge of `a`, `b` with `a + b == sum`.
    pub fn generate_proof(&self, a: i64, b: i64, sum: i64) -> Result<GeneratedProof, ProofError> {
        let keys = self.keys.key_material()?;
        let witness = addition::full_witness(&self.relation, a, b, sum)
            .map_err(|e| ProofError::Internal(e.to_string()))?;

        let proof = self
            .backend
            .prove(keys.constraint_system(), keys.proving_key(), &witness)
            .map_err(|e| {
                metrics::counter!("sumproof_proof_failures_total").increment(1);
                tracing::warn!(sum, error = %e, "proof generation failed");
                ProofError::ProveFailed(e.to_string())
            })?;

        let bytes = self.backend.serialize_proof(&proof).map_err(|e| {
            tracing::error!(error = %e, "proof serialization failed");
            ProofError::SerializationFailed(e.to_string())
        })?;

        metrics::counter!("sumproof_proofs_generated_total").increment(1);
        tracing::debug!(sum, bytes = bytes.len(), "proof generated");
        Ok(GeneratedProof { proof: bytes, sum })
    }

    /// Check `proof` against the public `sum`.
    pub fn verify_proof(&self, proof: &[u8], sum: i64) -> Result<bool, ProofError> {
        let keys = self.keys.key_material()?;
        let proof = self.backend.deserialize_proof(proof).map_err(|e| {
            metrics::counter!("sumproof_verifications_total", "outcome" => "malformed")
                .increment(1);
            ProofError::MalformedProof(e.to_string())
        })?;
        let public = addition::public_witness(&self.relation, sum)
            .map_err(|e| ProofError::Internal(e.to_string()))?;

        let valid = match self.backend.verify(keys.verifying_key(), &proof, &public) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!(sum, error = %e, "verifier error; reporting proof as invalid");
                false
            }
        };

        let outcome = if valid { "valid" } else { "invalid" };
        metrics::counter!("sumproof_verifications_total", "outcome" => outcome).increment(1);
        tracing::debug!(sum, valid, "proof verified");
        Ok(valid)
    }
}

/// Object-safe view of a [`ProofService`], so transports can hold any
/// backend behind one type.
pub trait ProofOperations: Send + Sync {
    fn generate_proof(&self, a: i64, b: i64, sum: i64) -> Result<GeneratedProof, ProofError>;
    fn verify_proof(&self, proof: &[u8], sum: i64) -> Result<bool, ProofError>;
    fn ensure_ready(&self) -> Result<(), SetupError>;
    fn setup_status(&self) -> SetupStatus;
    fn backend_name(&self) -> &'static str;
    fn relation(&self) -> &RelationDefinition;
}

impl<B: ProofBackend> ProofOperations for ProofService<B> {
    fn generate_proof(&self, a: i64, b: i64, sum: i64) -> Result<GeneratedProof, ProofError> {
        ProofService::generate_proof(self, a, b, sum)
    }

    fn verify_proof(&self, proof: &[u8], sum: i64) -> Result<bool, ProofError> {
        ProofService::verify_proof(self, proof, sum)
    }

    fn ensure_ready(&self) -> Result<(), SetupError> {
        self.keys.ensure_ready()
    }

    fn setup_status(&self) -> SetupStatus {
        self.keys.status()
    }

    fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    fn relation(&self) -> &RelationDefinition {
        &self.relation
    }
}
