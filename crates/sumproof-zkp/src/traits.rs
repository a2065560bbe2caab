//! # Proof Backend Trait
//!
//! The boundary between the proof-service core and a concrete proof system.
//! The core never does curve arithmetic itself; it compiles a relation, runs
//! setup once, and then only calls `prove`, `verify` and the proof codec.
//!
//! ## Contract
//!
//! - `prove` MUST fail when the witness does not satisfy the relation. The
//!   service performs no satisfiability check of its own.
//! - `verify` returns `Ok(false)` for a well-formed proof that does not
//!   check out; `Err` is reserved for conditions the backend cannot
//!   evaluate at all (e.g. a public witness of the wrong width).
//! - `deserialize_proof` rejects anything that is not exactly one canonical
//!   proof encoding, including trailing bytes.
//! - Implementations are `Send + Sync`; key material is shared read-only
//!   across threads after setup.

use std::sync::Arc;

use sumproof_core::{FullWitness, PublicWitness, RelationDefinition};
use thiserror::Error;

/// Failure reported by a proof backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The relation could not be lowered to the backend's constraint system.
    #[error("relation compilation failed: {0}")]
    Compile(String),

    /// Key generation failed.
    #[error("key generation failed: {0}")]
    Setup(String),

    /// The witness does not satisfy the relation's constraints.
    #[error("witness does not satisfy relation `{0}`")]
    Unsatisfied(String),

    /// A witness or public input vector of the wrong width was supplied.
    #[error("expected {expected} values, got {actual}")]
    WitnessShape { expected: usize, actual: usize },

    /// Internal prover failure.
    #[error("prover error: {0}")]
    Prover(String),

    /// Internal verifier failure.
    #[error("verifier error: {0}")]
    Verifier(String),

    /// Proof encoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Bytes do not decode to a proof.
    #[error("malformed proof: {0}")]
    MalformedProof(String),
}

/// A proof system able to set up, prove and verify a [`RelationDefinition`].
pub trait ProofBackend: Send + Sync + 'static {
    /// The relation lowered into the backend's own representation.
    type ConstraintSystem: Send + Sync;
    /// Key used to produce proofs.
    type ProvingKey: Send + Sync;
    /// Key used to check proofs.
    type VerifyingKey: Send + Sync;
    /// The proof artifact.
    type Proof: Send;

    /// Short identifier for logs and health output.
    fn name(&self) -> &'static str;

    /// Lower `relation` into a constraint system.
    fn compile(
        &self,
        relation: Arc<RelationDefinition>,
    ) -> Result<Self::ConstraintSystem, BackendError>;

    /// Generate a key pair bound to `cs`.
    fn setup(
        &self,
        cs: &Self::ConstraintSystem,
    ) -> Result<(Self::ProvingKey, Self::VerifyingKey), BackendError>;

    /// Prove that `witness` satisfies `cs`.
    fn prove(
        &self,
        cs: &Self::ConstraintSystem,
        pk: &Self::ProvingKey,
        witness: &FullWitness,
    ) -> Result<Self::Proof, BackendError>;

    /// Check `proof` against the public witness.
    fn verify(
        &self,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public: &PublicWitness,
    ) -> Result<bool, BackendError>;

    /// Canonical byte encoding of `proof`.
    fn serialize_proof(&self, proof: &Self::Proof) -> Result<Vec<u8>, BackendError>;

    /// Inverse of [`serialize_proof`](Self::serialize_proof).
    fn deserialize_proof(&self, bytes: &[u8]) -> Result<Self::Proof, BackendError>;
}
