//! # Mock Backend
//!
//! A transparent proof backend honouring the same algebraic contract as
//! Groth16, for development and tests where real pairings are too slow or
//! where setup needs to be observed or made to fail.
//!
//! ## How It Works
//!
//! - `setup` draws a random 32-byte key shared by prover and verifier.
//! - `prove` evaluates the relation over the integers and refuses
//!   unsatisfied witnesses, then emits
//!   `SHA256(domain || key || fingerprint || nonce || public values)`
//!   under a fresh random nonce.
//! - `verify` recomputes the tag from the public witness.
//!
//! ## Security Warning
//!
//! **NOT ZERO-KNOWLEDGE AND NOT SOUND AGAINST KEY HOLDERS.** Anyone holding
//! the verifying key can forge proofs. Never expose this backend to
//! untrusted provers.
//!
//! ## Wire Format
//!
//! ```text
//! "SPMK" || version (1 byte) || nonce (16 bytes) || tag (32 bytes)
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use sumproof_core::{FullWitness, PublicWitness, RelationDefinition};

use crate::traits::{BackendError, ProofBackend};

const MAGIC: &[u8; 4] = b"SPMK";
const VERSION: u8 = 1;
const NONCE_LEN: usize = 16;
const TAG_LEN: usize = 32;
/// Encoded proof length.
pub const MOCK_PROOF_LEN: usize = MAGIC.len() + 1 + NONCE_LEN + TAG_LEN;
const TAG_DOMAIN: &[u8] = b"sumproof.mock.proof.v1";

/// The relation as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct MockConstraintSystem {
    relation: Arc<RelationDefinition>,
}

impl MockConstraintSystem {
    pub fn relation(&self) -> &RelationDefinition {
        &self.relation
    }
}

/// Shared secret for tagging; serves as both proving and verifying key.
#[derive(Clone)]
pub struct MockKey {
    secret: [u8; 32],
    fingerprint: String,
    public_count: usize,
}

impl MockKey {
    fn tag(&self, nonce: &[u8; NONCE_LEN], public: &[i64]) -> [u8; TAG_LEN] {
        let mut hasher = Sha256::new();
        hasher.update(TAG_DOMAIN);
        hasher.update(self.secret);
        hasher.update(self.fingerprint.as_bytes());
        hasher.update(nonce);
        for v in public {
            hasher.update(v.to_le_bytes());
        }
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&hasher.finalize());
        tag
    }
}

impl std::fmt::Debug for MockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockKey")
            .field("secret", &"[REDACTED]")
            .field("fingerprint", &self.fingerprint)
            .field("public_count", &self.public_count)
            .finish()
    }
}

/// A mock proof: a random nonce and the tag binding it to the public inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockProof {
    nonce: [u8; NONCE_LEN],
    tag: [u8; TAG_LEN],
}

/// Transparent backend with observable, optionally failing setup.
#[derive(Debug, Default)]
pub struct MockBackend {
    setup_calls: AtomicUsize,
    setup_failure: Option<String>,
    setup_delay: Option<Duration>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose setup always fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            setup_failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Sleep for `delay` inside setup, widening the window in which
    /// concurrent callers contend for initialization.
    pub fn with_setup_delay(mut self, delay: Duration) -> Self {
        self.setup_delay = Some(delay);
        self
    }

    /// How many times `setup` has been entered.
    pub fn setup_calls(&self) -> usize {
        self.setup_calls.load(Ordering::SeqCst)
    }
}

impl ProofBackend for MockBackend {
    type ConstraintSystem = MockConstraintSystem;
    type ProvingKey = MockKey;
    type VerifyingKey = MockKey;
    type Proof = MockProof;

    fn name(&self) -> &'static str {
        "mock"
    }

    fn compile(
        &self,
        relation: Arc<RelationDefinition>,
    ) -> Result<Self::ConstraintSystem, BackendError> {
        Ok(MockConstraintSystem { relation })
    }

    fn setup(
        &self,
        cs: &Self::ConstraintSystem,
    ) -> Result<(Self::ProvingKey, Self::VerifyingKey), BackendError> {
        self.setup_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.setup_delay {
            std::thread::sleep(delay);
        }
        if let Some(reason) = &self.setup_failure {
            return Err(BackendError::Setup(reason.clone()));
        }
        let key = MockKey {
            secret: rand::random(),
            fingerprint: cs.relation.fingerprint().to_string(),
            public_count: cs.relation.public_count(),
        };
        Ok((key.clone(), key))
    }

    fn prove(
        &self,
        cs: &Self::ConstraintSystem,
        pk: &Self::ProvingKey,
        witness: &FullWitness,
    ) -> Result<Self::Proof, BackendError> {
        if !cs.relation.is_satisfied_by(witness) {
            return Err(BackendError::Unsatisfied(cs.relation.name().to_string()));
        }
        let public = witness.public_projection(&cs.relation);
        let nonce: [u8; NONCE_LEN] = rand::random();
        Ok(MockProof {
            nonce,
            tag: pk.tag(&nonce, public.values()),
        })
    }

    fn verify(
        &self,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public: &PublicWitness,
    ) -> Result<bool, BackendError> {
        if public.values().len() != vk.public_count {
            return Err(BackendError::WitnessShape {
                expected: vk.public_count,
                actual: public.values().len(),
            });
        }
        let expected = vk.tag(&proof.nonce, public.values());
        Ok(bool::from(expected[..].ct_eq(&proof.tag[..])))
    }

    fn serialize_proof(&self, proof: &Self::Proof) -> Result<Vec<u8>, BackendError> {
        let mut bytes = Vec::with_capacity(MOCK_PROOF_LEN);
        bytes.extend_from_slice(MAGIC);
        bytes.push(VERSION);
        bytes.extend_from_slice(&proof.nonce);
        bytes.extend_from_slice(&proof.tag);
        Ok(bytes)
    }

    fn deserialize_proof(&self, bytes: &[u8]) -> Result<Self::Proof, BackendError> {
        if bytes.len() != MOCK_PROOF_LEN {
            return Err(BackendError::MalformedProof(format!(
                "expected {MOCK_PROOF_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let (magic, rest) = bytes.split_at(MAGIC.len());
        if magic != MAGIC {
            return Err(BackendError::MalformedProof("bad magic".into()));
        }
        let (version, rest) = rest.split_at(1);
        if version[0] != VERSION {
            return Err(BackendError::MalformedProof(format!(
                "unsupported version {}",
                version[0]
            )));
        }
        let (nonce, tag) = rest.split_at(NONCE_LEN);
        let nonce: [u8; NONCE_LEN] = nonce
            .try_into()
            .map_err(|_| BackendError::MalformedProof("truncated nonce".into()))?;
        let tag: [u8; TAG_LEN] = tag
            .try_into()
            .map_err(|_| BackendError::MalformedProof("truncated tag".into()))?;
        Ok(MockProof { nonce, tag })
    }
}
