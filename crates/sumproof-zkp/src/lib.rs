//! # sumproof-zkp — Proof-Service Core
//!
//! Turns the addition relation from `sumproof-core` into proofs and
//! verdicts.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): [`ProofBackend`] is the only seam between
//!   the service and a proof system: compile, setup, prove, verify, and a
//!   canonical proof codec.
//!
//! - **Groth16** (`groth16.rs`): [`Groth16Backend`], arkworks Groth16 over
//!   BN254. 128-byte compressed proofs.
//!
//! - **Mock** (`mock.rs`, feature `mock`): [`MockBackend`], a transparent
//!   keyed-hash backend with the same algebraic contract and observable,
//!   injectable setup. Provides no privacy.
//!
//! - **Keys** (`keys.rs`): [`KeyMaterialManager`] runs setup exactly once
//!   per process and shares the outcome, success or sticky failure, with
//!   every caller.
//!
//! - **Service** (`service.rs`): [`ProofService`] wires it together;
//!   [`ProofOperations`] is its object-safe face for transports.
//!
//! ## Crate Policy
//!
//! - Depends on `sumproof-core` only internally.
//! - Never logs secret witness values.
//! - No `unsafe` code.

pub mod groth16;
pub mod keys;
#[cfg(feature = "mock")]
pub mod mock;
pub mod service;
pub mod traits;

pub use groth16::Groth16Backend;
pub use keys::{KeyMaterial, KeyMaterialManager, SetupError, SetupStatus};
#[cfg(feature = "mock")]
pub use mock::MockBackend;
pub use service::{GeneratedProof, ProofError, ProofOperations, ProofService};
pub use traits::{BackendError, ProofBackend};
