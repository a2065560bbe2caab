//! # Groth16 Backend (arkworks, BN254)
//!
//! Lowers a [`RelationDefinition`] into an R1CS circuit with `ark-r1cs-std`
//! field variables and proves it with `ark-groth16` over BN254.
//!
//! ## Circuit Shape
//!
//! Every relation variable becomes one `FpVar`: public variables are
//! allocated as instance inputs, secret ones as witnesses, both in
//! declaration order. Each constraint `lhs == rhs` becomes a single
//! `enforce_equal` over the two linear combinations. Integer values map into
//! the scalar field with their sign (`-1` is `p - 1`).
//!
//! ## Properties
//!
//! - **Proof size:** 128 bytes compressed (two G1 points, one G2 point).
//! - **Verification:** three pairings against a prepared verifying key.
//! - **Trusted setup:** circuit-specific, generated in-process with
//!   `thread_rng`; the toxic waste is dropped with the setup stack frame.
//!
//! ## Unsatisfied Witnesses
//!
//! arkworks only debug-asserts satisfiability while proving; a release
//! build would emit a proof that merely fails verification. [`prove`]
//! therefore synthesizes the assignment first and refuses unsatisfied
//! witnesses with [`BackendError::Unsatisfied`].
//!
//! [`prove`]: Groth16Backend::prove

use std::sync::Arc;

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, PreparedVerifyingKey, Proof, ProvingKey, VerifyingKey};
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystem, ConstraintSystemRef, SynthesisError, SynthesisMode,
};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use sumproof_core::{FullWitness, LinearCombination, PublicWitness, RelationDefinition};

use crate::traits::{BackendError, ProofBackend};

/// A relation as an arkworks constraint synthesizer.
///
/// `assignment` is `None` during setup and holds one value per relation
/// variable (declaration order) while proving.
#[derive(Clone)]
struct RelationCircuit {
    relation: Arc<RelationDefinition>,
    assignment: Option<Vec<i64>>,
}

impl ConstraintSynthesizer<Fr> for RelationCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let assignment = self.assignment.as_deref();
        let vars = self
            .relation
            .variables()
            .iter()
            .enumerate()
            .map(|(i, var)| {
                let value = || {
                    assignment
                        .and_then(|values| values.get(i))
                        .map(|v| Fr::from(*v))
                        .ok_or(SynthesisError::AssignmentMissing)
                };
                if var.is_public() {
                    FpVar::new_input(cs.clone(), value)
                } else {
                    FpVar::new_witness(cs.clone(), value)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        for constraint in self.relation.constraints() {
            let lhs = linear_combination(constraint.lhs(), &vars)?;
            let rhs = linear_combination(constraint.rhs(), &vars)?;
            lhs.enforce_equal(&rhs)?;
        }
        Ok(())
    }
}

fn linear_combination(
    lc: &LinearCombination,
    vars: &[FpVar<Fr>],
) -> Result<FpVar<Fr>, SynthesisError> {
    let mut acc = FpVar::Constant(Fr::from(lc.constant()));
    for term in lc.terms() {
        let var = vars
            .get(term.variable.index())
            .ok_or(SynthesisError::AssignmentMissing)?;
        acc += var * Fr::from(term.coefficient);
    }
    Ok(acc)
}

/// A relation compiled for Groth16, with the size of its R1CS.
#[derive(Debug, Clone)]
pub struct CompiledRelation {
    relation: Arc<RelationDefinition>,
    num_constraints: usize,
    num_public_inputs: usize,
    num_witness_variables: usize,
}

impl CompiledRelation {
    pub fn relation(&self) -> &RelationDefinition {
        &self.relation
    }

    pub fn num_constraints(&self) -> usize {
        self.num_constraints
    }

    /// Instance variables excluding the constant `1`.
    pub fn num_public_inputs(&self) -> usize {
        self.num_public_inputs
    }

    pub fn num_witness_variables(&self) -> usize {
        self.num_witness_variables
    }

    fn circuit(&self, assignment: Option<Vec<i64>>) -> RelationCircuit {
        RelationCircuit {
            relation: Arc::clone(&self.relation),
            assignment,
        }
    }
}

/// Groth16 verifying key together with its pairing-prepared form.
pub struct Groth16VerifyingKey {
    key: VerifyingKey<Bn254>,
    prepared: PreparedVerifyingKey<Bn254>,
}

impl Groth16VerifyingKey {
    pub fn key(&self) -> &VerifyingKey<Bn254> {
        &self.key
    }

    /// Number of public inputs this key expects.
    pub fn public_input_count(&self) -> usize {
        self.key.gamma_abc_g1.len().saturating_sub(1)
    }
}

/// Groth16 over BN254.
#[derive(Debug, Default, Clone, Copy)]
pub struct Groth16Backend;

impl Groth16Backend {
    pub fn new() -> Self {
        Self
    }
}

impl ProofBackend for Groth16Backend {
    type ConstraintSystem = CompiledRelation;
    type ProvingKey = ProvingKey<Bn254>;
    type VerifyingKey = Groth16VerifyingKey;
    type Proof = Proof<Bn254>;

    fn name(&self) -> &'static str {
        "groth16-bn254"
    }

    fn compile(
        &self,
        relation: Arc<RelationDefinition>,
    ) -> Result<Self::ConstraintSystem, BackendError> {
        let cs = ConstraintSystem::<Fr>::new_ref();
        cs.set_mode(SynthesisMode::Setup);
        RelationCircuit {
            relation: Arc::clone(&relation),
            assignment: None,
        }
        .generate_constraints(cs.clone())
        .map_err(|e| BackendError::Compile(e.to_string()))?;

        let compiled = CompiledRelation {
            relation,
            num_constraints: cs.num_constraints(),
            num_public_inputs: cs.num_instance_variables().saturating_sub(1),
            num_witness_variables: cs.num_witness_variables(),
        };
        tracing::debug!(
            relation = compiled.relation.name(),
            constraints = compiled.num_constraints,
            public_inputs = compiled.num_public_inputs,
            witnesses = compiled.num_witness_variables,
            "compiled relation to R1CS"
        );
        Ok(compiled)
    }

    fn setup(
        &self,
        cs: &Self::ConstraintSystem,
    ) -> Result<(Self::ProvingKey, Self::VerifyingKey), BackendError> {
        let mut rng = rand::thread_rng();
        let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(cs.circuit(None), &mut rng)
            .map_err(|e| BackendError::Setup(e.to_string()))?;
        let prepared =
            Groth16::<Bn254>::process_vk(&vk).map_err(|e| BackendError::Setup(e.to_string()))?;
        Ok((pk, Groth16VerifyingKey { key: vk, prepared }))
    }

    fn prove(
        &self,
        cs: &Self::ConstraintSystem,
        pk: &Self::ProvingKey,
        witness: &FullWitness,
    ) -> Result<Self::Proof, BackendError> {
        let expected = cs.relation.variables().len();
        if witness.values().len() != expected {
            return Err(BackendError::WitnessShape {
                expected,
                actual: witness.values().len(),
            });
        }
        let circuit = cs.circuit(Some(witness.values().to_vec()));

        let check = ConstraintSystem::<Fr>::new_ref();
        circuit
            .clone()
            .generate_constraints(check.clone())
            .map_err(|e| BackendError::Prover(e.to_string()))?;
        let satisfied = check
            .is_satisfied()
            .map_err(|e| BackendError::Prover(e.to_string()))?;
        if !satisfied {
            return Err(BackendError::Unsatisfied(cs.relation.name().to_string()));
        }

        let mut rng = rand::thread_rng();
        Groth16::<Bn254>::prove(pk, circuit, &mut rng)
            .map_err(|e| BackendError::Prover(e.to_string()))
    }

    fn verify(
        &self,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public: &PublicWitness,
    ) -> Result<bool, BackendError> {
        let expected = vk.public_input_count();
        if public.values().len() != expected {
            return Err(BackendError::WitnessShape {
                expected,
                actual: public.values().len(),
            });
        }
        let inputs: Vec<Fr> = public.values().iter().map(|v| Fr::from(*v)).collect();
        Groth16::<Bn254>::verify_with_processed_vk(&vk.prepared, &inputs, proof)
            .map_err(|e| BackendError::Verifier(e.to_string()))
    }

    fn serialize_proof(&self, proof: &Self::Proof) -> Result<Vec<u8>, BackendError> {
        let mut bytes = Vec::with_capacity(proof.compressed_size());
        proof
            .serialize_compressed(&mut bytes)
            .map_err(|e| BackendError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    fn deserialize_proof(&self, bytes: &[u8]) -> Result<Self::Proof, BackendError> {
        let mut reader = bytes;
        let proof = Proof::<Bn254>::deserialize_compressed(&mut reader)
            .map_err(|e| BackendError::MalformedProof(e.to_string()))?;
        if !reader.is_empty() {
            return Err(BackendError::MalformedProof(format!(
                "{} trailing bytes after proof",
                reader.len()
            )));
        }
        Ok(proof)
    }
}
