//! # sumproof-core — Relations and Witnesses
//!
//! Leaf crate of the sumproof workspace. Describes *what* is proven, never
//! *how*: a relation is plain data (named variables tagged secret or public,
//! plus equality constraints between linear expressions), and a witness is a
//! concrete integer assignment to those variables.
//!
//! ## Key Design Principles
//!
//! 1. **Relations are immutable data.** A [`RelationDefinition`] can only be
//!    obtained through [`RelationBuilder::build`] (which validates every
//!    variable reference) or the fixed [`addition::addition_relation`].
//!    There are no public mutable fields.
//!
//! 2. **Public witnesses cannot carry secrets.** [`PublicWitness::new`]
//!    rejects secret variable names, and projection from a [`FullWitness`]
//!    drops every secret value. The verify path is built on
//!    [`PublicWitness`] alone.
//!
//! 3. **Witness values stay out of logs.** `Debug` on [`FullWitness`] prints
//!    the number of assigned variables, not their values.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sumproof-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod addition;
pub mod error;
pub mod relation;
pub mod witness;

pub use addition::addition_relation;
pub use error::{RelationError, WitnessError};
pub use relation::{
    Constraint, Expr, LinearCombination, RelationBuilder, RelationDefinition, Term, Variable,
    VariableId, Visibility,
};
pub use witness::{FullWitness, PublicWitness};
