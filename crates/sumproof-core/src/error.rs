//! # Error Types
//!
//! Errors raised while building relations and assigning witnesses. Both are
//! programmer-facing: the fixed addition relation never produces them, but
//! hand-built relations and malformed assignments do.

use thiserror::Error;

/// Error while building a [`RelationDefinition`](crate::RelationDefinition).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelationError {
    /// A relation or variable name was empty.
    #[error("names must not be empty")]
    EmptyName,

    /// The same variable name was declared twice.
    #[error("variable `{0}` declared more than once")]
    DuplicateVariable(String),

    /// A constraint referenced a variable that was never declared.
    #[error("constraint {constraint} references undeclared variable `{name}`")]
    UnknownVariable {
        /// Zero-based index of the offending constraint.
        constraint: usize,
        /// The undeclared name.
        name: String,
    },

    /// The relation declares no constraints, so every assignment satisfies it.
    #[error("relation `{0}` has no constraints")]
    NoConstraints(String),
}

/// Error while assigning values to a relation's variables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WitnessError {
    /// The assignment names a variable the relation does not declare.
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    /// A declared variable received no value.
    #[error("missing assignment for variable `{0}`")]
    MissingAssignment(String),

    /// The same variable was assigned twice.
    #[error("variable `{0}` assigned more than once")]
    DuplicateAssignment(String),

    /// A secret variable was supplied to a public witness.
    #[error("secret variable `{0}` cannot appear in a public witness")]
    SecretInPublicWitness(String),
}
