//! # Relation Definition
//!
//! A relation is the arithmetic statement a prover claims to satisfy. It is
//! described entirely as data:
//!
//! - an ordered list of named [`Variable`]s, each [`Visibility::Secret`] or
//!   [`Visibility::Public`];
//! - a list of [`Constraint`]s, each asserting `lhs == rhs` for two
//!   [`LinearCombination`]s over those variables.
//!
//! Backends compile this description into their own constraint systems. The
//! declaration order of variables is significant: public variables are
//! bound as proof inputs in that order, and the [`fingerprint`] covers it.
//!
//! [`fingerprint`]: RelationDefinition::fingerprint

use std::collections::HashMap;
use std::ops::{Add, Mul, Sub};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::RelationError;
use crate::witness::FullWitness;

/// Domain separator for relation fingerprints.
const FINGERPRINT_DOMAIN: &[u8] = b"sumproof.relation.v1";

/// Whether a variable is known only to the prover or disclosed to everyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Known only to the prover; never leaves the proving side.
    Secret,
    /// Disclosed to the verifier as part of the public witness.
    Public,
}

impl Visibility {
    fn tag(self) -> u8 {
        match self {
            Self::Secret => 0,
            Self::Public => 1,
        }
    }
}

/// Position of a variable in its relation's declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct VariableId(pub(crate) usize);

impl VariableId {
    /// Zero-based declaration index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named relation variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    name: String,
    visibility: Visibility,
}

impl Variable {
    pub(crate) fn new(name: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            visibility,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

// -- Builder-level expressions ------------------------------------------------

/// A linear expression over variable *names*, used while building a relation.
///
/// ```
/// use sumproof_core::Expr;
///
/// let lhs = Expr::var("A") + Expr::var("B");
/// let rhs = Expr::var("Sum") * 1 + Expr::constant(0);
/// # let _ = (lhs, rhs);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expr {
    terms: Vec<(i128, String)>,
    constant: i128,
}

impl Expr {
    /// A single variable with coefficient one.
    pub fn var(name: impl Into<String>) -> Self {
        Self {
            terms: vec![(1, name.into())],
            constant: 0,
        }
    }

    /// A constant with no variable terms.
    pub fn constant(value: i64) -> Self {
        Self {
            terms: Vec::new(),
            constant: i128::from(value),
        }
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(mut self, rhs: Expr) -> Expr {
        self.terms.extend(rhs.terms);
        self.constant = self.constant.saturating_add(rhs.constant);
        self
    }
}

impl Mul<i64> for Expr {
    type Output = Expr;

    fn mul(self, k: i64) -> Expr {
        let k = i128::from(k);
        Expr {
            terms: self
                .terms
                .into_iter()
                .map(|(c, name)| (c.saturating_mul(k), name))
                .collect(),
            constant: self.constant.saturating_mul(k),
        }
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        self + rhs * -1
    }
}

// -- Resolved form ------------------------------------------------------------

/// `coefficient * variable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Term {
    pub coefficient: i128,
    pub variable: VariableId,
}

/// `sum(terms) + constant`, with every variable resolved to its [`VariableId`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinearCombination {
    terms: Vec<Term>,
    constant: i128,
}

impl LinearCombination {
    pub(crate) fn new(terms: Vec<Term>, constant: i128) -> Self {
        Self { terms, constant }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn constant(&self) -> i128 {
        self.constant
    }

    /// Evaluate over the integers, indexing `values` by [`VariableId`].
    ///
    /// Returns `None` on overflow or when a term's variable has no value.
    pub fn evaluate(&self, values: &[i64]) -> Option<i128> {
        self.terms.iter().try_fold(self.constant, |acc, term| {
            let value = i128::from(*values.get(term.variable.index())?);
            acc.checked_add(term.coefficient.checked_mul(value)?)
        })
    }

    fn absorb_into(&self, hasher: &mut Sha256) {
        hasher.update((self.terms.len() as u64).to_le_bytes());
        for term in &self.terms {
            hasher.update(term.coefficient.to_le_bytes());
            hasher.update((term.variable.index() as u64).to_le_bytes());
        }
        hasher.update(self.constant.to_le_bytes());
    }
}

/// The equality `lhs == rhs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constraint {
    lhs: LinearCombination,
    rhs: LinearCombination,
}

impl Constraint {
    pub(crate) fn new(lhs: LinearCombination, rhs: LinearCombination) -> Self {
        Self { lhs, rhs }
    }

    pub fn lhs(&self) -> &LinearCombination {
        &self.lhs
    }

    pub fn rhs(&self) -> &LinearCombination {
        &self.rhs
    }

    /// Integer evaluation; overflow counts as unsatisfied.
    pub fn is_satisfied(&self, values: &[i64]) -> bool {
        match (self.lhs.evaluate(values), self.rhs.evaluate(values)) {
            (Some(l), Some(r)) => l == r,
            _ => false,
        }
    }
}

// -- Relation -----------------------------------------------------------------

/// An immutable, validated relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationDefinition {
    name: String,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    fingerprint: String,
}

impl RelationDefinition {
    /// Assemble a relation whose references are already known to be valid.
    pub(crate) fn from_parts(
        name: String,
        variables: Vec<Variable>,
        constraints: Vec<Constraint>,
    ) -> Self {
        let fingerprint = compute_fingerprint(&name, &variables, &constraints);
        Self {
            name,
            variables,
            constraints,
            fingerprint,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn variable(&self, id: VariableId) -> Option<&Variable> {
        self.variables.get(id.index())
    }

    /// Look up a variable by name.
    pub fn id_of(&self, name: &str) -> Option<VariableId> {
        self.variables
            .iter()
            .position(|v| v.name == name)
            .map(VariableId)
    }

    /// Public variables in declaration order.
    pub fn public_variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> + '_ {
        self.variables
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_public())
            .map(|(i, v)| (VariableId(i), v))
    }

    pub fn public_count(&self) -> usize {
        self.variables.iter().filter(|v| v.is_public()).count()
    }

    /// Hex SHA-256 over the relation's name, variables (with visibility and
    /// order) and constraints. Two relations compile to the same constraint
    /// system iff their fingerprints match.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Evaluate every constraint over the integers.
    ///
    /// Backends without their own satisfiability check use this before
    /// producing a proof. A witness built for a different relation shape is
    /// never satisfying.
    pub fn is_satisfied_by(&self, witness: &FullWitness) -> bool {
        let values = witness.values();
        values.len() == self.variables.len()
            && self.constraints.iter().all(|c| c.is_satisfied(values))
    }
}

fn compute_fingerprint(name: &str, variables: &[Variable], constraints: &[Constraint]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(FINGERPRINT_DOMAIN);
    hasher.update((name.len() as u64).to_le_bytes());
    hasher.update(name.as_bytes());
    hasher.update((variables.len() as u64).to_le_bytes());
    for v in variables {
        hasher.update((v.name.len() as u64).to_le_bytes());
        hasher.update(v.name.as_bytes());
        hasher.update([v.visibility.tag()]);
    }
    hasher.update((constraints.len() as u64).to_le_bytes());
    for c in constraints {
        c.lhs.absorb_into(&mut hasher);
        c.rhs.absorb_into(&mut hasher);
    }
    hex::encode(hasher.finalize())
}

// -- Builder ------------------------------------------------------------------

/// Validating builder for [`RelationDefinition`].
#[derive(Debug, Clone)]
pub struct RelationBuilder {
    name: String,
    variables: Vec<Variable>,
    constraints: Vec<(Expr, Expr)>,
}

impl RelationBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Declare a secret variable.
    pub fn secret(mut self, name: impl Into<String>) -> Self {
        self.variables.push(Variable::new(name, Visibility::Secret));
        self
    }

    /// Declare a public variable.
    pub fn public(mut self, name: impl Into<String>) -> Self {
        self.variables.push(Variable::new(name, Visibility::Public));
        self
    }

    /// Add the constraint `lhs == rhs`.
    pub fn constrain_eq(mut self, lhs: Expr, rhs: Expr) -> Self {
        self.constraints.push((lhs, rhs));
        self
    }

    /// Validate names and references, then freeze the relation.
    pub fn build(self) -> Result<RelationDefinition, RelationError> {
        if self.name.is_empty() {
            return Err(RelationError::EmptyName);
        }

        let mut ids: HashMap<&str, VariableId> = HashMap::with_capacity(self.variables.len());
        for (i, v) in self.variables.iter().enumerate() {
            if v.name.is_empty() {
                return Err(RelationError::EmptyName);
            }
            if ids.insert(v.name.as_str(), VariableId(i)).is_some() {
                return Err(RelationError::DuplicateVariable(v.name.clone()));
            }
        }

        if self.constraints.is_empty() {
            return Err(RelationError::NoConstraints(self.name));
        }

        let resolve = |index: usize, expr: &Expr| -> Result<LinearCombination, RelationError> {
            let terms = expr
                .terms
                .iter()
                .map(|(coefficient, name)| {
                    ids.get(name.as_str())
                        .map(|&variable| Term {
                            coefficient: *coefficient,
                            variable,
                        })
                        .ok_or_else(|| RelationError::UnknownVariable {
                            constraint: index,
                            name: name.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(LinearCombination::new(terms, expr.constant))
        };

        let constraints = self
            .constraints
            .iter()
            .enumerate()
            .map(|(i, (lhs, rhs))| Ok(Constraint::new(resolve(i, lhs)?, resolve(i, rhs)?)))
            .collect::<Result<Vec<_>, RelationError>>()?;

        Ok(RelationDefinition::from_parts(
            self.name,
            self.variables,
            constraints,
        ))
    }
}
