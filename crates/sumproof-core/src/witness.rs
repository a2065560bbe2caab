//! # Witness Assignments
//!
//! A [`FullWitness`] assigns a value to every variable of a relation and is
//! only ever handled on the proving side. A [`PublicWitness`] holds the
//! public variables alone, in declaration order, and is all a verifier
//! needs.

use std::collections::HashSet;
use std::fmt;

use crate::error::WitnessError;
use crate::relation::{RelationDefinition, VariableId};

/// Values for every variable of a relation, indexed by [`VariableId`].
///
/// `Debug` is redacted: secret values must not reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct FullWitness {
    values: Vec<i64>,
}

impl FullWitness {
    /// Assign every declared variable exactly once.
    pub fn new<'a>(
        relation: &RelationDefinition,
        assignments: impl IntoIterator<Item = (&'a str, i64)>,
    ) -> Result<Self, WitnessError> {
        let mut slots: Vec<Option<i64>> = vec![None; relation.variables().len()];
        for (name, value) in assignments {
            let id = relation
                .id_of(name)
                .ok_or_else(|| WitnessError::UnknownVariable(name.to_string()))?;
            let slot = &mut slots[id.index()];
            if slot.is_some() {
                return Err(WitnessError::DuplicateAssignment(name.to_string()));
            }
            *slot = Some(value);
        }

        let values = slots
            .into_iter()
            .zip(relation.variables())
            .map(|(slot, var)| {
                slot.ok_or_else(|| WitnessError::MissingAssignment(var.name().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { values })
    }

    /// All values in declaration order.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn value(&self, id: VariableId) -> Option<i64> {
        self.values.get(id.index()).copied()
    }

    /// Drop every secret value, keeping public values in declaration order.
    pub fn public_projection(&self, relation: &RelationDefinition) -> PublicWitness {
        PublicWitness {
            values: relation
                .public_variables()
                .filter_map(|(id, _)| self.value(id))
                .collect(),
        }
    }
}

impl fmt::Debug for FullWitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FullWitness")
            .field("values", &format_args!("[REDACTED; {}]", self.values.len()))
            .finish()
    }
}

/// Values for the public variables of a relation, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicWitness {
    values: Vec<i64>,
}

impl PublicWitness {
    /// Assign every public variable exactly once. Naming a secret variable
    /// is an error, not something silently ignored.
    pub fn new<'a>(
        relation: &RelationDefinition,
        assignments: impl IntoIterator<Item = (&'a str, i64)>,
    ) -> Result<Self, WitnessError> {
        let mut given: Vec<(VariableId, i64)> = Vec::new();
        let mut seen = HashSet::new();
        for (name, value) in assignments {
            let id = relation
                .id_of(name)
                .ok_or_else(|| WitnessError::UnknownVariable(name.to_string()))?;
            if relation.variable(id).is_some_and(|v| !v.is_public()) {
                return Err(WitnessError::SecretInPublicWitness(name.to_string()));
            }
            if !seen.insert(id) {
                return Err(WitnessError::DuplicateAssignment(name.to_string()));
            }
            given.push((id, value));
        }

        let values = relation
            .public_variables()
            .map(|(id, var)| {
                given
                    .iter()
                    .find(|(g, _)| *g == id)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| WitnessError::MissingAssignment(var.name().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { values })
    }

    /// Public values in declaration order.
    pub fn values(&self) -> &[i64] {
        &self.values
    }
}
