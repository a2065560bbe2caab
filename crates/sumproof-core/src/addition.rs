//! # The Addition Relation
//!
//! `A + B == Sum` with `A`, `B` secret and `Sum` public. Built once per
//! process and shared by setup and every witness construction, so setup and
//! proving always see the same shape.

use crate::error::WitnessError;
use crate::relation::{
    Constraint, LinearCombination, RelationDefinition, Term, Variable, VariableId, Visibility,
};
use crate::witness::{FullWitness, PublicWitness};

/// Relation name, part of the fingerprint.
pub const RELATION_NAME: &str = "addition";
/// First secret addend.
pub const A: &str = "A";
/// Second secret addend.
pub const B: &str = "B";
/// Public sum.
pub const SUM: &str = "Sum";

/// The fixed addition relation.
///
/// Assembled directly rather than through [`RelationBuilder`] since its
/// references are fixed; the tests check both paths agree.
///
/// [`RelationBuilder`]: crate::RelationBuilder
pub fn addition_relation() -> RelationDefinition {
    let var = |i: usize| Term {
        coefficient: 1,
        variable: VariableId(i),
    };
    RelationDefinition::from_parts(
        RELATION_NAME.to_string(),
        vec![
            Variable::new(A, Visibility::Secret),
            Variable::new(B, Visibility::Secret),
            Variable::new(SUM, Visibility::Public),
        ],
        vec![Constraint::new(
            LinearCombination::new(vec![var(0), var(1)], 0),
            LinearCombination::new(vec![var(2)], 0),
        )],
    )
}

/// Full witness `A = a, B = b, Sum = sum`. No check that `a + b == sum`.
pub fn full_witness(
    relation: &RelationDefinition,
    a: i64,
    b: i64,
    sum: i64,
) -> Result<FullWitness, WitnessError> {
    FullWitness::new(relation, [(A, a), (B, b), (SUM, sum)])
}

/// Public witness `Sum = sum`.
pub fn public_witness(relation: &RelationDefinition, sum: i64) -> Result<PublicWitness, WitnessError> {
    PublicWitness::new(relation, [(SUM, sum)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::{Expr, RelationBuilder};
    use proptest::prelude::*;

    #[test]
    fn matches_builder_output() {
        let built = RelationBuilder::new(RELATION_NAME)
            .secret(A)
            .secret(B)
            .public(SUM)
            .constrain_eq(Expr::var(A) + Expr::var(B), Expr::var(SUM))
            .build()
            .unwrap();
        assert_eq!(addition_relation(), built);
        assert_eq!(addition_relation().fingerprint(), built.fingerprint());
    }

    #[test]
    fn shape() {
        let rel = addition_relation();
        assert_eq!(rel.variables().len(), 3);
        assert_eq!(rel.constraints().len(), 1);
        let public: Vec<_> = rel.public_variables().map(|(_, v)| v.name()).collect();
        assert_eq!(public, vec![SUM]);
    }

    #[test]
    fn five_plus_three() {
        let rel = addition_relation();
        assert!(rel.is_satisfied_by(&full_witness(&rel, 5, 3, 8).unwrap()));
        assert!(!rel.is_satisfied_by(&full_witness(&rel, 5, 3, 9).unwrap()));
    }

    #[test]
    fn public_witness_carries_only_the_sum() {
        let rel = addition_relation();
        let full = full_witness(&rel, 5, 3, 8).unwrap();
        assert_eq!(full.public_projection(&rel), public_witness(&rel, 8).unwrap());
        assert_eq!(public_witness(&rel, 8).unwrap().values(), &[8]);
    }

    proptest! {
        #[test]
        fn satisfied_iff_sum_matches(a in any::<i64>(), b in any::<i64>(), sum in any::<i64>()) {
            let rel = addition_relation();
            let w = full_witness(&rel, a, b, sum).unwrap();
            let expected = i128::from(a) + i128::from(b) == i128::from(sum);
            prop_assert_eq!(rel.is_satisfied_by(&w), expected);
        }
    }
}
