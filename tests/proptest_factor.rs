//! Property tests for factor operations
//!
//! Tests the indexing bijection and the algebraic properties of the factor operations using
//! proptest.

use marginal::{all_assignments, assignment_to_index, index_to_assignment, table_size, Factor, Variable};
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

/// A list of cardinalities, possibly empty
fn arb_cardinality() -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(1usize..5, 0..4)
}

/// A list of cardinalities and an assignment to them, component `i` drawn from `1..=card[i]`
fn arb_assignment() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    arb_cardinality().prop_flat_map(|card| {
        let components: Vec<_> = card.iter().map(|&c| 1..=c).collect();
        (Just(card), components)
    })
}

/// A factor over `Variable`s `first..first + n` with random non-negative values
fn arb_factor(first: u32) -> impl Strategy<Value = Factor> {
    proptest::collection::vec(1usize..4, 1..4).prop_flat_map(move |card| {
        let size = table_size(&card).unwrap();
        proptest::collection::vec(0.0f64..10.0, size).prop_map(move |values| {
            let scope = (first..first + card.len() as u32).map(Variable::new).collect();
            Factor::new(scope, card.clone(), values).unwrap()
        })
    })
}

/// Two factors whose scopes may overlap; shared variables have the same cardinality
fn arb_factor_pair() -> impl Strategy<Value = (Factor, Factor)> {
    (proptest::collection::vec(1usize..4, 1..5), 0usize..4).prop_flat_map(|(card, split)| {
        // the left factor covers variables [0, split], the right one [split, n)
        let split = split.min(card.len() - 1);
        let left_card = card[..=split].to_vec();
        let right_card = card[split..].to_vec();

        (
            proptest::collection::vec(0.0f64..10.0, table_size(&left_card).unwrap()),
            proptest::collection::vec(0.0f64..10.0, table_size(&right_card).unwrap())
        ).prop_map(move |(lv, rv)| {
            let left_scope = (0..=split as u32).map(Variable::new).collect();
            let right_scope = (split as u32..card.len() as u32).map(Variable::new).collect();
            (
                Factor::new(left_scope, left_card.clone(), lv).unwrap(),
                Factor::new(right_scope, right_card.clone(), rv).unwrap()
            )
        })
    })
}

fn close(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= 1e-9 * (1.0 + x.abs()))
}

// ============================================================================
// Indexing
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// index -> assignment -> index is the identity
    #[test]
    fn index_roundtrip(card in arb_cardinality(), idx in any::<prop::sample::Index>()) {
        let i = idx.index(table_size(&card).unwrap());
        let assignment = index_to_assignment(i, &card).unwrap();
        prop_assert_eq!(assignment_to_index(&assignment, &card).unwrap(), i);
    }

    /// assignment -> index -> assignment is the identity
    #[test]
    fn assignment_roundtrip(assignment in arb_assignment()) {
        let (card, assignment) = assignment;
        let i = assignment_to_index(&assignment, &card).unwrap();
        prop_assert!(i < table_size(&card).unwrap());
        prop_assert_eq!(index_to_assignment(i, &card).unwrap(), assignment);
    }

    /// Every enumerated assignment maps to its position
    #[test]
    fn enumeration_is_index_order(card in arb_cardinality()) {
        let mut count = 0;
        for (i, assignment) in all_assignments(&card).enumerate() {
            prop_assert_eq!(assignment_to_index(&assignment, &card).unwrap(), i);
            count += 1;
        }
        prop_assert_eq!(count, table_size(&card).unwrap());
    }

    /// Indices past the end of the table are rejected
    #[test]
    fn index_past_end(card in arb_cardinality(), extra in 0usize..10) {
        prop_assert!(index_to_assignment(table_size(&card).unwrap() + extra, &card).is_err());
    }
}

// ============================================================================
// Factor Operations
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Restricting twice to the same value is the same as restricting once
    #[test]
    fn restrict_idempotent(f in arb_factor(0), pick in any::<prop::sample::Index>(), val in any::<prop::sample::Index>()) {
        let pos = pick.index(f.scope().len());
        let var = f.scope()[pos];
        let value = val.index(f.cardinality()[pos]) + 1;

        let once = f.restrict(&var, value).unwrap();
        let twice = once.restrict(&var, value).unwrap();
        prop_assert_eq!(once.scope(), f.scope());
        prop_assert_eq!(once, twice);
    }

    /// Summing out a variable conserves the total mass
    #[test]
    fn sumout_conserves_mass(f in arb_factor(0), pick in any::<prop::sample::Index>()) {
        let var = f.scope()[pick.index(f.scope().len())];
        let g = f.sumout(&var).unwrap();

        prop_assert!(! g.contains(&var));
        prop_assert_eq!(g.scope().len(), f.scope().len() - 1);
        prop_assert!((g.total() - f.total()).abs() <= 1e-9 * (1.0 + f.total()));
    }

    /// Multiplication commutes once the scopes are in matching order
    #[test]
    fn multiply_commutes((a, b) in arb_factor_pair()) {
        let ab = a.multiply(&b).unwrap();
        let ba = b.multiply(&a).unwrap().permute(ab.scope()).unwrap();

        prop_assert_eq!(ab.cardinality(), ba.cardinality());
        prop_assert!(close(&ab.values(), &ba.values()));
    }

    /// Multiplication is associative
    #[test]
    fn multiply_associates((a, b) in arb_factor_pair(), c in arb_factor(1)) {
        let left = a.multiply(&b).unwrap().multiply(&c);
        let right = b.multiply(&c).and_then(|bc| a.multiply(&bc));

        // c may disagree with a or b on a cardinality; both groupings must then fail
        match (left, right) {
            (Ok(left), Ok(right)) => {
                let right = right.permute(left.scope()).unwrap();
                prop_assert!(close(&left.values(), &right.values()));
            },
            (Err(_), Err(_)) => (),
            _ => prop_assert!(false, "only one grouping failed")
        }
    }

    /// The identity factor leaves values unchanged
    #[test]
    fn multiply_identity(f in arb_factor(0)) {
        let g = Factor::identity().multiply(&f).unwrap();
        prop_assert_eq!(&g, &f);
        prop_assert_eq!(f.multiply(&Factor::identity()).unwrap(), f);
    }

    /// A normalized factor sums to one
    #[test]
    fn normalize_sums_to_one(f in arb_factor(0)) {
        prop_assume!(f.total() > 0.0);
        let g = f.normalize().unwrap();
        prop_assert!((g.total() - 1.0).abs() < 1e-9);
    }
}
