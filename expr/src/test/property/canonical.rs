//! Property tests for canonical construction and binary reduction.

use proptest::prelude::*;

use crate::kind::Kind;
use crate::rewrite::{RuleOutcome, reduce_binary};
use crate::test::kinds::*;
use crate::value::{Operands, Value};

use super::generators::*;

fn create(kind: &'static Kind, ops: impl IntoIterator<Item = Value>) -> Value {
    kind.create(ops).unwrap()
}

/// Re-creating from the canonical operands yields the same value.
fn recreate(kind: &'static Kind, value: &Value) -> Value {
    match value.as_expr() {
        Some(e) if e.is(kind) => create(kind, e.operands().iter().cloned()),
        _ => value.clone(),
    }
}

// ============================================================================
// Idempotence
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Constructing from canonical operands is a fixed point.
    #[test]
    fn create_is_idempotent(ops in arb_operands(8)) {
        for kind in [&*FLAT, &*ORDERLESS, &*FLAT_ORDERLESS, &*IDEM, &*FILTER_NEUTRAL] {
            let value = create(kind, ops.clone());
            prop_assert_eq!(recreate(kind, &value), value);
        }
    }

    /// Binary reduction leaves nothing to reduce.
    #[test]
    fn match_replace_binary_is_idempotent(ops in arb_arithmetic_chain(8)) {
        let value = create(&MATCH_REPLACE_BINARY, ops);
        prop_assert_eq!(recreate(&MATCH_REPLACE_BINARY, &value), value);
    }
}

// ============================================================================
// Ordering and deduplication
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Orderless construction ignores operand order.
    #[test]
    fn orderless_ignores_permutation((ops, shuffled) in arb_operands_and_shuffle(8)) {
        prop_assert_eq!(create(&ORDERLESS, ops.clone()), create(&ORDERLESS, shuffled.clone()));
        prop_assert_eq!(create(&FLAT_ORDERLESS, ops), create(&FLAT_ORDERLESS, shuffled));
    }

    /// Idempotent construction leaves strictly increasing operands.
    #[test]
    fn idem_operands_are_sorted_and_unique(ops in arb_operands(10)) {
        let value = create(&IDEM, ops.clone());
        let expr = value.as_expr().unwrap();
        prop_assert!(expr.operands().windows(2).all(|w| w[0] < w[1]));
        prop_assert!(ops.iter().all(|op| expr.operands().contains(op)));
    }
}

// ============================================================================
// Flattening and neutral elision
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Nesting any consecutive slice does not change a flat construction.
    #[test]
    fn flat_ignores_nesting((head, middle, tail) in arb_operands_split(8)) {
        let nested = create(&FLAT, middle.clone());
        let with_nested: Vec<Value> = head.iter().cloned().chain([nested]).chain(tail.iter().cloned()).collect();
        let spread: Vec<Value> = head.into_iter().chain(middle).chain(tail).collect();
        prop_assert_eq!(create(&FLAT, with_nested), create(&FLAT, spread));
    }

    /// Neutral elements anywhere in the operands are dropped.
    #[test]
    fn neutral_elements_are_elided(
        ops in arb_operands(6),
        mask in prop::collection::vec(any::<bool>(), 7),
    ) {
        let mut padded = Vec::new();
        for (i, op) in ops.iter().enumerate() {
            if mask[i] {
                padded.push(neutral());
            }
            padded.push(op.clone());
        }
        if mask[ops.len()] {
            padded.push(neutral());
        }
        prop_assert_eq!(create(&FILTER_NEUTRAL, padded), create(&FILTER_NEUTRAL, ops));
    }
}

// ============================================================================
// Binary reduction
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Every substitution shortens the chain by one.
    #[test]
    fn reduction_terminates_within_bound(ops in arb_arithmetic_chain(10)) {
        let len = ops.len();
        let reduction = reduce_binary("Test", &string_arithmetic_rules(), ops.into_iter().collect()).unwrap();
        prop_assert!(reduction.substitutions <= len.saturating_sub(1));
        prop_assert_eq!(reduction.operands.len() + reduction.substitutions, len);
    }

    /// No adjacent pair of the reduced chain matches a rule.
    #[test]
    fn reduction_reaches_fixed_point(ops in arb_arithmetic_chain(10)) {
        let rules = string_arithmetic_rules();
        let reduced: Operands = reduce_binary("Test", &rules, ops.into_iter().collect()).unwrap().operands;
        for pair in reduced.windows(2) {
            for rule in &rules {
                prop_assert_eq!(rule.apply(&pair[0], &pair[1]).unwrap(), RuleOutcome::NotApplicable);
            }
        }
    }
}
