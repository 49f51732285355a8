use snafu::Snafu;

use crate::error::Error;
use crate::operands;
use crate::pattern::{Pattern, Wildcard};
use crate::rewrite::{BinaryRule, RuleOutcome, reduce_binary};
use crate::signature::Head;
use crate::test::kinds::string_arithmetic_rules;
use crate::value::Value;

fn sum_rule() -> BinaryRule {
    let a = Wildcard::exactly_one("a").unwrap().with_head(Head::Int);
    let b = Wildcard::exactly_one("b").unwrap().with_head(Head::Int);
    BinaryRule::new(a, b, |m| {
        Ok(match (m.int("a"), m.int("b")) {
            (Some(a), Some(b)) => RuleOutcome::Applied(Value::Int(a + b)),
            _ => RuleOutcome::NotApplicable,
        })
    })
}

#[test]
fn test_no_rules_is_identity() {
    let reduction = reduce_binary("Test", &[], operands![1, 2, 3]).unwrap();
    assert_eq!(reduction.operands, operands![1, 2, 3]);
    assert_eq!(reduction.substitutions, 0);
}

#[test]
fn test_full_chain_uses_n_minus_one_substitutions() {
    let reduction = reduce_binary("Test", &[sum_rule()], operands![1, 2, 3, 4, 5]).unwrap();
    assert_eq!(reduction.operands, operands![15]);
    assert_eq!(reduction.substitutions, 4);
}

#[test]
fn test_full_string_arithmetic_chain() {
    // 4 + -1 = 3, 3 + 2 = 5, then 5 * "ab".
    let reduction = reduce_binary("Test", &string_arithmetic_rules(), operands![4, -1, 2, "ab"]).unwrap();
    assert_eq!(reduction.operands, operands!["ababababab"]);
    assert_eq!(reduction.substitutions, 3);
}

#[test]
fn test_reduction_resumes_left_of_substitution() {
    let n = Wildcard::exactly_one("n").unwrap().with_head(Head::Int);
    let long = Wildcard::exactly_one("s").unwrap().with_head(Head::Str).with_guard(|v| v.as_str().is_some_and(|s| s.len() > 1));
    let x = Wildcard::exactly_one("x").unwrap().with_head(Head::Str);
    let y = Wildcard::exactly_one("y").unwrap().with_head(Head::Str);
    let rules = [
        BinaryRule::new(&n, &long, |m| {
            Ok(match (m.int("n"), m.str("s")) {
                (Some(n), Some(s)) => RuleOutcome::Applied(Value::from(s.repeat(n.unsigned_abs() as usize))),
                _ => RuleOutcome::NotApplicable,
            })
        }),
        BinaryRule::new(&x, &y, |m| {
            Ok(match (m.str("x"), m.str("y")) {
                (Some(x), Some(y)) => RuleOutcome::Applied(Value::from(format!("{x}{y}"))),
                _ => RuleOutcome::NotApplicable,
            })
        }),
    ];

    // (2, "a") is rejected by the guard until ("a", "b") collapses to "ab".
    let reduction = reduce_binary("Test", &rules, operands![2, "a", "b"]).unwrap();
    assert_eq!(reduction.operands, operands!["abab"]);
    assert_eq!(reduction.substitutions, 2);
}

#[test]
fn test_not_applicable_falls_through_to_next_rule() {
    let reduction = reduce_binary("Test", &string_arithmetic_rules(), operands![-2, "ab"]).unwrap();
    assert_eq!(reduction.operands, operands!["baba"]);
}

#[test]
fn test_rule_order_breaks_ties() {
    let first = BinaryRule::new(Pattern::from(Wildcard::exactly_one("x").unwrap()), Wildcard::exactly_one("y").unwrap(), |_| {
        Ok(RuleOutcome::Applied(Value::from("first")))
    });
    let second = BinaryRule::new(Wildcard::exactly_one("x").unwrap(), Wildcard::exactly_one("y").unwrap(), |_| {
        Ok(RuleOutcome::Applied(Value::from("second")))
    });
    let reduction = reduce_binary("Test", &[first, second], operands![1, 2]).unwrap();
    assert_eq!(reduction.operands, operands!["first"]);
}

#[test]
fn test_shared_name_must_bind_equal_values() {
    let x = Wildcard::exactly_one("x").unwrap();
    let collapse_equal = BinaryRule::new(&x, &x, |m| Ok(RuleOutcome::Applied(m.value("x").cloned().unwrap_or(Value::Int(0)))));
    assert_eq!(reduce_binary("Test", &[collapse_equal.clone()], operands![1, 1, 2]).unwrap().operands, operands![1, 2]);
    assert_eq!(reduce_binary("Test", &[collapse_equal], operands![1, 2, 1]).unwrap().operands, operands![1, 2, 1]);
}

#[derive(Debug, Snafu)]
#[snafu(display("refused"))]
struct Refused;

#[test]
fn test_handler_error_propagates() {
    let refusing = BinaryRule::new(Wildcard::exactly_one("x").unwrap(), Wildcard::exactly_one("y").unwrap(), |_| Err(Error::domain(Refused)));
    let err = reduce_binary("Test", &[refusing], operands![1, 2]).unwrap_err();
    assert!(err.downcast_domain::<Refused>().is_some());
}
