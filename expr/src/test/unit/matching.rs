use crate::pattern::{Binding, Match, Pattern, PatternTuple, Wildcard, match_pattern, wc};
use crate::signature::Head;
use crate::test::kinds::{DUMMY1, DUMMY2};
use crate::value::{Operands, Value};
use crate::{operands, patterns};

fn dummy1(ops: Operands) -> Value {
    DUMMY1.create(ops).unwrap()
}

fn dummy2(ops: Operands) -> Value {
    DUMMY2.create(ops).unwrap()
}

fn pdummy1(elements: Vec<Pattern>) -> Pattern {
    Pattern::operation(&DUMMY1, elements).unwrap()
}

fn pdummy2(elements: Vec<Pattern>) -> Pattern {
    Pattern::operation(&DUMMY2, elements).unwrap()
}

fn one(name: &str, value: impl Into<Value>) -> Match {
    Match::from_iter([(name, Binding::One(value.into()))])
}

fn run(name: &str, values: Operands) -> Match {
    Match::from_iter([(name, Binding::run(values))])
}

// =============================================================================
// Flat patterns
// =============================================================================

#[test]
fn test_flat_with_wildcard() {
    let a = wc("a").unwrap().with_head(Head::Int);
    let b = wc("b").unwrap();
    let target = dummy1(operands![1, 3, 2]);

    assert_eq!(match_pattern(&a.into(), &target), None);
    assert_eq!(match_pattern(&b.into(), &target), Some(one("b", target.clone())));
    assert_eq!(match_pattern(&Pattern::Literal(target.clone()), &target), Some(Match::new()));
}

#[test]
fn test_literal_match_is_distinct_from_failure() {
    let target = dummy1(operands![1]);
    let m = match_pattern(&Pattern::Literal(target.clone()), &target);
    assert!(m.is_some_and(|m| m.is_empty()));
    assert!(match_pattern(&Pattern::Literal(Value::Int(2)), &target).is_none());
}

// =============================================================================
// Nested patterns
// =============================================================================

#[test]
fn test_nested_with_wildcards() {
    let a = wc("a").unwrap().with_head(Head::Int);
    let b = wc("b").unwrap();
    let c = wc("c").unwrap().with_head(Head::Kind(&DUMMY2));

    assert_eq!(match_pattern(&pdummy1(patterns![1, &b, 2]), &dummy1(operands![1, "hallo", 2])), Some(one("b", "hallo")));
    assert_eq!(match_pattern(&pdummy1(patterns![1, &a, 2]), &dummy1(operands![1, 3, 2])), Some(one("a", 3)));
    assert_eq!(match_pattern(&pdummy1(patterns![1, &a, 2]), &dummy1(operands![1, "hallo", 2])), None);
    assert_eq!(match_pattern(&pdummy1(patterns![1, &b, &b]), &dummy1(operands![1, "hallo", 2])), None);
    assert_eq!(
        match_pattern(&pdummy1(patterns![1, &b, &b]), &dummy1(operands![1, "hallo", "hallo"])),
        Some(one("b", "hallo"))
    );

    let inner = pdummy2(patterns![&a, 1]);
    let target = dummy1(operands![dummy2(operands![1, 1]), 3, 2]);
    let expected = Match::from_iter([("a", Binding::One(Value::Int(1))), ("b", Binding::One(Value::Int(3)))]);
    assert_eq!(match_pattern(&pdummy1(patterns![inner.clone(), &b, 2]), &target), Some(expected));

    let repeated = pdummy1(patterns![inner.clone(), &a, 2]);
    assert_eq!(match_pattern(&repeated, &dummy1(operands![dummy2(operands![1, 1]), 1, 2])), Some(one("a", 1)));
    assert_eq!(match_pattern(&repeated, &dummy1(operands![dummy2(operands![1, 1]), -1, 2])), None);

    let d2 = dummy2(operands![1, 2, 3]);
    assert_eq!(match_pattern(&pdummy1(patterns![&c, 2]), &dummy1(operands![d2.clone(), 2])), Some(one("c", d2)));
}

#[test]
fn test_operation_pattern_requires_kind() {
    let b = wc("b").unwrap();
    assert_eq!(match_pattern(&pdummy1(patterns![&b]), &dummy2(operands![1])), None);
    assert_eq!(match_pattern(&pdummy1(patterns![&b]), &Value::Int(1)), None);
}

#[test]
fn test_anonymous_wildcards_bind_nothing() {
    let anon = wc("").unwrap();
    assert_eq!(match_pattern(&pdummy1(patterns![&anon, 2]), &dummy1(operands![1, 2])), Some(Match::new()));
}

// =============================================================================
// One or more
// =============================================================================

#[test]
fn test_one_or_more() {
    let a = wc("a__").unwrap().with_head(Head::Int);
    let b = wc("b__").unwrap();
    let pb = Pattern::from(&b);

    assert_eq!(pb.match_operands(&operands![1, 2, 3]), Some(run("b", operands![1, 2, 3])));
    assert_eq!(Pattern::from(&a).match_operands(&operands![1, 2, 3]), Some(run("a", operands![1, 2, 3])));
    let target = dummy1(operands![1, 3, 4, 2]);
    assert_eq!(match_pattern(&pb, &target), Some(run("b", operands![target.clone()])));

    assert_eq!(match_pattern(&pdummy1(patterns![1, &a, 2]), &target), Some(run("a", operands![3, 4])));
    assert_eq!(match_pattern(&pdummy1(patterns![1, &a, 2]), &dummy1(operands![1, 3, 2])), Some(run("a", operands![3])));

    let pattern = pdummy1(patterns![1, &b, 2]);
    assert_eq!(match_pattern(&pattern, &dummy1(operands![1, "hallo", 2])), Some(run("b", operands!["hallo"])));
    assert_eq!(match_pattern(&pattern, &dummy1(operands![1, "hallo", 1, 2])), Some(run("b", operands!["hallo", 1])));
    assert_eq!(
        match_pattern(&pattern, &dummy1(operands![1, "hallo", "du", 2])),
        Some(run("b", operands!["hallo", "du"]))
    );

    assert_eq!(match_pattern(&pdummy1(patterns![1, &a, 2]), &dummy1(operands![1, "hallo", "du", 2])), None);
    assert_eq!(match_pattern(&pdummy1(patterns![1, &b, &b]), &dummy1(operands![1, "hallo", 2])), None);
    assert_eq!(
        match_pattern(&pdummy1(patterns![1, &b, &b]), &dummy1(operands![1, "hallo", "hallo"])),
        Some(run("b", operands!["hallo"]))
    );
}

#[test]
fn test_one_or_more_rejects_empty_run() {
    let b = wc("b__").unwrap();
    assert_eq!(match_pattern(&pdummy1(patterns![1, &b, 2]), &dummy1(operands![1, 2])), None);
    assert_eq!(Pattern::from(&b).match_operands(&[]), None);
}

#[test]
fn test_exactly_one_rejects_run() {
    let a = wc("a").unwrap();
    assert_eq!(Pattern::from(&a).match_operands(&operands![1, 2, 3]), None);
}

// =============================================================================
// Zero or more
// =============================================================================

#[test]
fn test_zero_or_more() {
    let a = wc("a___").unwrap().with_head(Head::Int);
    let b = wc("b___").unwrap();

    assert_eq!(match_pattern(&pdummy1(patterns![1, &a, 2]), &dummy1(operands![1, 2])), Some(run("a", operands![])));
    assert_eq!(match_pattern(&pdummy1(patterns![1, &a, 2]), &dummy1(operands![1, 3, 2])), Some(run("a", operands![3])));

    let pattern = pdummy1(patterns![1, &b, 2]);
    assert_eq!(match_pattern(&pattern, &dummy1(operands![1, 2])), Some(run("b", operands![])));
    assert_eq!(match_pattern(&pattern, &dummy1(operands![1, "hallo", 2])), Some(run("b", operands!["hallo"])));
    assert_eq!(match_pattern(&pattern, &dummy1(operands![1, "hallo", 1, 2])), Some(run("b", operands!["hallo", 1])));
    assert_eq!(
        match_pattern(&pattern, &dummy1(operands![1, "hallo", "du", 2])),
        Some(run("b", operands!["hallo", "du"]))
    );

    assert_eq!(match_pattern(&pdummy1(patterns![1, &a, 2]), &dummy1(operands![1, "hallo", "du", 2])), None);
    assert_eq!(match_pattern(&pdummy1(patterns![1, &b, &b]), &dummy1(operands![1, "hallo", 2])), None);
    assert_eq!(match_pattern(&pdummy1(patterns![1, &b, &b]), &dummy1(operands![1])), Some(run("b", operands![])));
    assert_eq!(
        match_pattern(&pdummy1(patterns![1, &b, &b]), &dummy1(operands![1, "hallo", "hallo"])),
        Some(run("b", operands!["hallo"]))
    );
}

#[test]
fn test_zero_or_more_matches_empty_sequence() {
    let b = wc("b___").unwrap();
    assert_eq!(Pattern::from(&b).match_operands(&[]), Some(run("b", operands![])));
}

// =============================================================================
// Guards and merging
// =============================================================================

#[test]
fn test_guard_runs_after_head() {
    let positive = Wildcard::exactly_one("a").unwrap().with_head(Head::Int).with_guard(|v| v.as_int().is_some_and(|i| i > 0));
    let pattern = pdummy1(patterns![&positive]);
    assert_eq!(match_pattern(&pattern, &dummy1(operands![3])), Some(one("a", 3)));
    assert_eq!(match_pattern(&pattern, &dummy1(operands![-3])), None);
    assert_eq!(match_pattern(&pattern, &dummy1(operands!["3"])), None);
}

#[test]
fn test_guard_applies_to_every_run_element() {
    let small = Wildcard::one_or_more("xs").unwrap().with_guard(|v| v.as_int().is_some_and(|i| i < 10));
    let tuple = PatternTuple::new(patterns![&small]).unwrap();
    assert!(tuple.match_operands(&operands![1, 2, 3]).is_some());
    assert!(tuple.match_operands(&operands![1, 20, 3]).is_none());
}

#[test]
fn test_merge_conflict_fails() {
    let a = one("a", 1);
    assert_eq!(a.clone().merge(one("a", 1)), Some(one("a", 1)));
    assert_eq!(a.clone().merge(one("a", 2)), None);
    assert_eq!(a.clone().merge(one("b", 2)).map(|m| m.len()), Some(2));
}

#[test]
fn test_match_accessors() {
    let m = Match::from_iter([("a", Binding::One(Value::Int(1))), ("s", Binding::run(operands!["x", "y"]))]);
    assert_eq!(m.int("a"), Some(1));
    assert_eq!(m.run("s").map(<[Value]>::len), Some(2));
    assert_eq!(m.value("s"), None);
    assert!(m.require("missing").is_err());
}
