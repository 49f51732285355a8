use crate::error::Error;
use crate::pattern::{Binding, Match, Pattern, PatternTuple, Wildcard, wc};
use crate::test::kinds::{DUMMY1, FLAT};
use crate::value::Value;
use crate::{operands, patterns};

fn one(name: &str, value: impl Into<Value>) -> Match {
    Match::from_iter([(name, Binding::One(value.into()))])
}

fn run(name: &str, values: impl IntoIterator<Item = Value>) -> Match {
    Match::from_iter([(name, Binding::run(values))])
}

fn tuple(elements: Vec<Pattern>) -> PatternTuple {
    PatternTuple::new(elements).unwrap()
}

// =============================================================================
// Substitution
// =============================================================================

#[test]
fn test_update_single_wildcard() {
    let a = wc("a_").unwrap();
    let b = wc("b__").unwrap();
    let c = wc("c___").unwrap();

    assert_eq!(Pattern::from(&a).substitute(&one("a", 1)), Pattern::from(1));
    assert_eq!(Pattern::from(&b).substitute(&one("b", 1)), Pattern::from(1));
    assert_eq!(Pattern::from(&c).substitute(&one("c", 1)), Pattern::from(1));

    let singleton_tuple = Pattern::Literal(Value::tuple([Value::Int(1)]));
    assert_eq!(Pattern::from(&b).substitute(&run("b", operands![1])), singleton_tuple);
    assert_eq!(Pattern::from(&c).substitute(&run("c", operands![1])), singleton_tuple);
}

#[test]
fn test_update_pattern_tuple() {
    let a = wc("a_").unwrap();
    let b = wc("b__").unwrap();

    assert_eq!(tuple(patterns![&a]).substitute(&one("a", 1)), tuple(patterns![1]));
    assert_eq!(tuple(patterns![&b]).substitute(&run("b", operands![1])), tuple(patterns![1]));
    assert_eq!(tuple(patterns![1, &b, &b]).substitute(&run("b", operands![1, 2])), tuple(patterns![1, 1, 2, 1, 2]));
}

#[test]
fn test_partial_substitution_stays_a_pattern() {
    let a = wc("a_").unwrap();
    let b = wc("b__").unwrap();
    let partial = tuple(patterns![&b, &a]).substitute(&run("b", operands![1]));
    assert_eq!(partial, tuple(patterns![1, &a]));
    assert!(matches!(partial.build(), Err(Error::UnboundWildcard { .. })));
}

#[test]
fn test_substitute_then_build_operation() {
    let a = wc("a").unwrap();
    let rest = wc("rest___").unwrap();
    let pattern = Pattern::operation(&FLAT, patterns![&a, &rest]).unwrap();
    let m = one("a", 1).merge(run("rest", operands![2, 3])).unwrap();

    let built = pattern.substitute(&m).build().unwrap();
    assert_eq!(built, FLAT.create(operands![1, 2, 3]).unwrap());
}

#[test]
fn test_match_then_rebuild_round_trip() {
    let a = wc("a").unwrap();
    let b = wc("b__").unwrap();
    let pattern = Pattern::operation(&DUMMY1, patterns![&a, "sep", &b]).unwrap();
    let target = DUMMY1.create(operands![0, "sep", 1, 2]).unwrap();

    let m = pattern.match_value(&target).unwrap();
    assert_eq!(pattern.substitute(&m).build().unwrap(), target);
}

// =============================================================================
// Match range
// =============================================================================

#[test]
fn test_match_range() {
    assert_eq!(tuple(patterns![wc("a").unwrap(), 1, 2]).match_range(), (3, Some(3)));
    assert_eq!(tuple(patterns![wc("a").unwrap(), 1, 2, wc("b__").unwrap()]).match_range(), (4, None));
    assert_eq!(tuple(patterns![wc("a").unwrap(), 1, 2, wc("b___").unwrap()]).match_range(), (3, None));
    assert_eq!(tuple(patterns![]).match_range(), (0, Some(0)));
}

// =============================================================================
// Malformed patterns
// =============================================================================

#[test]
fn test_independent_open_wildcards_are_rejected() {
    let err = PatternTuple::new(patterns![wc("a__").unwrap(), wc("b___").unwrap()]).unwrap_err();
    assert!(matches!(err, Error::IndependentOpenWildcards { .. }));

    let anon = PatternTuple::new(patterns![wc("__").unwrap(), wc("__").unwrap()]);
    assert!(anon.is_err());
}

#[test]
fn test_empty_named_open_wildcards_are_independent() {
    let anon = Wildcard::one_or_more("").unwrap();
    let err = PatternTuple::new(patterns![&anon, &anon]).unwrap_err();
    assert!(matches!(err, Error::IndependentOpenWildcards { .. }));
}

#[test]
fn test_repeated_open_wildcard_is_accepted() {
    let b = wc("b__").unwrap();
    assert!(PatternTuple::new(patterns![1, &b, 2, &b]).is_ok());
}

#[test]
fn test_conflicting_cardinalities_are_rejected() {
    let nested = Pattern::operation(&DUMMY1, patterns![wc("a__").unwrap()]).unwrap();
    let err = PatternTuple::new(patterns![nested, wc("a").unwrap()]).unwrap_err();
    assert!(matches!(err, Error::ConflictingCardinality { .. }));
}

#[test]
fn test_build_rejects_wildcard() {
    let err = Pattern::from(wc("x").unwrap()).build().unwrap_err();
    assert_eq!(err.to_string(), "cannot build pattern: wildcard x is unbound");
}
