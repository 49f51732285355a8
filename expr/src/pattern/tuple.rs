//! Patterns and pattern tuples.
//!
//! A [`Pattern`] is a literal, a [`Wildcard`] or an operation pattern (a
//! required kind plus a [`PatternTuple`] for its operands). Pattern tuples
//! are validated when they are built:
//!
//! - open-ended wildcards in one tuple must all carry the same name, so
//!   their shared binding fixes the run length
//! - one name may not appear with two cardinalities anywhere in a pattern

use std::collections::BTreeMap;
use std::sync::Arc;

use snafu::ensure;

use crate::error::{ConflictingCardinalitySnafu, IndependentOpenWildcardsSnafu, Result, UnboundWildcardSnafu};
use crate::expr::Expr;
use crate::kind::Kind;
use crate::pattern::matcher::{Binding, Match};
use crate::pattern::wildcard::{Cardinality, Wildcard};
use crate::value::{Operands, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Literal(Value),
    Wildcard(Wildcard),
    Operation { kind: &'static Kind, operands: PatternTuple },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatternTuple {
    elements: Vec<Pattern>,
}

/// Sum two `(min, max)` ranges; `None` is unbounded.
fn add_ranges(a: (usize, Option<usize>), b: (usize, Option<usize>)) -> (usize, Option<usize>) {
    (a.0 + b.0, a.1.zip(b.1).map(|(x, y)| x + y))
}

impl Pattern {
    /// Operation pattern: an expression of `kind` whose operands match `operands`.
    pub fn operation(kind: &'static Kind, operands: impl IntoIterator<Item = Pattern>) -> Result<Self> {
        Ok(Pattern::Operation { kind, operands: PatternTuple::new(operands)? })
    }

    /// True for open-ended wildcards.
    pub fn is_open(&self) -> bool {
        matches!(self, Pattern::Wildcard(w) if w.is_open())
    }

    /// `(min, max)` number of operands this pattern consumes.
    pub fn match_range(&self) -> (usize, Option<usize>) {
        match self {
            Pattern::Wildcard(w) => w.match_range(),
            Pattern::Literal(_) | Pattern::Operation { .. } => (1, Some(1)),
        }
    }

    /// Replace bound wildcards by their bindings; unbound wildcards remain.
    ///
    /// A run bound to a standalone wildcard becomes a tuple literal.
    pub fn substitute(&self, m: &Match) -> Pattern {
        match self {
            Pattern::Literal(_) => self.clone(),
            Pattern::Wildcard(w) => match w.name().and_then(|name| m.get(name)) {
                Some(binding) => Pattern::Literal(binding.to_value()),
                None => self.clone(),
            },
            Pattern::Operation { kind, operands } => Pattern::Operation { kind: *kind, operands: operands.substitute(m) },
        }
    }

    /// Instantiate a ground pattern; operation patterns go through `create`.
    pub fn build(&self) -> Result<Value> {
        match self {
            Pattern::Literal(v) => Ok(v.clone()),
            Pattern::Wildcard(w) => UnboundWildcardSnafu { name: w.to_string() }.fail(),
            Pattern::Operation { kind, operands } => kind.create(operands.build()?),
        }
    }

    fn collect_cardinalities(&self, seen: &mut BTreeMap<Arc<str>, Cardinality>) -> Result<()> {
        match self {
            Pattern::Literal(_) => Ok(()),
            Pattern::Wildcard(w) => {
                let Some(name) = w.name_arc() else { return Ok(()) };
                let previous = *seen.entry(name.clone()).or_insert(w.cardinality());
                ensure!(previous == w.cardinality(), ConflictingCardinalitySnafu { name: name.to_string() });
                Ok(())
            }
            Pattern::Operation { operands, .. } => {
                operands.elements.iter().try_for_each(|p| p.collect_cardinalities(seen))
            }
        }
    }
}

impl PatternTuple {
    pub fn new(elements: impl IntoIterator<Item = Pattern>) -> Result<Self> {
        let elements: Vec<Pattern> = elements.into_iter().collect();

        let mut open = elements.iter().filter_map(|p| match p {
            Pattern::Wildcard(w) if w.is_open() => Some(w),
            _ => None,
        });
        if let Some(first) = open.next() {
            for other in open {
                let shared = first.name().is_some() && first.name() == other.name();
                ensure!(
                    shared,
                    IndependentOpenWildcardsSnafu { first: first.to_string(), second: other.to_string() }
                );
            }
        }

        let mut seen = BTreeMap::new();
        for element in &elements {
            element.collect_cardinalities(&mut seen)?;
        }

        Ok(Self { elements })
    }

    pub fn elements(&self) -> &[Pattern] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Sum of the element ranges.
    pub fn match_range(&self) -> (usize, Option<usize>) {
        self.elements.iter().map(Pattern::match_range).fold((0, Some(0)), add_ranges)
    }

    /// Replace bound wildcards; runs are spliced into the tuple.
    pub fn substitute(&self, m: &Match) -> PatternTuple {
        let mut elements = Vec::with_capacity(self.elements.len());
        for element in &self.elements {
            match element {
                Pattern::Wildcard(w) => match w.name().and_then(|name| m.get(name)) {
                    Some(Binding::Run(values)) => elements.extend(values.iter().cloned().map(Pattern::Literal)),
                    Some(Binding::One(value)) => elements.push(Pattern::Literal(value.clone())),
                    None => elements.push(element.clone()),
                },
                _ => elements.push(element.substitute(m)),
            }
        }
        // Substitution only removes wildcards, so the result stays valid.
        PatternTuple { elements }
    }

    /// Instantiate every element; fails on the first unbound wildcard.
    pub fn build(&self) -> Result<Operands> {
        self.elements.iter().map(Pattern::build).collect()
    }
}

impl From<Value> for Pattern {
    fn from(v: Value) -> Self {
        Pattern::Literal(v)
    }
}

impl From<Wildcard> for Pattern {
    fn from(w: Wildcard) -> Self {
        Pattern::Wildcard(w)
    }
}

impl From<&Wildcard> for Pattern {
    fn from(w: &Wildcard) -> Self {
        Pattern::Wildcard(w.clone())
    }
}

impl From<Expr> for Pattern {
    fn from(e: Expr) -> Self {
        Pattern::Literal(Value::Expr(e))
    }
}

impl From<i64> for Pattern {
    fn from(i: i64) -> Self {
        Pattern::Literal(Value::Int(i))
    }
}

impl From<i32> for Pattern {
    fn from(i: i32) -> Self {
        Pattern::Literal(Value::from(i))
    }
}

impl From<f64> for Pattern {
    fn from(f: f64) -> Self {
        Pattern::Literal(Value::Float(f))
    }
}

/// String literal pattern (not a wildcard; use `wc` for those).
impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Pattern::Literal(Value::from(s))
    }
}

/// Build a `Vec<Pattern>`, converting every element with `Pattern::from`.
#[macro_export]
macro_rules! patterns {
    ($($x:expr),* $(,)?) => {
        ::std::vec![$($crate::Pattern::from($x)),*]
    };
}
