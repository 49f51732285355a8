//! Declarative operand signatures.
//!
//! A [`Signature`] lists the accepted heads for every positional slot, an
//! optional variadic tail and an optional keyword whitelist. It is checked
//! once at the start of `create`, before any simplification runs.

use std::fmt;

use smallvec::SmallVec;
use snafu::ensure;

use crate::error::{Result, WrongSignatureSnafu};
use crate::kind::Kind;
use crate::value::{Kwargs, Value};

/// Constraint on the type of a single value.
#[derive(Debug, Clone, Copy)]
pub enum Head {
    Any,
    Int,
    Float,
    Complex,
    /// Int, float or complex.
    Number,
    Str,
    Tuple,
    /// An expression of exactly this kind.
    Kind(&'static Kind),
    /// An expression whose kind belongs to this family (e.g. "hilbert_space").
    Family(&'static str),
}

impl Head {
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            Head::Any => true,
            Head::Int => matches!(value, Value::Int(_)),
            Head::Float => matches!(value, Value::Float(_)),
            Head::Complex => matches!(value, Value::Complex { .. }),
            Head::Number => value.is_number(),
            Head::Str => matches!(value, Value::Str(_)),
            Head::Tuple => matches!(value, Value::Tuple(_)),
            Head::Kind(kind) => value.as_expr().is_some_and(|e| e.kind().id() == kind.id()),
            Head::Family(family) => value.as_expr().is_some_and(|e| e.kind().in_family(family)),
        }
    }

    /// True if any head in `heads` admits `value`. An empty list admits everything.
    pub fn any_admits(heads: &[Head], value: &Value) -> bool {
        heads.is_empty() || heads.iter().any(|h| h.admits(value))
    }
}

impl PartialEq for Head {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Head::Kind(a), Head::Kind(b)) => a.id() == b.id(),
            (Head::Family(a), Head::Family(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Eq for Head {}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Head::Any => write!(f, "any"),
            Head::Int => write!(f, "int"),
            Head::Float => write!(f, "float"),
            Head::Complex => write!(f, "complex"),
            Head::Number => write!(f, "number"),
            Head::Str => write!(f, "str"),
            Head::Tuple => write!(f, "tuple"),
            Head::Kind(kind) => write!(f, "{}", kind.name()),
            Head::Family(family) => write!(f, "{family}"),
        }
    }
}

pub type HeadSet = SmallVec<[Head; 2]>;

fn join_heads(heads: &[Head]) -> String {
    heads.iter().map(ToString::to_string).collect::<Vec<_>>().join(" | ")
}

/// Which part of a signature was violated.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SignatureViolation {
    #[display("expected {expected} operands, got {actual}")]
    Arity { expected: String, actual: usize },
    #[display("operand {index} ({operand}) is not one of [{expected}]")]
    OperandHead { index: usize, operand: String, expected: String },
    #[display("unexpected keyword argument '{key}'")]
    Keyword { key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    positional: Vec<HeadSet>,
    variadic: Option<HeadSet>,
    /// `None` accepts any keyword.
    keywords: Option<Vec<&'static str>>,
}

impl Default for Signature {
    fn default() -> Self {
        Self::any()
    }
}

impl Signature {
    /// Any number of operands of any type, any keywords.
    pub fn any() -> Self {
        Self { positional: Vec::new(), variadic: Some(HeadSet::from_slice(&[Head::Any])), keywords: None }
    }

    /// No operands and no keywords; extend with the chained setters.
    pub fn empty() -> Self {
        Self { positional: Vec::new(), variadic: None, keywords: Some(Vec::new()) }
    }

    /// Append a positional slot accepting any of `heads`.
    pub fn positional(mut self, heads: impl IntoIterator<Item = Head>) -> Self {
        self.positional.push(heads.into_iter().collect());
        self
    }

    /// Accept any number of further operands, each admitted by one of `heads`.
    pub fn variadic(mut self, heads: impl IntoIterator<Item = Head>) -> Self {
        self.variadic = Some(heads.into_iter().collect());
        self
    }

    /// Restrict keyword arguments to `names`.
    pub fn keywords(mut self, names: impl IntoIterator<Item = &'static str>) -> Self {
        self.keywords = Some(names.into_iter().collect());
        self
    }

    pub fn min_arity(&self) -> usize {
        self.positional.len()
    }

    pub fn max_arity(&self) -> Option<usize> {
        if self.variadic.is_some() { None } else { Some(self.positional.len()) }
    }

    /// Heads admitted at operand position `index`.
    pub fn heads_at(&self, index: usize) -> Option<&[Head]> {
        self.positional.get(index).or(self.variadic.as_ref()).map(|h| h.as_slice())
    }

    fn expected_arity(&self) -> String {
        match self.max_arity() {
            Some(n) => n.to_string(),
            None if self.min_arity() == 0 => "any number of".to_string(),
            None => format!("at least {}", self.min_arity()),
        }
    }

    /// Validate `operands` and `kwargs` on behalf of the kind named `kind`.
    pub fn check(&self, kind: &'static str, operands: &[Value], kwargs: &Kwargs) -> Result<()> {
        let n = operands.len();
        let arity_ok = n >= self.min_arity() && self.max_arity().is_none_or(|max| n <= max);
        ensure!(
            arity_ok,
            WrongSignatureSnafu {
                kind,
                violation: SignatureViolation::Arity { expected: self.expected_arity(), actual: n }
            }
        );

        for (index, operand) in operands.iter().enumerate() {
            let Some(heads) = self.heads_at(index) else { continue };
            ensure!(
                Head::any_admits(heads, operand),
                WrongSignatureSnafu {
                    kind,
                    violation: SignatureViolation::OperandHead {
                        index,
                        operand: operand.to_string(),
                        expected: join_heads(heads),
                    }
                }
            );
        }

        if let Some(allowed) = &self.keywords
            && let Some(key) = kwargs.keys().find(|k| !allowed.contains(*k))
        {
            return WrongSignatureSnafu { kind, violation: SignatureViolation::Keyword { key: key.to_string() } }
                .fail();
        }

        Ok(())
    }
}
