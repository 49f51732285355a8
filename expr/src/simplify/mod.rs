//! Simplification pipeline steps.
//!
//! Every step has the same shape: it receives the kind being constructed,
//! the current operands and keyword arguments, and returns either the
//! (possibly rewritten) parts to pass to the next step or a terminal value
//! that replaces the whole construction.
//!
//! Built-in steps, in their canonical order after domain conversions:
//!
//! | Step | Effect |
//! |------|--------|
//! | [`Simplification::ASSOC`] | splice same-kind operands in place |
//! | [`Simplification::ORDERBY`] | sort operands by the kind's order |
//! | [`Simplification::IDEM`] | sort and drop duplicates |
//! | [`Simplification::FILTER_NEUTRAL`] | drop the neutral element, unwrap 0/1 operands |
//! | [`Simplification::MATCH_REPLACE_BINARY`] | fold adjacent pairs with binary rules |

pub mod create;

use smallvec::SmallVec;
use tracing::trace;

use crate::error::Result;
use crate::kind::Kind;
use crate::rewrite::reduce_binary;
use crate::value::{Kwargs, Operands, Value};

/// Result of one pipeline step.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Continue with these parts.
    Continue(Operands, Kwargs),
    /// Stop; this value is the result of `create`.
    Replace(Value),
}

pub type SimplifyFn = fn(&'static Kind, Operands, Kwargs) -> Result<Outcome>;

/// A named pipeline step.
#[derive(Clone, Copy, derive_more::Debug)]
#[debug("{name}")]
pub struct Simplification {
    name: &'static str,
    apply: SimplifyFn,
}

impl Simplification {
    pub const ASSOC: Self = Self::new("assoc", assoc);
    pub const ORDERBY: Self = Self::new("orderby", orderby);
    pub const IDEM: Self = Self::new("idem", idem);
    pub const FILTER_NEUTRAL: Self = Self::new("filter_neutral", filter_neutral);
    pub const MATCH_REPLACE_BINARY: Self = Self::new("match_replace_binary", match_replace_binary);

    /// A custom step, typically a domain conversion.
    pub const fn new(name: &'static str, apply: SimplifyFn) -> Self {
        Self { name, apply }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, kind: &'static Kind, operands: Operands, kwargs: Kwargs) -> Result<Outcome> {
        (self.apply)(kind, operands, kwargs)
    }
}

/// Flatten nested operands of the same kind.
pub fn assoc(kind: &'static Kind, operands: Operands, kwargs: Kwargs) -> Result<Outcome> {
    if !operands.iter().any(|op| op.as_expr().is_some_and(|e| e.is(kind))) {
        return Ok(Outcome::Continue(operands, kwargs));
    }

    let mut flat = SmallVec::with_capacity(operands.len());
    for op in operands {
        match op {
            Value::Expr(e) if e.is(kind) => flat.extend(e.operands().iter().cloned()),
            other => flat.push(other),
        }
    }
    trace!(kind = kind.name(), len = flat.len(), "flattened nested operands");
    Ok(Outcome::Continue(flat, kwargs))
}

/// Sort operands by the kind's total order.
pub fn orderby(kind: &'static Kind, mut operands: Operands, kwargs: Kwargs) -> Result<Outcome> {
    operands.sort_by(|a, b| kind.compare(a, b));
    Ok(Outcome::Continue(operands, kwargs))
}

/// Sort operands and drop duplicates.
pub fn idem(kind: &'static Kind, mut operands: Operands, kwargs: Kwargs) -> Result<Outcome> {
    operands.sort_by(|a, b| kind.compare(a, b));
    operands.dedup();
    Ok(Outcome::Continue(operands, kwargs))
}

/// Drop neutral operands; return the neutral element for no operands and the
/// operand itself for exactly one.
pub fn filter_neutral(kind: &'static Kind, operands: Operands, kwargs: Kwargs) -> Result<Outcome> {
    let Some(neutral) = kind.neutral_element() else {
        return Ok(Outcome::Continue(operands, kwargs));
    };

    let mut remaining: Operands = operands.into_iter().filter(|op| *op != neutral).collect();
    match remaining.len() {
        0 => Ok(Outcome::Replace(neutral)),
        1 => Ok(Outcome::Replace(remaining.remove(0))),
        _ => Ok(Outcome::Continue(remaining, kwargs)),
    }
}

/// Fold the operand chain with the kind's binary rules.
pub fn match_replace_binary(kind: &'static Kind, operands: Operands, kwargs: Kwargs) -> Result<Outcome> {
    let reduction = reduce_binary(kind.name(), kind.binary_rules(), operands)?;
    Ok(Outcome::Continue(reduction.operands, kwargs))
}
