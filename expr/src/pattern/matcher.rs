//! Structural matching of patterns against values and operand sequences.
//!
//! Matching is first-match and linear: an operand tuple contains at most
//! one open-ended binding (possibly repeated under one name), so the run
//! length is determined by the number of fixed elements and no
//! backtracking is needed.
//!
//! # Binding store
//!
//! A [`Match`] keeps its bindings in a small inline vector searched
//! linearly; patterns rarely bind more than a handful of names.

use std::sync::Arc;

use smallvec::SmallVec;
use snafu::OptionExt;

use crate::error::{Result, UnboundWildcardSnafu};
use crate::expr::Expr;
use crate::pattern::tuple::{Pattern, PatternTuple};
use crate::pattern::wildcard::Wildcard;
use crate::value::Value;

/// What a named wildcard was bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Exactly-one wildcard.
    One(Value),
    /// Open-ended wildcard; possibly empty for zero-or-more.
    Run(SmallVec<[Value; 4]>),
}

impl Binding {
    pub fn run(values: impl IntoIterator<Item = Value>) -> Self {
        Binding::Run(values.into_iter().collect())
    }

    pub fn as_one(&self) -> Option<&Value> {
        match self {
            Binding::One(v) => Some(v),
            Binding::Run(_) => None,
        }
    }

    pub fn as_run(&self) -> Option<&[Value]> {
        match self {
            Binding::Run(values) => Some(values.as_slice()),
            Binding::One(_) => None,
        }
    }

    /// The bound value; runs become tuples.
    pub fn to_value(&self) -> Value {
        match self {
            Binding::One(v) => v.clone(),
            Binding::Run(values) => Value::tuple(values.iter().cloned()),
        }
    }
}

/// Successful match: wildcard name to binding.
#[derive(Debug, Clone, Default)]
pub struct Match {
    bindings: SmallVec<[(Arc<str>, Binding); 4]>,
}

impl Match {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(name, binding)| (name.as_ref(), binding))
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.iter().find(|(n, _)| n.as_ref() == name).map(|(_, b)| b)
    }

    /// Binding of `name`, or `UnboundWildcard`.
    pub fn require(&self, name: &str) -> Result<&Binding> {
        self.get(name).context(UnboundWildcardSnafu { name })
    }

    /// Value of an exactly-one binding.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(Binding::as_one)
    }

    /// Values of a run binding.
    pub fn run(&self, name: &str) -> Option<&[Value]> {
        self.get(name).and_then(Binding::as_run)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(Value::as_int)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_str)
    }

    pub fn expr(&self, name: &str) -> Option<&Expr> {
        self.value(name).and_then(Value::as_expr)
    }

    /// Add a binding; `None` if `name` is already bound to something else.
    pub fn bind(mut self, name: Arc<str>, binding: Binding) -> Option<Self> {
        if let Some(existing) = self.get(&name) {
            return (*existing == binding).then_some(self);
        }
        self.bindings.push((name, binding));
        Some(self)
    }

    /// Union of two matches; `None` on conflicting bindings.
    pub fn merge(self, other: Match) -> Option<Self> {
        other.bindings.into_iter().try_fold(self, |acc, (name, binding)| acc.bind(name, binding))
    }
}

/// Equality is order-insensitive.
impl PartialEq for Match {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.bindings.iter().all(|(name, b)| other.get(name) == Some(b))
    }
}

impl Eq for Match {}

impl<'a> FromIterator<(&'a str, Binding)> for Match {
    fn from_iter<I: IntoIterator<Item = (&'a str, Binding)>>(iter: I) -> Self {
        let mut m = Match::new();
        for (name, binding) in iter {
            m.bindings.retain(|(n, _)| n.as_ref() != name);
            m.bindings.push((Arc::from(name), binding));
        }
        m
    }
}

// ============================================================================
// Wildcard binding
// ============================================================================

fn bind_one(w: &Wildcard, value: &Value) -> Option<Match> {
    if !w.admits(value) {
        return None;
    }
    match w.name_arc() {
        Some(name) => Match::new().bind(name.clone(), Binding::One(value.clone())),
        None => Some(Match::new()),
    }
}

fn bind_run(w: &Wildcard, values: &[Value]) -> Option<Match> {
    let (min, max) = w.match_range();
    if values.len() < min || max.is_some_and(|max| values.len() > max) {
        return None;
    }
    if !values.iter().all(|v| w.admits(v)) {
        return None;
    }
    match w.name_arc() {
        Some(name) => Match::new().bind(name.clone(), Binding::run(values.iter().cloned())),
        None => Some(Match::new()),
    }
}

// ============================================================================
// Matching
// ============================================================================

impl Pattern {
    /// Match against a single value.
    ///
    /// An open-ended wildcard binds a one-element run.
    pub fn match_value(&self, candidate: &Value) -> Option<Match> {
        match self {
            Pattern::Literal(v) => (v == candidate).then(Match::new),
            Pattern::Wildcard(w) if w.is_open() => bind_run(w, std::slice::from_ref(candidate)),
            Pattern::Wildcard(w) => bind_one(w, candidate),
            Pattern::Operation { kind, operands } => {
                let expr = candidate.as_expr()?;
                if !expr.is(kind) {
                    return None;
                }
                operands.match_operands(expr.operands())
            }
        }
    }

    /// Match against an operand sequence.
    ///
    /// An open-ended wildcard binds the whole sequence; any other pattern
    /// needs exactly one operand.
    pub fn match_operands(&self, operands: &[Value]) -> Option<Match> {
        match (self, operands) {
            (Pattern::Wildcard(w), _) if w.is_open() => bind_run(w, operands),
            (_, [single]) => self.match_value(single),
            _ => None,
        }
    }
}

impl PatternTuple {
    /// Match element-wise against `operands`.
    ///
    /// Fixed elements consume one operand each; open-ended elements share
    /// the remaining operands equally, in contiguous runs.
    pub fn match_operands(&self, operands: &[Value]) -> Option<Match> {
        let elements = self.elements();
        let open = elements.iter().filter(|p| p.is_open()).count();
        let fixed = elements.len() - open;

        let run_len = if open == 0 {
            if operands.len() != fixed {
                return None;
            }
            0
        } else {
            let available = operands.len().checked_sub(fixed)?;
            if available % open != 0 {
                return None;
            }
            available / open
        };

        let mut m = Match::new();
        let mut idx = 0;
        for element in elements {
            let step = match element {
                Pattern::Wildcard(w) if w.is_open() => {
                    let run = &operands[idx..idx + run_len];
                    idx += run_len;
                    bind_run(w, run)?
                }
                _ => {
                    let step = element.match_value(&operands[idx])?;
                    idx += 1;
                    step
                }
            };
            m = m.merge(step)?;
        }
        Some(m)
    }
}

/// Match `pattern` against `candidate`; `None` if it does not match.
pub fn match_pattern(pattern: &Pattern, candidate: &Value) -> Option<Match> {
    pattern.match_value(candidate)
}
