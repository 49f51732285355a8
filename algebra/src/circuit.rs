//! Circuit vocabulary: symbols, channel permutations, series products and
//! concatenations.
//!
//! Every circuit has a channel dimension (`cdim`). `a << b` feeds the output
//! of `b` into `a` (so `b` acts first) and needs equal channel dimensions;
//! `a ⊞ b` stacks circuits block-diagonally and adds them.

use std::sync::LazyLock;

use snafu::{OptionExt, ensure};
use tracing::debug;

use qalg_expr::{
    BinaryRule, Expr, Head, Kind, Kwargs, Match, Operands, Outcome, Role, RuleOutcome, Signature, Simplification, Value,
    Wildcard,
};

use crate::error::{BadPermutationSnafu, CdimMismatchSnafu, Error, NoCircuitsSnafu, NotASnafu, Result};
use crate::permutation::{check_permutation, compose_permutations, concatenate_permutations};

/// Kind family shared by every circuit kind.
pub const CIRCUIT: &str = "circuit";

// ============================================================================
// Kinds
// ============================================================================

/// `CircuitSymbol(name, cdim)`.
pub static CIRCUIT_SYMBOL: LazyLock<Kind> = LazyLock::new(|| {
    Kind::builder()
        .name("CircuitSymbol")
        .role(Role::Atom)
        .families(vec![CIRCUIT])
        .signature(Signature::empty().positional([Head::Str]).positional([Head::Int]))
        .render_str(|e, _| symbol_name(e).to_string())
        .render_tex(|e, _| format!(r"{{\rm {}}}", symbol_name(e)))
        .build()
});

/// `CPermutation((σ(0), ..., σ(n-1)))`: channel `i` is routed to `σ(i)`.
pub static CPERMUTATION: LazyLock<Kind> = LazyLock::new(|| {
    Kind::builder()
        .name("CPermutation")
        .role(Role::Atom)
        .families(vec![CIRCUIT])
        .signature(Signature::empty().positional([Head::Tuple]))
        .render_str(|e, config| {
            let sigma = if config.unicode { "σ" } else { "sigma" };
            format!("P_{sigma}({})", image_list(e))
        })
        .render_tex(|e, _| format!(r"\mathbf{{P}}_{{\sigma}}\left({}\right)", image_list(e)))
        .build()
});

pub static SERIES_PRODUCT: LazyLock<Kind> = LazyLock::new(|| {
    Kind::builder()
        .name("SeriesProduct")
        .families(vec![CIRCUIT])
        .signature(Signature::empty().variadic([Head::Family(CIRCUIT)]))
        .simplifications(vec![
            Simplification::ASSOC,
            Simplification::new("check_cdims", check_cdims),
            Simplification::MATCH_REPLACE_BINARY,
            Simplification::new("unwrap_single", unwrap_single),
        ])
        .binary_rules(series_rules())
        .render_str(|e, config| join_operands(e, " << ", |v| v.render(config)))
        .render_tex(|e, config| join_operands(e, r" \lhd ", |v| v.render_tex(config)))
        .build()
});

pub static CONCATENATION: LazyLock<Kind> = LazyLock::new(|| {
    Kind::builder()
        .name("Concatenation")
        .families(vec![CIRCUIT])
        .signature(Signature::empty().variadic([Head::Family(CIRCUIT)]))
        .simplifications(vec![
            Simplification::ASSOC,
            Simplification::MATCH_REPLACE_BINARY,
            Simplification::new("unwrap_single", unwrap_single),
        ])
        .binary_rules(concatenation_rules())
        .render_str(|e, config| {
            let sep = if config.unicode { " ⊞ " } else { " + " };
            join_operands(e, sep, |v| v.render(config))
        })
        .render_tex(|e, config| join_operands(e, r" \boxplus ", |v| v.render_tex(config)))
        .build()
});

fn symbol_name(e: &Expr) -> &str {
    e.args().first().and_then(Value::as_str).unwrap_or_default()
}

fn image_list(e: &Expr) -> String {
    image_of(e).unwrap_or_default().iter().map(usize::to_string).collect::<Vec<_>>().join(", ")
}

fn join_operands(e: &Expr, sep: &str, render: impl Fn(&Value) -> String) -> String {
    e.operands().iter().map(render).collect::<Vec<_>>().join(sep)
}

fn image_of(e: &Expr) -> Option<Vec<usize>> {
    if !e.is(&CPERMUTATION) {
        return None;
    }
    e.args()
        .first()?
        .as_tuple()?
        .iter()
        .map(|p| p.as_int().and_then(|p| usize::try_from(p).ok()))
        .collect()
}

fn is_identity(image: &[usize]) -> bool {
    image.iter().enumerate().all(|(i, &p)| i == p)
}

fn expr_cdim(e: &Expr) -> Option<usize> {
    if e.is(&CIRCUIT_SYMBOL) {
        e.args().get(1).and_then(Value::as_int).and_then(|c| usize::try_from(c).ok())
    } else if e.is(&CPERMUTATION) {
        image_of(e).map(|image| image.len())
    } else if e.is(&SERIES_PRODUCT) {
        e.operands().first().map_or(Some(0), value_cdim)
    } else if e.is(&CONCATENATION) {
        e.operands().iter().map(value_cdim).sum()
    } else {
        None
    }
}

fn value_cdim(value: &Value) -> Option<usize> {
    value.as_expr().and_then(expr_cdim)
}

/// Node for an image already known to be a permutation.
fn permutation_node(image: &[usize]) -> qalg_expr::Result<Expr> {
    let tuple = Value::tuple(image.iter().map(|&p| Value::Int(p as i64)));
    Expr::atom(&CPERMUTATION, [tuple], Kwargs::new())
}

// ============================================================================
// Pipeline steps and rules
// ============================================================================

/// Every operand of a series product has the same channel dimension.
fn check_cdims(kind: &'static Kind, operands: Operands, kwargs: Kwargs) -> qalg_expr::Result<Outcome> {
    let mut expected = None;
    for op in &operands {
        let cdim = value_cdim(op)
            .context(NotASnafu { expected: "circuit", value: op.to_string() })
            .map_err(Error::into_domain)?;
        match expected {
            None => expected = Some(cdim),
            Some(lhs) if lhs != cdim => {
                debug!(kind = kind.name(), lhs, rhs = cdim, "channel dimension mismatch");
                return Err(CdimMismatchSnafu { operation: "series product", lhs, rhs: cdim }.build().into_domain());
            }
            Some(_) => {}
        }
    }
    Ok(Outcome::Continue(operands, kwargs))
}

fn unwrap_single(_: &'static Kind, mut operands: Operands, kwargs: Kwargs) -> qalg_expr::Result<Outcome> {
    if operands.len() == 1 {
        return Ok(Outcome::Replace(operands.remove(0)));
    }
    Ok(Outcome::Continue(operands, kwargs))
}

fn permutation_wildcard(name: &'static str) -> Wildcard {
    Wildcard::exactly_one(name).expect("permutation_wildcard: invalid name").with_head(Head::Kind(&CPERMUTATION))
}

fn identity_wildcard(name: &'static str) -> Wildcard {
    permutation_wildcard(name).with_guard(|v| v.as_expr().and_then(image_of).is_some_and(|image| is_identity(&image)))
}

fn circuit_wildcard(name: &'static str) -> Wildcard {
    Wildcard::exactly_one(name).expect("circuit_wildcard: invalid name").with_head(Head::Family(CIRCUIT))
}

fn images(m: &Match) -> Option<(Vec<usize>, Vec<usize>)> {
    Some((m.expr("a").and_then(image_of)?, m.expr("b").and_then(image_of)?))
}

fn keep(m: &Match, name: &str) -> RuleOutcome {
    m.value(name).cloned().map_or(RuleOutcome::NotApplicable, RuleOutcome::Applied)
}

fn series_rules() -> Vec<BinaryRule> {
    vec![
        BinaryRule::new(permutation_wildcard("a"), permutation_wildcard("b"), |m| {
            let Some((a, b)) = images(m) else { return Ok(RuleOutcome::NotApplicable) };
            let composed = compose_permutations(&a, &b).map_err(Error::into_domain)?;
            Ok(RuleOutcome::Applied(Value::Expr(permutation_node(&composed)?)))
        }),
        BinaryRule::new(identity_wildcard("id"), circuit_wildcard("c"), |m| Ok(keep(m, "c"))),
        BinaryRule::new(circuit_wildcard("c"), identity_wildcard("id"), |m| Ok(keep(m, "c"))),
    ]
}

fn concatenation_rules() -> Vec<BinaryRule> {
    vec![BinaryRule::new(permutation_wildcard("a"), permutation_wildcard("b"), |m| {
        let Some((a, b)) = images(m) else { return Ok(RuleOutcome::NotApplicable) };
        Ok(RuleOutcome::Applied(Value::Expr(permutation_node(&concatenate_permutations(&a, &b))?)))
    })]
}

// ============================================================================
// Circuit
// ============================================================================

fn non_empty<'a>(operation: &'static str, circuits: impl IntoIterator<Item = &'a Circuit>) -> Result<Operands> {
    let operands: Operands = circuits.into_iter().map(Value::from).collect();
    ensure!(!operands.is_empty(), NoCircuitsSnafu { operation });
    Ok(operands)
}

#[derive(Clone, PartialEq, Eq, Hash, derive_more::Display, derive_more::Debug)]
#[display("{_0}")]
#[debug("{_0:?}")]
pub struct Circuit(Expr);

impl Circuit {
    pub fn symbol(name: &str, cdim: usize) -> Result<Self> {
        let args = [Value::from(name), Value::Int(cdim as i64)];
        Ok(Self(Expr::atom(&CIRCUIT_SYMBOL, args, Kwargs::new())?))
    }

    /// Channel permutation; fails with `BadPermutation` unless `image` is a
    /// permutation of `0..n`.
    pub fn permutation(image: &[usize]) -> Result<Self> {
        ensure!(check_permutation(image), BadPermutationSnafu { permutation: image.to_vec() });
        Ok(Self(permutation_node(image)?))
    }

    /// Identity permutation on `cdim` channels.
    pub fn identity(cdim: usize) -> Result<Self> {
        Self::permutation(&(0..cdim).collect::<Vec<_>>())
    }

    /// `circuits[0] << circuits[1] << ...`; fails with `NoCircuits` when
    /// `circuits` is empty.
    pub fn series_product<'a>(circuits: impl IntoIterator<Item = &'a Circuit>) -> Result<Self> {
        let operands = non_empty("series product", circuits)?;
        Self::try_from(SERIES_PRODUCT.create(operands)?)
    }

    /// `self << other`; `other` acts first.
    pub fn series(&self, other: &Circuit) -> Result<Self> {
        Self::series_product([self, other])
    }

    /// `circuits[0] ⊞ circuits[1] ⊞ ...`; fails with `NoCircuits` when
    /// `circuits` is empty.
    pub fn concatenation<'a>(circuits: impl IntoIterator<Item = &'a Circuit>) -> Result<Self> {
        let operands = non_empty("concatenation", circuits)?;
        Self::try_from(CONCATENATION.create(operands)?)
    }

    pub fn concatenate(&self, other: &Circuit) -> Result<Self> {
        Self::concatenation([self, other])
    }

    /// Channel dimension.
    pub fn cdim(&self) -> usize {
        expr_cdim(&self.0).unwrap_or_default()
    }

    /// Image tuple, if this is a permutation.
    pub fn permutation_image(&self) -> Option<Vec<usize>> {
        image_of(&self.0)
    }

    pub fn is_identity(&self) -> bool {
        self.permutation_image().is_some_and(|image| is_identity(&image))
    }

    pub fn as_expr(&self) -> &Expr {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Expr(self.0)
    }
}

impl TryFrom<Value> for Circuit {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Expr(e) if e.kind().in_family(CIRCUIT) => Ok(Self(e)),
            other => NotASnafu { expected: "circuit", value: other.to_string() }.fail(),
        }
    }
}

impl From<Circuit> for Value {
    fn from(circuit: Circuit) -> Self {
        circuit.into_value()
    }
}

impl From<&Circuit> for Value {
    fn from(circuit: &Circuit) -> Self {
        Value::Expr(circuit.0.clone())
    }
}
