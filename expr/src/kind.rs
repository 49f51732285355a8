//! Kind descriptors.
//!
//! A [`Kind`] is the static description of one expression type: its name,
//! role, signature, neutral element, simplification pipeline, binary rules,
//! order key and renderers. Kinds are declared once per process, usually as
//! `static X: LazyLock<Kind> = LazyLock::new(|| Kind::builder()...build());`,
//! and every [`Expr`] holds a `&'static Kind`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

use bon::bon;
use smallvec::SmallVec;

use crate::config::PrintConfig;
use crate::expr::Expr;
use crate::rewrite::BinaryRule;
use crate::signature::Signature;
use crate::simplify::Simplification;
use crate::value::Value;

/// Maps an operand to the value it is sorted by.
pub type OrderKeyFn = fn(&Value) -> Value;

/// Kind-specific renderer for the str or TeX form.
pub type RenderFn = fn(&Expr, &PrintConfig) -> String;

static KIND_ID_COUNTER: AtomicU32 = AtomicU32::new(0);

fn next_kind_id() -> KindId {
    KindId(KIND_ID_COUNTER.fetch_add(1, AtomicOrdering::Relaxed))
}

/// Process-unique kind identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KindId(u32);

/// How instances of a kind are constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
pub enum Role {
    /// Leaf built directly from its arguments (`Expr::atom`).
    #[display("atom")]
    Atom,
    /// Exactly one argument-free instance per process (`Expr::singleton`).
    #[display("singleton")]
    Singleton,
    /// Built through the simplification pipeline (`Kind::create`).
    #[default]
    #[display("operation")]
    Operation,
}

/// Static description of one expression type.
///
/// The signature is checked against the raw operands, before any
/// simplification step runs. A flat kind (one with `ASSOC`) must therefore
/// admit its own instances in its signature, e.g. through a family head,
/// or nested construction fails with `WrongSignature`.
pub struct Kind {
    id: KindId,
    name: &'static str,
    role: Role,
    families: SmallVec<[&'static str; 2]>,
    signature: Signature,
    neutral_element: Option<fn() -> Value>,
    simplifications: Vec<Simplification>,
    binary_rules: Vec<BinaryRule>,
    order_key: Option<OrderKeyFn>,
    render_str: Option<RenderFn>,
    render_tex: Option<RenderFn>,
}

#[bon]
impl Kind {
    #[builder]
    pub fn new(
        name: &'static str,
        #[builder(default)] role: Role,
        #[builder(default)] families: Vec<&'static str>,
        #[builder(default)] signature: Signature,
        neutral_element: Option<fn() -> Value>,
        #[builder(default)] simplifications: Vec<Simplification>,
        #[builder(default)] binary_rules: Vec<BinaryRule>,
        order_key: Option<OrderKeyFn>,
        render_str: Option<RenderFn>,
        render_tex: Option<RenderFn>,
    ) -> Self {
        Self {
            id: next_kind_id(),
            name,
            role,
            families: families.into_iter().collect(),
            signature,
            neutral_element,
            simplifications,
            binary_rules,
            order_key,
            render_str,
            render_tex,
        }
    }
}

impl Kind {
    pub fn id(&self) -> KindId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn families(&self) -> &[&'static str] {
        &self.families
    }

    pub fn in_family(&self, family: &str) -> bool {
        self.families.iter().any(|f| *f == family)
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Fresh copy of the neutral element, if the kind declares one.
    pub fn neutral_element(&self) -> Option<Value> {
        self.neutral_element.map(|make| make())
    }

    pub fn simplifications(&self) -> &[Simplification] {
        &self.simplifications
    }

    pub fn binary_rules(&self) -> &[BinaryRule] {
        &self.binary_rules
    }

    /// Total order used by the ordering and idempotence steps.
    ///
    /// Compares order keys first, then falls back to the structural order so
    /// that distinct values never tie.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        match self.order_key {
            Some(key) => key(a).cmp(&key(b)).then_with(|| a.cmp(b)),
            None => a.cmp(b),
        }
    }

    pub(crate) fn render_str_fn(&self) -> Option<RenderFn> {
        self.render_str
    }

    pub(crate) fn render_tex_fn(&self) -> Option<RenderFn> {
        self.render_tex
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Kind {}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kind")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("families", &self.families)
            .field("simplifications", &self.simplifications)
            .field("binary_rules", &self.binary_rules.len())
            .finish_non_exhaustive()
    }
}
