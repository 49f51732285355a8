//! Immutable expression nodes.
//!
//! An [`Expr`] is a cheap-to-clone handle (`Arc`) to an [`ExprNode`]: the
//! kind, the canonical positional arguments and the keyword arguments. The
//! identity hash is computed once at construction; the str, TeX and
//! structural forms are computed lazily and cached in write-once cells.
//!
//! # Construction
//!
//! - [`Kind::create`](crate::Kind::create) for operation kinds (runs the
//!   simplification pipeline)
//! - [`Expr::atom`] for leaf kinds
//! - [`Expr::singleton`] for singleton kinds (process-wide instance)

pub mod cached_property;
pub mod print;
pub mod singleton;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::{Arc, OnceLock};

use snafu::ensure;

use crate::error::{Result, WrongRoleSnafu};
use crate::kind::{Kind, Role};
use crate::value::{Kwargs, Operands, Value};

pub struct ExprNode {
    kind: &'static Kind,
    args: Operands,
    kwargs: Kwargs,
    /// Identity hash, fixed at construction.
    hash: u64,

    pub(crate) str_cache: OnceLock<String>,
    pub(crate) tex_cache: OnceLock<String>,
    pub(crate) srepr_cache: OnceLock<String>,
}

#[derive(Clone)]
pub struct Expr(Arc<ExprNode>);

impl Expr {
    /// Build the node. Callers have already validated and simplified the parts.
    pub(crate) fn from_parts(kind: &'static Kind, args: Operands, kwargs: Kwargs) -> Self {
        let mut hasher = DefaultHasher::new();
        kind.id().hash(&mut hasher);
        args.hash(&mut hasher);
        kwargs.hash(&mut hasher);

        Self(Arc::new(ExprNode {
            kind,
            args,
            kwargs,
            hash: hasher.finish(),
            str_cache: OnceLock::new(),
            tex_cache: OnceLock::new(),
            srepr_cache: OnceLock::new(),
        }))
    }

    /// Build a leaf of an atom kind after checking its signature.
    pub fn atom(kind: &'static Kind, args: impl IntoIterator<Item = Value>, kwargs: Kwargs) -> Result<Self> {
        ensure!(
            kind.role() == Role::Atom,
            WrongRoleSnafu { kind: kind.name(), expected: Role::Atom, actual: kind.role() }
        );
        let args: Operands = args.into_iter().collect();
        kind.signature().check(kind.name(), &args, &kwargs)?;
        Ok(Self::from_parts(kind, args, kwargs))
    }

    pub fn kind(&self) -> &'static Kind {
        self.0.kind
    }

    /// Positional arguments; for operations these are the operands.
    pub fn args(&self) -> &[Value] {
        &self.0.args
    }

    pub fn operands(&self) -> &[Value] {
        &self.0.args
    }

    pub fn kwargs(&self) -> &Kwargs {
        &self.0.kwargs
    }

    pub fn kwarg(&self, name: &str) -> Option<&Value> {
        self.0.kwargs.get(name)
    }

    /// True if this node is of the given kind.
    pub fn is(&self, kind: &Kind) -> bool {
        self.0.kind.id() == kind.id()
    }

    pub fn is_singleton(&self) -> bool {
        self.0.kind.role() == Role::Singleton
    }

    /// True if both handles point at the same node.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    pub(crate) fn node(&self) -> &ExprNode {
        &self.0
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        self.0.hash == other.0.hash
            && self.0.kind.id() == other.0.kind.id()
            && self.0.args == other.0.args
            && self.0.kwargs == other.0.kwargs
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl Ord for Expr {
    fn cmp(&self, other: &Self) -> Ordering {
        if Arc::ptr_eq(&self.0, &other.0) {
            return Ordering::Equal;
        }
        self.0
            .kind
            .name()
            .cmp(other.0.kind.name())
            .then_with(|| self.0.kind.id().cmp(&other.0.kind.id()))
            .then_with(|| self.0.args.cmp(&other.0.args))
            .then_with(|| self.0.kwargs.cmp(&other.0.kwargs))
    }
}

impl PartialOrd for Expr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.srepr())
    }
}
