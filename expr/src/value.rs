//! Values that participate in the algebra.
//!
//! A [`Value`] is either a raw literal (integers, floats, complex numbers,
//! strings, tuples) or an [`Expr`] node. Literals appear as operands of
//! operations, as keyword arguments and as pattern literals.
//!
//! Floats compare and hash by bit pattern so that `Value` can implement
//! `Eq`, `Ord` and `Hash` (the same trade-off the numeric constant types of
//! most IRs make). `-0.0` and `0.0` are therefore different values.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use smallvec::SmallVec;

use crate::expr::Expr;

/// Operand list carried through the simplification pipeline.
pub type Operands = SmallVec<[Value; 4]>;

/// Keyword arguments of a node, kept sorted so they take part in identity.
pub type Kwargs = BTreeMap<&'static str, Value>;

#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Complex { re: f64, im: f64 },
    Str(Arc<str>),
    Tuple(Arc<[Value]>),
    Expr(Expr),
}

impl Value {
    pub fn complex(re: f64, im: f64) -> Self {
        Value::Complex { re, im }
    }

    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(items.into_iter().collect())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items.as_ref()),
            _ => None,
        }
    }

    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Value::Expr(e) => Some(e),
            _ => None,
        }
    }

    /// True for integer, float and complex literals.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::Complex { .. })
    }

    /// Short type name used in diagnostics.
    pub fn head_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Complex { .. } => "complex",
            Value::Str(_) => "str",
            Value::Tuple(_) => "tuple",
            Value::Expr(e) => e.kind().name(),
        }
    }

    /// Rank of the variant in the structural total order.
    fn rank(&self) -> u8 {
        match self {
            Value::Int(_) => 0,
            Value::Float(_) => 1,
            Value::Complex { .. } => 2,
            Value::Str(_) => 3,
            Value::Tuple(_) => 4,
            Value::Expr(_) => 5,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Complex { re: ar, im: ai }, Value::Complex { re: br, im: bi }) => {
                ar.to_bits() == br.to_bits() && ai.to_bits() == bi.to_bits()
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Expr(a), Value::Expr(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Complex { re, im } => {
                re.to_bits().hash(state);
                im.to_bits().hash(state);
            }
            Value::Str(s) => s.hash(state),
            Value::Tuple(items) => items.hash(state),
            Value::Expr(e) => e.hash(state),
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Complex { re: ar, im: ai }, Value::Complex { re: br, im: bi }) => {
                ar.total_cmp(br).then_with(|| ai.total_cmp(bi))
            }
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Tuple(a), Value::Tuple(b)) => a.cmp(b),
            (Value::Expr(a), Value::Expr(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Value::Str(s)
    }
}

impl From<Expr> for Value {
    fn from(e: Expr) -> Self {
        Value::Expr(e)
    }
}

impl From<&Expr> for Value {
    fn from(e: &Expr) -> Self {
        Value::Expr(e.clone())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Tuple(items.into())
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

/// Build an [`Operands`] list, converting every element with `Value::from`.
///
/// ```ignore
/// let ops = operands![1, 2.5, "hallo", inner];
/// ```
#[macro_export]
macro_rules! operands {
    ($($x:expr),* $(,)?) => {
        <$crate::Operands as ::core::iter::FromIterator<$crate::Value>>::from_iter([$($crate::Value::from($x)),*])
    };
}
