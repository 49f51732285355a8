//! Hilbert space algebra.
//!
//! Spaces are expressions of the `hilbert_space` family:
//!
//! - [`TRIVIAL_SPACE`]: one-dimensional, a tensor factor of every space
//! - [`FULL_SPACE`]: contains every space as a tensor factor
//! - [`LOCAL_SPACE`]: one degree of freedom, optionally with a basis
//! - [`PRODUCT_SPACE`]: tensor product of local spaces
//!
//! [`HilbertSpace`] wraps such an expression and provides the factor
//! algebra (tensor, remove, intersect) and the subfactor order.

use std::sync::{Arc, LazyLock};

use bon::bon;
use smallvec::SmallVec;
use snafu::{OptionExt, ensure};
use tracing::{debug, trace};

use qalg_expr::{Expr, Head, Kind, Kwargs, Operands, Outcome, PrintConfig, Role, Signature, Simplification, Value};

use crate::error::{BasisNotSetSnafu, Error, IncompatibleBasisSnafu, NotASnafu, Result, UndefinedFactorsSnafu};

/// Kind family shared by every Hilbert space kind.
pub const HILBERT_SPACE: &str = "hilbert_space";

pub type Factors = SmallVec<[HilbertSpace; 4]>;

// ============================================================================
// Kinds
// ============================================================================

pub static TRIVIAL_SPACE: LazyLock<Kind> = LazyLock::new(|| {
    Kind::builder()
        .name("TrivialSpace")
        .role(Role::Singleton)
        .families(vec![HILBERT_SPACE])
        .render_str(|_, config| format!("{}_null", hilbert_symbol(config)))
        .render_tex(|_, _| r"\mathcal{H}_{\rm null}".to_string())
        .build()
});

pub static FULL_SPACE: LazyLock<Kind> = LazyLock::new(|| {
    Kind::builder()
        .name("FullSpace")
        .role(Role::Singleton)
        .families(vec![HILBERT_SPACE])
        .render_str(|_, config| format!("{}_total", hilbert_symbol(config)))
        .render_tex(|_, _| r"\mathcal{H}_{\rm total}".to_string())
        .build()
});

/// `LocalSpace(name, basis=..., dimension=...)`; the keywords are either both
/// present or both absent.
pub static LOCAL_SPACE: LazyLock<Kind> = LazyLock::new(|| {
    Kind::builder()
        .name("LocalSpace")
        .role(Role::Atom)
        .families(vec![HILBERT_SPACE])
        .signature(Signature::empty().positional([Head::Str]).keywords(["basis", "dimension"]))
        .render_str(|e, config| format!("{}_{}", hilbert_symbol(config), local_name(e)))
        .render_tex(|e, _| format!(r"\mathcal{{H}}_{{{}}}", local_name(e)))
        .build()
});

pub static PRODUCT_SPACE: LazyLock<Kind> = LazyLock::new(|| {
    Kind::builder()
        .name("ProductSpace")
        .families(vec![HILBERT_SPACE])
        .signature(Signature::empty().variadic([Head::Family(HILBERT_SPACE), Head::Str, Head::Int]))
        .neutral_element(|| HilbertSpace::trivial().into_value())
        .order_key(space_order_key)
        .simplifications(vec![
            Simplification::new("convert_labels", convert_labels),
            Simplification::new("absorb_full", absorb_full),
            Simplification::ASSOC,
            Simplification::IDEM,
            Simplification::FILTER_NEUTRAL,
        ])
        .render_str(|e, config| {
            let sep = if config.unicode { " ⊗ " } else { " * " };
            join_operands(e, sep, |v| v.render(config))
        })
        .render_tex(|e, config| join_operands(e, r" \otimes ", |v| v.render_tex(config)))
        .build()
});

fn hilbert_symbol(config: &PrintConfig) -> &'static str {
    if config.unicode { "ℌ" } else { "H" }
}

fn local_name(e: &Expr) -> &str {
    e.args().first().and_then(Value::as_str).unwrap_or_default()
}

fn join_operands(e: &Expr, sep: &str, render: impl Fn(&Value) -> String) -> String {
    e.operands().iter().map(render).collect::<Vec<_>>().join(sep)
}

/// Local spaces sort by name.
fn space_order_key(value: &Value) -> Value {
    match value.as_expr() {
        Some(e) if e.is(&LOCAL_SPACE) => e.args().first().cloned().unwrap_or_else(|| value.clone()),
        _ => value.clone(),
    }
}

/// Raw string and integer labels become local spaces without a basis.
fn convert_labels(kind: &'static Kind, operands: Operands, kwargs: Kwargs) -> qalg_expr::Result<Outcome> {
    let mut converted = Operands::with_capacity(operands.len());
    for op in operands {
        let label = match &op {
            Value::Str(s) => Value::Str(s.clone()),
            Value::Int(i) => Value::from(i.to_string()),
            _ => {
                converted.push(op);
                continue;
            }
        };
        trace!(kind = kind.name(), %label, "converting label to local space");
        converted.push(Value::Expr(Expr::atom(&LOCAL_SPACE, [label], Kwargs::new())?));
    }
    Ok(Outcome::Continue(converted, kwargs))
}

/// Any full-space factor makes the product the full space.
fn absorb_full(kind: &'static Kind, operands: Operands, kwargs: Kwargs) -> qalg_expr::Result<Outcome> {
    if operands.iter().any(|op| op.as_expr().is_some_and(|e| e.is(&FULL_SPACE))) {
        debug!(kind = kind.name(), operands = operands.len(), "full space absorbs product");
        return Ok(Outcome::Replace(Value::Expr(Expr::singleton(&FULL_SPACE)?)));
    }
    Ok(Outcome::Continue(operands, kwargs))
}

// ============================================================================
// Label
// ============================================================================

/// Name of a local space; integers are used through their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{_0}")]
pub struct Label(Arc<str>);

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label(Arc::from(s))
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label(Arc::from(s))
    }
}

impl From<i64> for Label {
    fn from(i: i64) -> Self {
        Label(Arc::from(i.to_string()))
    }
}

impl From<usize> for Label {
    fn from(i: usize) -> Self {
        Label(Arc::from(i.to_string()))
    }
}

// ============================================================================
// HilbertSpace
// ============================================================================

enum Shape {
    Trivial,
    Full,
    Local,
    Product,
}

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display, derive_more::Debug)]
#[display("{_0}")]
#[debug("{_0:?}")]
pub struct HilbertSpace(Expr);

#[bon]
impl HilbertSpace {
    /// Local space for one degree of freedom.
    ///
    /// `dimension` alone implies the basis `0..dimension`; when both are
    /// given they must agree.
    #[builder(finish_fn = build)]
    pub fn local(
        #[builder(start_fn, into)] label: Label,
        basis: Option<Vec<Value>>,
        dimension: Option<usize>,
    ) -> Result<Self> {
        let basis = match (basis, dimension) {
            (Some(basis), Some(dimension)) => {
                ensure!(basis.len() == dimension, IncompatibleBasisSnafu { basis: basis.len(), dimension });
                Some(basis)
            }
            (Some(basis), None) => Some(basis),
            (None, Some(dimension)) => Some((0..dimension as i64).map(Value::Int).collect()),
            (None, None) => None,
        };

        let mut kwargs = Kwargs::new();
        if let Some(basis) = basis {
            kwargs.insert("dimension", Value::Int(basis.len() as i64));
            kwargs.insert("basis", Value::tuple(basis));
        }
        Ok(Self(Expr::atom(&LOCAL_SPACE, [Value::Str(label.0)], kwargs)?))
    }
}

impl HilbertSpace {
    pub fn trivial() -> Self {
        Self(Expr::singleton(&TRIVIAL_SPACE).expect("TrivialSpace is a singleton kind"))
    }

    pub fn full() -> Self {
        Self(Expr::singleton(&FULL_SPACE).expect("FullSpace is a singleton kind"))
    }

    /// Tensor product of spaces or raw labels.
    pub fn product<I, T>(factors: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::try_from(PRODUCT_SPACE.create(factors.into_iter().map(Into::into))?)
    }

    pub fn tensor(&self, other: &HilbertSpace) -> Result<Self> {
        Self::product([self, other])
    }

    pub fn as_expr(&self) -> &Expr {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Expr(self.0)
    }

    fn shape(&self) -> Shape {
        if self.0.is(&TRIVIAL_SPACE) {
            Shape::Trivial
        } else if self.0.is(&FULL_SPACE) {
            Shape::Full
        } else if self.0.is(&LOCAL_SPACE) {
            Shape::Local
        } else {
            Shape::Product
        }
    }

    pub fn is_trivial(&self) -> bool {
        matches!(self.shape(), Shape::Trivial)
    }

    pub fn is_full(&self) -> bool {
        matches!(self.shape(), Shape::Full)
    }

    pub fn is_local(&self) -> bool {
        matches!(self.shape(), Shape::Local)
    }

    pub fn is_product(&self) -> bool {
        matches!(self.shape(), Shape::Product)
    }

    /// Name of a local space.
    pub fn name(&self) -> Option<&str> {
        self.is_local().then(|| local_name(&self.0))
    }

    /// Local spaces whose tensor product is this space.
    ///
    /// Fails with `UndefinedFactors` for the full space.
    pub fn local_factors(&self) -> Result<Factors> {
        match self.shape() {
            Shape::Trivial => Ok(Factors::new()),
            Shape::Full => UndefinedFactorsSnafu { space: self.to_string() }.fail(),
            Shape::Local => Ok(Factors::from_elem(self.clone(), 1)),
            Shape::Product => self.0.operands().iter().cloned().map(Self::try_from).collect(),
        }
    }

    /// Drop the factors of `other` from this space.
    pub fn remove(&self, other: &HilbertSpace) -> Result<Self> {
        match self.shape() {
            Shape::Trivial => Ok(self.clone()),
            Shape::Full => UndefinedFactorsSnafu { space: self.to_string() }.fail(),
            Shape::Local | Shape::Product => {
                if other.is_full() {
                    return Ok(Self::trivial());
                }
                let removed = other.local_factors()?;
                Self::product(self.local_factors()?.into_iter().filter(|f| !removed.contains(f)))
            }
        }
    }

    /// Mutual tensor factors.
    pub fn intersect(&self, other: &HilbertSpace) -> Result<Self> {
        match self.shape() {
            Shape::Trivial => Ok(self.clone()),
            Shape::Full => Ok(other.clone()),
            Shape::Local | Shape::Product => {
                if other.is_full() {
                    return Ok(self.clone());
                }
                let theirs = other.local_factors()?;
                Self::product(self.local_factors()?.into_iter().filter(|f| theirs.contains(f)))
            }
        }
    }

    /// True if this space is a tensor factor of `other` and not equal to it.
    pub fn is_strict_subfactor_of(&self, other: &HilbertSpace) -> bool {
        match self.shape() {
            Shape::Trivial => !other.is_trivial(),
            Shape::Full => false,
            Shape::Local | Shape::Product => {
                if other.is_full() {
                    return true;
                }
                if !other.is_product() {
                    return false;
                }
                let theirs = other.0.operands();
                if self.is_local() {
                    return theirs.iter().any(|f| f.as_expr() == Some(&self.0));
                }
                let ours = self.0.operands();
                ours.len() < theirs.len() && ours.iter().all(|f| theirs.contains(f))
            }
        }
    }

    /// `self <= other` in the subfactor order.
    pub fn is_tensor_factor_of(&self, other: &HilbertSpace) -> bool {
        self == other || self.is_strict_subfactor_of(other)
    }

    /// `self < other` in the subfactor order.
    pub fn is_strict_tensor_factor_of(&self, other: &HilbertSpace) -> bool {
        self.is_strict_subfactor_of(other)
    }

    /// Dimension, if every factor has a basis.
    pub fn dimension(&self) -> Option<usize> {
        match self.shape() {
            Shape::Trivial => Some(1),
            Shape::Full => None,
            Shape::Local => self.0.kwarg("dimension").and_then(Value::as_int).and_then(|d| usize::try_from(d).ok()),
            Shape::Product => self.local_factors().ok()?.iter().map(HilbertSpace::dimension).product(),
        }
    }

    /// Basis labels, if every factor has a basis.
    ///
    /// Product bases are the cartesian product of the factor bases, each
    /// label joined with `,`.
    pub fn basis(&self) -> Option<Vec<Value>> {
        match self.shape() {
            Shape::Trivial => Some(vec![Value::from("empty")]),
            Shape::Full => None,
            Shape::Local => self.0.kwarg("basis").and_then(Value::as_tuple).map(<[Value]>::to_vec),
            Shape::Product => {
                let bases = self.local_factors().ok()?.iter().map(HilbertSpace::basis).collect::<Option<Vec<_>>>()?;
                let mut labels: Vec<String> = vec![String::new()];
                for (i, basis) in bases.iter().enumerate() {
                    labels = labels
                        .iter()
                        .flat_map(|prefix| {
                            basis.iter().map(move |b| if i == 0 { b.to_string() } else { format!("{prefix},{b}") })
                        })
                        .collect();
                }
                Some(labels.into_iter().map(Value::from).collect())
            }
        }
    }

    /// [`HilbertSpace::dimension`], or `BasisNotSet`.
    pub fn get_dimension(&self) -> Result<usize> {
        self.dimension().context(BasisNotSetSnafu { space: self.to_string() })
    }

    /// [`HilbertSpace::basis`], or `BasisNotSet`.
    pub fn get_basis(&self) -> Result<Vec<Value>> {
        self.basis().context(BasisNotSetSnafu { space: self.to_string() })
    }
}

impl TryFrom<Value> for HilbertSpace {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Expr(e) if e.kind().in_family(HILBERT_SPACE) => Ok(Self(e)),
            other => NotASnafu { expected: "Hilbert space", value: other.to_string() }.fail(),
        }
    }
}

impl From<HilbertSpace> for Value {
    fn from(space: HilbertSpace) -> Self {
        space.into_value()
    }
}

impl From<&HilbertSpace> for Value {
    fn from(space: &HilbertSpace) -> Self {
        Value::Expr(space.0.clone())
    }
}
