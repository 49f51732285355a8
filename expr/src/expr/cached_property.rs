//! Write-once derived representations of an [`Expr`].
//!
//! Each property is a marker type implementing [`CachedProperty`], backed by
//! an explicit `OnceLock` field on the node. The value is computed on first
//! access and then shared by every clone of the handle. Concurrent first
//! accesses may both compute, but only one result is stored and all callers
//! observe it; the computation is pure, so the results are equal anyway.
//!
//! Children cache their own forms: rendering a parent calls
//! `CachedProperty::get` on operands, so a shared subtree is rendered once.

use std::sync::OnceLock;

use crate::expr::Expr;

pub trait CachedProperty: Sized + 'static {
    type Value;

    /// Compute the property for one node. May call `Self::get` on children.
    fn compute(expr: &Expr) -> Self::Value;

    /// The cache cell on the node.
    fn cache(expr: &Expr) -> &OnceLock<Self::Value>;

    fn get(expr: &Expr) -> &Self::Value {
        // Fast path: already cached
        if let Some(val) = Self::cache(expr).get() {
            return val;
        }
        Self::cache(expr).get_or_init(|| Self::compute(expr))
    }
}

/// Define a cached property backed by a `OnceLock` field of `ExprNode`.
///
/// ```ignore
/// cached_property! {
///     TexForm: String {
///         cache_field: tex_cache,
///         compute: |expr| expr.render_tex(PrintConfig::global())
///     }
/// }
/// ```
macro_rules! cached_property {
    (
        $(#[$meta:meta])*
        $name:ident: $value_type:ty {
            cache_field: $cache_field:ident,
            compute: $compute:expr
        }
    ) => {
        $(#[$meta])*
        pub struct $name;

        impl $crate::expr::cached_property::CachedProperty for $name {
            type Value = $value_type;

            fn compute(expr: &$crate::expr::Expr) -> Self::Value {
                let compute_fn: fn(&$crate::expr::Expr) -> Self::Value = $compute;
                compute_fn(expr)
            }

            fn cache(expr: &$crate::expr::Expr) -> &std::sync::OnceLock<Self::Value> {
                &expr.node().$cache_field
            }
        }
    };
}

pub(crate) use cached_property;
