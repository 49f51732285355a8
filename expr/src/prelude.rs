//! Common imports for declaring kinds and rules.
//!
//! ```ignore
//! use qalg_expr::prelude::*;
//! ```

pub use crate::config::PrintConfig;
pub use crate::error::{Error, Result};
pub use crate::expr::Expr;
pub use crate::kind::{Kind, Role};
pub use crate::pattern::{Binding, Cardinality, Match, Pattern, PatternTuple, Wildcard, match_pattern, wc};
pub use crate::rewrite::{BinaryRule, RuleOutcome};
pub use crate::signature::{Head, Signature};
pub use crate::simplify::{Outcome, Simplification};
pub use crate::value::{Kwargs, Operands, Value};
pub use crate::{operands, patterns};
