//! Binary rule rewriting.
//!
//! A kind with the `match_replace_binary` step folds its operand chain with
//! an ordered list of [`BinaryRule`]s until no adjacent pair matches any rule.

pub mod engine;

use std::sync::Arc;

use crate::error::Result;
use crate::pattern::{Match, Pattern};
use crate::value::Value;

pub use engine::{BinaryReduction, reduce_binary};

// =============================================================================
// RuleOutcome - Result of a rule handler
// =============================================================================

/// Result of applying a binary rule handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// Handler declined; the engine tries the next rule.
    NotApplicable,
    /// Both operands of the pair are replaced by this value.
    Applied(Value),
}

pub type RuleHandler = Arc<dyn Fn(&Match) -> Result<RuleOutcome> + Send + Sync>;

/// Pair of patterns plus the handler called with their merged bindings.
#[derive(Clone, derive_more::Debug)]
pub struct BinaryRule {
    lhs: Pattern,
    rhs: Pattern,
    #[debug(skip)]
    handler: RuleHandler,
}

impl BinaryRule {
    pub fn new(
        lhs: impl Into<Pattern>,
        rhs: impl Into<Pattern>,
        handler: impl Fn(&Match) -> Result<RuleOutcome> + Send + Sync + 'static,
    ) -> Self {
        Self { lhs: lhs.into(), rhs: rhs.into(), handler: Arc::new(handler) }
    }

    pub fn lhs(&self) -> &Pattern {
        &self.lhs
    }

    pub fn rhs(&self) -> &Pattern {
        &self.rhs
    }

    /// Match both patterns against the pair; `None` if either fails or the
    /// bindings conflict.
    pub fn match_pair(&self, lhs: &Value, rhs: &Value) -> Option<Match> {
        self.lhs.match_value(lhs)?.merge(self.rhs.match_value(rhs)?)
    }

    /// Match and, on success, run the handler.
    pub fn apply(&self, lhs: &Value, rhs: &Value) -> Result<RuleOutcome> {
        match self.match_pair(lhs, rhs) {
            Some(m) => (self.handler)(&m),
            None => Ok(RuleOutcome::NotApplicable),
        }
    }
}
