//! Pairwise fixed-point reduction of an operand chain.
//!
//! # Algorithm
//!
//! Scan adjacent pairs left to right. For each pair, try the rules in
//! declaration order; the first rule whose patterns match and whose handler
//! returns `Applied` replaces the pair by its value. The scan then resumes at
//! the pair ending in the new value (pairs further left are unchanged, so
//! this is equivalent to restarting). A full scan without a substitution
//! ends the reduction.
//!
//! Every substitution shortens the chain by one, so a chain of length `n`
//! sees at most `n - 1` substitutions.

use tracing::{debug, trace};

use crate::error::Result;
use crate::rewrite::{BinaryRule, RuleOutcome};
use crate::value::{Operands, Value};

/// Reduced chain plus the number of substitutions performed.
#[derive(Debug, Clone)]
pub struct BinaryReduction {
    pub operands: Operands,
    pub substitutions: usize,
}

fn first_applicable(rules: &[BinaryRule], lhs: &Value, rhs: &Value) -> Result<Option<(usize, Value)>> {
    for (idx, rule) in rules.iter().enumerate() {
        if let RuleOutcome::Applied(value) = rule.apply(lhs, rhs)? {
            return Ok(Some((idx, value)));
        }
    }
    Ok(None)
}

/// Fold `operands` with `rules` until no adjacent pair matches.
///
/// Handler errors propagate unchanged; `NotApplicable` never leaves the engine.
pub fn reduce_binary(kind: &'static str, rules: &[BinaryRule], operands: Operands) -> Result<BinaryReduction> {
    let mut operands = operands;
    let mut substitutions = 0;
    if rules.is_empty() {
        return Ok(BinaryReduction { operands, substitutions });
    }

    trace!(kind, rule_count = rules.len(), len = operands.len(), "reducing operand chain");
    let mut i = 0;
    while i + 1 < operands.len() {
        match first_applicable(rules, &operands[i], &operands[i + 1])? {
            Some((rule_idx, value)) => {
                debug!(kind, rule_idx, position = i, "binary rule applied");
                operands[i] = value;
                operands.remove(i + 1);
                substitutions += 1;
                i = i.saturating_sub(1);
            }
            None => i += 1,
        }
    }

    Ok(BinaryReduction { operands, substitutions })
}
