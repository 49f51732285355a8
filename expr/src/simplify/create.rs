//! Canonical construction of operations.

use snafu::ensure;
use tracing::{debug, trace};

use crate::error::{Result, WrongRoleSnafu};
use crate::expr::Expr;
use crate::kind::{Kind, Role};
use crate::simplify::Outcome;
use crate::value::{Kwargs, Operands, Value};

impl Kind {
    /// Create an instance from operands, running the simplification pipeline.
    ///
    /// The result may be a different value than a node of this kind (a
    /// neutral element, a single unwrapped operand, a reduced literal).
    pub fn create(&'static self, operands: impl IntoIterator<Item = Value>) -> Result<Value> {
        self.create_kw(operands, Kwargs::new())
    }

    /// [`Kind::create`] with keyword arguments.
    pub fn create_kw(&'static self, operands: impl IntoIterator<Item = Value>, kwargs: Kwargs) -> Result<Value> {
        create(self, operands.into_iter().collect(), kwargs)
    }
}

/// Validate, simplify and build.
///
/// 1. check the signature (fails with `WrongSignature`)
/// 2. run every step in order; a `Replace` outcome is returned as-is
/// 3. build the immutable node from the final parts
pub fn create(kind: &'static Kind, operands: Operands, kwargs: Kwargs) -> Result<Value> {
    ensure!(
        kind.role() == Role::Operation,
        WrongRoleSnafu { kind: kind.name(), expected: Role::Operation, actual: kind.role() }
    );
    kind.signature().check(kind.name(), &operands, &kwargs)?;

    let mut operands = operands;
    let mut kwargs = kwargs;
    for step in kind.simplifications() {
        trace!(kind = kind.name(), step = step.name(), operands = operands.len(), "simplification step");
        match step.apply(kind, operands, kwargs)? {
            Outcome::Continue(next_operands, next_kwargs) => {
                operands = next_operands;
                kwargs = next_kwargs;
            }
            Outcome::Replace(value) => {
                debug!(kind = kind.name(), step = step.name(), "simplification replaced construction");
                return Ok(value);
            }
        }
    }

    Ok(Value::Expr(Expr::from_parts(kind, operands, kwargs)))
}
