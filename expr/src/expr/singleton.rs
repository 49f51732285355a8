//! Process-wide singleton registry.
//!
//! Singleton kinds (trivial/full spaces, neutral sentinels) have exactly one
//! instance per process. The registry is a lock-free concurrent map from
//! [`KindId`] to the instance; the first thread to insert wins and every
//! other thread receives the winner, so `Expr::ptr_eq` holds across threads.

use std::sync::OnceLock;

use papaya::HashMap;
use smallvec::SmallVec;
use snafu::ensure;
use tracing::trace;

use crate::error::{Result, WrongRoleSnafu};
use crate::expr::Expr;
use crate::kind::{Kind, KindId, Role};
use crate::value::Kwargs;

static SINGLETONS: OnceLock<HashMap<KindId, Expr>> = OnceLock::new();

fn singletons() -> &'static HashMap<KindId, Expr> {
    SINGLETONS.get_or_init(HashMap::new)
}

impl Expr {
    /// The unique instance of a singleton kind; fails with `WrongRole` for
    /// any other kind.
    ///
    /// Thread-safe: concurrent first calls race on one compute-or-fetch and
    /// all of them return the same node.
    pub fn singleton(kind: &'static Kind) -> Result<Self> {
        use papaya::{Compute, Operation};

        ensure!(
            kind.role() == Role::Singleton,
            WrongRoleSnafu { kind: kind.name(), expected: Role::Singleton, actual: kind.role() }
        );

        let map = singletons();
        let guard = map.guard();

        if let Some(existing) = map.get(&kind.id(), &guard) {
            return Ok(existing.clone());
        }

        let fresh = Expr::from_parts(kind, SmallVec::new(), Kwargs::new());
        let result = map.compute(
            kind.id(),
            |entry| match entry {
                Some((_, existing)) => Operation::Abort(existing.clone()),
                None => Operation::Insert(fresh.clone()),
            },
            &guard,
        );

        Ok(match result {
            Compute::Aborted(existing) => existing,
            Compute::Inserted(_, _) => {
                trace!(kind = kind.name(), "singleton initialized");
                fresh
            }
            _ => fresh,
        })
    }
}
