//! Wildcard pattern language and matcher.
//!
//! - [`Wildcard`] / [`wc`] - named placeholders with cardinality, head and guard
//! - [`Pattern`] / [`PatternTuple`] - literals, wildcards and operation patterns
//! - [`Match`] - bindings produced by a successful match
//!
//! ```ignore
//! let a = wc("a__")?.with_head(Head::Int);
//! let pattern = Pattern::operation(&DUMMY1, patterns![1, a, 2])?;
//! let m = match_pattern(&pattern, &DUMMY1.create(operands![1, 3, 4, 2])?);
//! assert_eq!(m.and_then(|m| m.run("a").map(<[_]>::to_vec)), Some(vec![3.into(), 4.into()]));
//! ```

pub mod matcher;
pub mod tuple;
pub mod wildcard;

pub use matcher::{Binding, Match, match_pattern};
pub use tuple::{Pattern, PatternTuple};
pub use wildcard::{Cardinality, Guard, Wildcard, wc};
