//! Immutable-expression term-rewriting engine.
//!
//! Algebraic structures are declared as [`Kind`]s: a signature, a neutral
//! element, an ordered simplification pipeline and binary rules. Instances
//! are created through [`Kind::create`], which validates the operands, runs
//! the pipeline and builds an immutable, hash-stable [`Expr`].
//!
//! # Module Organization
//!
//! - [`value`] - literal values and operand lists
//! - [`expr`] - expression nodes, singletons, cached representations
//! - [`kind`] - kind descriptors
//! - [`signature`] - declarative operand signatures
//! - [`simplify`] - pipeline steps and `create`
//! - [`pattern`] - wildcards, patterns and the matcher
//! - [`rewrite`] - binary rule reduction
//! - [`config`] - rendering configuration
//! - [`error`] - error types and result handling

pub mod config;
pub mod error;
pub mod expr;
pub mod kind;
pub mod prelude;
pub mod signature;
pub mod value;

#[macro_use]
pub mod pattern;
pub mod rewrite;
pub mod simplify;


pub use config::PrintConfig;
pub use error::{DomainError, Error, Result};
pub use expr::Expr;
pub use kind::{Kind, KindId, Role};
pub use pattern::{Binding, Cardinality, Match, Pattern, PatternTuple, Wildcard, match_pattern, wc};
pub use rewrite::{BinaryRule, RuleOutcome};
pub use signature::{Head, Signature, SignatureViolation};
pub use simplify::create::create;
pub use simplify::{Outcome, Simplification};
pub use value::{Kwargs, Operands, Value};
