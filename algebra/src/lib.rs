//! Quantum-network vocabularies built on the `qalg-expr` rewriting engine.
//!
//! # Module Organization
//!
//! - [`hilbert`] - trivial, full, local and product Hilbert spaces
//! - [`permutation`] - image-tuple permutation utilities
//! - [`circuit`] - circuit symbols, channel permutations, series products
//!   and concatenations
//! - [`error`] - error types; engine errors raised by this crate's own
//!   steps and rules are unwrapped back at the API boundary

pub mod circuit;
pub mod error;
pub mod hilbert;
pub mod permutation;

pub use circuit::{CIRCUIT, Circuit};
pub use error::{Error, Result};
pub use hilbert::{HILBERT_SPACE, HilbertSpace, Label};
