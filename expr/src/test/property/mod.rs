//! Property-based tests for canonical construction, rule reduction and matches.
//!
//! Uses proptest to verify invariants across wide input spaces.

#[cfg(test)]
mod canonical;
