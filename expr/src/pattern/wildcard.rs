use std::fmt;
use std::sync::Arc;

use snafu::ensure;

use crate::error::{InvalidWildcardSnafu, Result};
use crate::signature::{Head, HeadSet};
use crate::value::Value;

/// How many operands a wildcard consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Cardinality {
    #[display("exactly one")]
    ExactlyOne,
    #[display("one or more")]
    OneOrMore,
    #[display("zero or more")]
    ZeroOrMore,
}

impl Cardinality {
    /// `(min, max)` operand count; `None` is unbounded.
    pub fn range(self) -> (usize, Option<usize>) {
        match self {
            Cardinality::ExactlyOne => (1, Some(1)),
            Cardinality::OneOrMore => (1, None),
            Cardinality::ZeroOrMore => (0, None),
        }
    }

    /// True for cardinalities that consume a run.
    pub fn is_open(self) -> bool {
        !matches!(self, Cardinality::ExactlyOne)
    }

    fn suffix(self) -> &'static str {
        match self {
            Cardinality::ExactlyOne => "_",
            Cardinality::OneOrMore => "__",
            Cardinality::ZeroOrMore => "___",
        }
    }
}

/// Predicate over a would-be binding, evaluated after the head constraint.
pub type Guard = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Named (or anonymous) placeholder in a pattern.
#[derive(Clone, derive_more::Debug)]
pub struct Wildcard {
    name: Option<Arc<str>>,
    cardinality: Cardinality,
    /// Any-of head constraint; empty admits everything.
    head: HeadSet,
    #[debug(skip)]
    guard: Option<Guard>,
}

impl Wildcard {
    /// Named or anonymous wildcard; an empty name is anonymous.
    ///
    /// Names must be identifiers (`[A-Za-z][A-Za-z0-9]*`), so cardinality
    /// suffixes cannot hide inside them.
    pub fn new(name: Option<&str>, cardinality: Cardinality) -> Result<Self> {
        let name = name.filter(|n| !n.is_empty());
        if let Some(text) = name {
            ensure!(is_identifier(text), InvalidWildcardSnafu { text });
        }
        Ok(Self::from_parts(name, cardinality))
    }

    pub fn exactly_one(name: &str) -> Result<Self> {
        Self::new(Some(name), Cardinality::ExactlyOne)
    }

    pub fn one_or_more(name: &str) -> Result<Self> {
        Self::new(Some(name), Cardinality::OneOrMore)
    }

    pub fn zero_or_more(name: &str) -> Result<Self> {
        Self::new(Some(name), Cardinality::ZeroOrMore)
    }

    pub fn anonymous(cardinality: Cardinality) -> Self {
        Self::from_parts(None, cardinality)
    }

    fn from_parts(name: Option<&str>, cardinality: Cardinality) -> Self {
        Self { name: name.map(Arc::from), cardinality, head: HeadSet::new(), guard: None }
    }

    /// Parse the textual form: `a`/`a_` exactly one, `a__` one or more,
    /// `a___` zero or more; an empty name is anonymous.
    pub fn parse(text: &str) -> Result<Self> {
        let base = text.trim_end_matches('_');
        let cardinality = match text.len() - base.len() {
            0 | 1 => Cardinality::ExactlyOne,
            2 => Cardinality::OneOrMore,
            3 => Cardinality::ZeroOrMore,
            _ => return InvalidWildcardSnafu { text }.fail(),
        };

        ensure!(base.is_empty() || is_identifier(base), InvalidWildcardSnafu { text });

        let name = (!base.is_empty()).then_some(base);
        Ok(Self::from_parts(name, cardinality))
    }

    /// Add an admitted head.
    pub fn with_head(mut self, head: Head) -> Self {
        self.head.push(head);
        self
    }

    pub fn with_heads(mut self, heads: impl IntoIterator<Item = Head>) -> Self {
        self.head.extend(heads);
        self
    }

    pub fn with_guard(mut self, guard: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.guard = Some(Arc::new(guard));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn name_arc(&self) -> Option<&Arc<str>> {
        self.name.as_ref()
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn head(&self) -> &[Head] {
        &self.head
    }

    pub fn is_open(&self) -> bool {
        self.cardinality.is_open()
    }

    pub fn match_range(&self) -> (usize, Option<usize>) {
        self.cardinality.range()
    }

    /// Head constraint, then guard.
    pub fn admits(&self, value: &Value) -> bool {
        Head::any_admits(&self.head, value) && self.guard.as_ref().is_none_or(|guard| guard(value))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic()) && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Parse a wildcard from its textual form; see [`Wildcard::parse`].
pub fn wc(text: &str) -> Result<Wildcard> {
    Wildcard::parse(text)
}

impl PartialEq for Wildcard {
    fn eq(&self, other: &Self) -> bool {
        let same_guard = match (&self.guard, &other.guard) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.name == other.name && self.cardinality == other.cardinality && self.head == other.head && same_guard
    }
}

impl fmt::Display for Wildcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, self.cardinality) {
            (Some(name), Cardinality::ExactlyOne) => write!(f, "{name}"),
            (Some(name), c) => write!(f, "{name}{}", c.suffix()),
            (None, c) => write!(f, "{}", c.suffix()),
        }
    }
}
