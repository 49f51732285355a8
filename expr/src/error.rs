use std::sync::Arc;

use snafu::Snafu;

use crate::kind::Role;
use crate::signature::SignatureViolation;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error raised by a consumer's converter or rule handler.
///
/// The engine never inspects it; it travels through `create` unchanged.
pub type DomainError = Arc<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Operands or keyword arguments do not fit the kind's signature.
    #[snafu(display("wrong signature for {kind}: {violation}"))]
    WrongSignature { kind: &'static str, violation: SignatureViolation },

    /// Construction path does not fit the kind's role (e.g. `create` on a leaf kind).
    #[snafu(display("{kind} is declared as {actual}, expected {expected}"))]
    WrongRole { kind: &'static str, expected: Role, actual: Role },

    /// Wildcard text is not `name`, `name_`, `name__` or `name___`.
    #[snafu(display("invalid wildcard '{text}'"))]
    InvalidWildcard { text: String },

    /// Two differently named open-ended wildcards in one tuple.
    #[snafu(display("independent open-ended wildcards {first} and {second} in one pattern tuple"))]
    IndependentOpenWildcards { first: String, second: String },

    /// One wildcard name declared with two cardinalities.
    #[snafu(display("wildcard {name} is used with conflicting cardinalities"))]
    ConflictingCardinality { name: String },

    /// Instantiating a pattern that still contains a wildcard.
    #[snafu(display("cannot build pattern: wildcard {name} is unbound"))]
    UnboundWildcard { name: String },

    /// Error raised by a domain converter or rule handler.
    #[snafu(display("{source}"))]
    Domain { source: DomainError },
}

impl Error {
    /// Wrap a consumer error so it can cross the engine.
    pub fn domain<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Domain { source: Arc::new(err) }
    }

    /// Recover the consumer error carried by [`Error::Domain`].
    pub fn downcast_domain<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Error::Domain { source } => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}
