use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Image tuple is not a permutation of `0..n`.
    #[snafu(display("malformed permutation {permutation:?}"))]
    BadPermutation { permutation: Vec<usize> },

    #[snafu(display("cannot permute a sequence of length {sequence} with a permutation of length {permutation}"))]
    LengthMismatch { sequence: usize, permutation: usize },

    /// Block structure contains a zero-sized block.
    #[snafu(display("block {index} of the block structure is empty"))]
    EmptyBlock { index: usize },

    /// Dimension or basis requested from a space that has none.
    #[snafu(display("Hilbert space {space} has no defined basis"))]
    BasisNotSet { space: String },

    #[snafu(display("basis of length {basis} is incompatible with dimension {dimension}"))]
    IncompatibleBasis { basis: usize, dimension: usize },

    /// Factor operations on the full space.
    #[snafu(display("tensor factors of {space} are undefined"))]
    UndefinedFactors { space: String },

    #[snafu(display("{operation} of circuits with channel dimensions {lhs} and {rhs}"))]
    CdimMismatch { operation: &'static str, lhs: usize, rhs: usize },

    /// Series product or concatenation of no circuits.
    #[snafu(display("{operation} of no circuits"))]
    NoCircuits { operation: &'static str },

    #[snafu(display("{value} is not a {expected}"))]
    NotA { expected: &'static str, value: String },

    /// Engine error not raised by this crate.
    #[snafu(display("{source}"))]
    Expr { source: qalg_expr::Error },
}

impl Error {
    /// Wrap into an engine error so it can be raised from a pipeline step or rule.
    pub fn into_domain(self) -> qalg_expr::Error {
        qalg_expr::Error::domain(self)
    }
}

/// Unwraps errors this crate raised inside the engine back to themselves.
impl From<qalg_expr::Error> for Error {
    fn from(source: qalg_expr::Error) -> Self {
        match source.downcast_domain::<Error>() {
            Some(err) => err.clone(),
            None => Error::Expr { source },
        }
    }
}
