//! Why a test could not be evaluated.

/// Precondition and computation failures raised inside a test.
///
/// These are ordinary outcomes, not defects: every variant ends up as an
/// `error` [`TestRecord`](crate::TestRecord) whose message is the
/// [`Display`](std::fmt::Display) text below.
#[derive(Debug, Clone, PartialEq)]
pub enum TestError {
    /// The sequence is shorter than the test's minimum length.
    TooShort { needed: usize, got: usize },
    /// The sequence holds a value other than 0 or 1.
    NonBinary { index: usize, value: u8 },
    /// A caller-supplied parameter is outside its documented range.
    InvalidParameter(String),
    /// No block length satisfies the block-frequency constraints.
    NoBlockSize { n: usize },
    /// A statistical prerequisite of the test does not hold for this sequence.
    Prerequisite(String),
    /// The cumulative walk returns to zero too rarely for an excursion test.
    InsufficientCycles { found: usize, needed: usize },
    /// Arithmetic or table fault during the computation itself.
    Computation(String),
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort { needed, got } => write!(
                f,
                "Sequence too short: at least {needed} bits required, got {got}"
            ),
            Self::NonBinary { index, value } => write!(
                f,
                "Sequence must contain only 0 and 1 (found {value} at position {index})"
            ),
            Self::InvalidParameter(msg) => write!(f, "Invalid parameter: {msg}"),
            Self::NoBlockSize { n } => write!(
                f,
                "Unable to determine a suitable block size for {n} bits (need M >= 20, M > 0.01n, fewer than 100 blocks)"
            ),
            Self::Prerequisite(msg) => write!(f, "Test not applicable: {msg}"),
            Self::InsufficientCycles { found, needed } => write!(
                f,
                "Insufficient number of cycles: J={found} < {needed}, test not applicable"
            ),
            Self::Computation(msg) => write!(f, "Error while running the test: {msg}"),
        }
    }
}

impl std::error::Error for TestError {}

/// Input rejected by the decision policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    /// A collection of p-values with no members.
    EmptyCollection,
    /// A p-value that is NaN.
    NotANumber,
}

impl std::fmt::Display for PolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCollection => write!(f, "the list of p-values cannot be empty"),
            Self::NotANumber => write!(f, "p-value must be a number"),
        }
    }
}

impl std::error::Error for PolicyError {}

impl From<PolicyError> for TestError {
    fn from(err: PolicyError) -> Self {
        Self::Computation(err.to_string())
    }
}
