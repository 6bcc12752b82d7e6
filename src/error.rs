//! Errors for builder configuration and vector compatibility.

/// Errors raised by the random-indexing core.
///
/// Every variant is a contract violation: the computation is deterministic, so retrying
/// the same call fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A parameter is out of range or inconsistent.
    #[error("invalid parameter: {0}")]
    InvalidParam(&'static str),
    /// The dimension cannot hold `required` distinct positions per n-gram.
    #[error("dimension {dimension} is too small (need at least {required})")]
    DimensionTooSmall {
        /// Requested dimension.
        dimension: usize,
        /// Minimum dimension for the projector.
        required: usize,
    },
    /// Two vectors of different dimension were combined.
    #[error("dimension mismatch (expected {expected}, got {got})")]
    DimensionMismatch {
        /// Dimension of the left-hand (destination) vector.
        expected: usize,
        /// Dimension of the right-hand (source) vector.
        got: usize,
    },
}
