//! Error types for algoscope-algorithms.

use thiserror::Error;

use crate::dataset::DatasetKind;

/// Result type for algorithm operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while preparing a run.
///
/// Once [`Algorithm::validate`](crate::Algorithm::validate) has accepted a
/// dataset, execution itself cannot fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed input such as a non-numeric entry or an out-of-range position.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The dataset does not satisfy an algorithm precondition.
    #[error("precondition violated: {0}")]
    InvalidPrecondition(String),

    /// The algorithm cannot operate on this kind of dataset.
    #[error("dataset mismatch: expected {expected}, got {actual}")]
    DatasetMismatch {
        expected: DatasetKind,
        actual: DatasetKind,
    },
}
