//! Error types for parameter sweeps.

use thiserror::Error;

/// Errors raised while building a parameter sweep.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParamError {
    /// Zipped sweeps must all have the same number of points.
    #[error("Cannot zip sweeps of different lengths: {0:?}")]
    ZipLengthMismatch(Vec<usize>),

    /// The same symbol is bound by two combined sweeps.
    #[error("Symbol '{0}' is swept more than once")]
    DuplicateKey(String),

    /// A symbol name was empty.
    #[error("Empty parameter name")]
    EmptyKey,
}

/// Result type for parameter operations.
pub type ParamResult<T> = Result<T, ParamError>;
