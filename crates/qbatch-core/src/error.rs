//! Error types for the sampler.

use qbatch_hal::HalError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned by sampler construction and execution.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SamplerError {
    /// Invalid execution identity or sampler settings.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A per-circuit argument list does not line up with the circuits.
    #[error("Shape mismatch: {what} has {actual} entries but {expected} circuits were given")]
    Shape {
        /// Which argument was misaligned.
        what: &'static str,
        /// Number of circuits.
        expected: usize,
        /// Number of entries supplied.
        actual: usize,
    },

    /// A repetition count was zero.
    #[error("Invalid repetitions for circuit {index}: {value} (must be at least 1)")]
    InvalidRepetitions {
        /// Circuit position.
        index: usize,
        /// Offending value.
        value: u32,
    },

    /// The processor returned no result where one was required.
    #[error("Processor returned no results")]
    EmptyResult,

    /// The blocking runtime could not be started.
    #[error("Failed to start blocking runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// Loading a configuration file failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failure raised by the processor, passed through unchanged.
    #[error(transparent)]
    Backend(#[from] HalError),
}

/// Result type for sampler operations.
pub type SamplerResult<T> = Result<T, SamplerError>;
