//! Error types for the HAL crate.

use thiserror::Error;

/// Errors surfaced by a processor during submission or result retrieval.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Job submission failed.
    #[error("Job submission failed: {0}")]
    SubmissionFailed(String),

    /// Job execution failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// The processor rejected the circuit.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Unknown run or device configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Timeout waiting for job.
    #[error("Timeout waiting for job {0}")]
    Timeout(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
