//! Batching sampler for parameterized circuits.
//!
//! [`ProcessorSampler`] sits between callers and a [`Processor`]. It aligns
//! per-circuit sweeps and repetition counts, then decides how to submit:
//!
//! - every circuit uses the same repetitions → **one** batch job, results
//!   fetched in one grouped call;
//! - repetitions differ → one sweep job per circuit, issued sequentially
//!   (or with bounded concurrency, see [`FallbackMode`]).
//!
//! Either way the result for `circuits[i]` is at index `i`.
//!
//! # Example
//!
//! ```ignore
//! use qbatch_adapter_sim::{SimCircuit, SimulatedProcessor};
//! use qbatch_core::{BlockingSampler, ProcessorSampler, Sampler};
//! use qbatch_params::Sweep;
//!
//! let sampler = ProcessorSampler::new(SimulatedProcessor::new(), "", "")?;
//! let circuits = vec![SimCircuit::new("bell", 2), SimCircuit::new("ghz", 3)];
//! let sweeps = vec![Sweep::unit(), Sweep::linspace("theta", 0.0, 1.0, 5)?];
//!
//! // One batch job: repetitions are uniform.
//! let groups = sampler.run_batch_blocking(&circuits, Some(&sweeps), 1000.into())?;
//! assert_eq!(groups[1].len(), 5);
//!
//! // Two sweep jobs: repetitions differ.
//! let groups = sampler.run_batch(&circuits, None, [100, 200].into()).await?;
//! ```
//!
//! [`Processor`]: qbatch_hal::Processor

pub mod blocking;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod identity;
pub mod normalize;
pub mod sampler;

pub use blocking::{BlockingSampler, block_on};
pub use config::{ConfigError, LoggingConfig, SamplerConfig};
pub use dispatch::{FallbackMode, ResultGroup, dispatch, run_individually};
pub use error::{SamplerError, SamplerResult};
pub use identity::ExecutionIdentity;
pub use normalize::{ExecutionRequest, NormalizedBatch, Repetitions, normalize};
pub use sampler::{ProcessorSampler, Sampler};
