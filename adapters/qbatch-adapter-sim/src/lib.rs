//! qbatch In-Process Simulated Processor
//!
//! A [`Processor`](qbatch_hal::Processor) that runs entirely in memory. It
//! produces pseudo-random measurement histograms for every sweep point and
//! keeps a log of every submission it received, which makes it the
//! processor of choice for tests, demos and dry runs of the CLI.
//!
//! # Features
//!
//! - **Seeded output**: identical seeds give identical histograms
//! - **Submission log**: every sweep and batch job, with the identity it carried
//! - **Latency injection**: global or per-circuit, to exercise completion order
//! - **Failure injection**: on submission or on result retrieval
//! - **Device configurations**: optionally restrict accepted run/config pairs
//!
//! # Example
//!
//! ```ignore
//! use qbatch_adapter_sim::{SimCircuit, SimulatedProcessor};
//! use qbatch_hal::{JobHandle, Processor};
//! use qbatch_params::Sweep;
//!
//! let processor = SimulatedProcessor::new().with_seed(7);
//! let circuit = SimCircuit::new("bell", 2);
//! let job = processor
//!     .submit_sweep(&circuit, &Sweep::unit(), 1000, "", "")
//!     .await?;
//! let results = job.results().await?;
//! assert_eq!(results[0].counts.total_shots(), 1000);
//! assert_eq!(processor.submissions().len(), 1);
//! ```

mod circuit;
mod processor;

pub use circuit::{ParseCircuitError, SimCircuit};
pub use processor::{SimBatchJob, SimJob, SimulatedProcessor, SubmissionRecord};
