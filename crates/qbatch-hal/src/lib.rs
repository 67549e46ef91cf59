//! qbatch Hardware Abstraction Layer
//!
//! The contract a processor (a remote or local execution target) must
//! satisfy so that circuits can be submitted to it and results retrieved.
//!
//! # Overview
//!
//! - [`Processor`] submits a single circuit over a parameter sweep, or a
//!   batch of circuits sharing one repetition count.
//! - [`JobHandle`] and [`BatchJobHandle`] retrieve results asynchronously.
//! - [`ExecutionResult`] and [`Counts`] carry measurement data.
//!
//! # Implementing a Processor
//!
//! ```ignore
//! use async_trait::async_trait;
//! use qbatch_hal::{HalResult, Processor};
//! use qbatch_params::Sweep;
//!
//! struct MyProcessor;
//!
//! #[async_trait]
//! impl Processor for MyProcessor {
//!     type Circuit = MyCircuit;
//!     type Job = MyJob;
//!     type BatchJob = MyBatchJob;
//!
//!     fn name(&self) -> &str { "my_processor" }
//!
//!     async fn submit_sweep(
//!         &self,
//!         circuit: &MyCircuit,
//!         sweep: &Sweep,
//!         repetitions: u32,
//!         run_name: &str,
//!         device_config_name: &str,
//!     ) -> HalResult<MyJob> {
//!         # todo!()
//!     }
//!
//!     async fn submit_batch(
//!         &self,
//!         circuits: &[MyCircuit],
//!         sweeps: &[Sweep],
//!         repetitions: u32,
//!         run_name: &str,
//!         device_config_name: &str,
//!     ) -> HalResult<MyBatchJob> {
//!         # todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod job;
pub mod processor;
pub mod result;

pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use processor::{BatchJobHandle, JobHandle, Processor};
pub use result::{Counts, ExecutionResult};
