//! Processor and job-handle traits.
//!
//! ```text
//!   submit_sweep() ──→ JobHandle ──────→ results()
//!   submit_batch() ──→ BatchJobHandle ─→ batched_results()
//!      (async)                              (async)
//! ```
//!
//! ## Contract
//!
//! | Method | Kind | Returns |
//! |--------|------|---------|
//! | `name()` | sync | `&str` |
//! | `submit_sweep()` | async | `HalResult<Self::Job>` |
//! | `submit_batch()` | async | `HalResult<Self::BatchJob>` |
//! | `JobHandle::results()` | async | one result per sweep point |
//! | `BatchJobHandle::batched_results()` | async | one list per circuit, in submission order |
//!
//! The circuit type is processor-defined and never inspected by callers.
//! `run_name` and `device_config_name` are passed through verbatim; both
//! empty selects the processor's default configuration.

use std::sync::Arc;

use async_trait::async_trait;
use qbatch_params::Sweep;

use crate::error::HalResult;
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Handle to a submitted single-circuit sweep job.
#[async_trait]
pub trait JobHandle: Send + Sync {
    /// Identifier assigned by the processor.
    fn id(&self) -> &JobId;

    /// Current job status.
    async fn status(&self) -> HalResult<JobStatus>;

    /// Results, one per sweep point in sweep order.
    ///
    /// Waits for the job to finish if it has not yet.
    async fn results(&self) -> HalResult<Vec<ExecutionResult>>;
}

/// Handle to a submitted multi-circuit batch job.
#[async_trait]
pub trait BatchJobHandle: Send + Sync {
    /// Identifier assigned by the processor.
    fn id(&self) -> &JobId;

    /// Current job status.
    async fn status(&self) -> HalResult<JobStatus>;

    /// Results grouped per circuit, in the order the circuits were submitted.
    async fn batched_results(&self) -> HalResult<Vec<Vec<ExecutionResult>>>;
}

/// A remote (or local) execution target that accepts jobs.
///
/// Implementations must be `Send + Sync`; one processor is shared by every
/// call a sampler makes.
#[async_trait]
pub trait Processor: Send + Sync {
    /// Circuit representation accepted by this processor.
    type Circuit: Send + Sync;
    /// Handle returned by [`Processor::submit_sweep`].
    type Job: JobHandle;
    /// Handle returned by [`Processor::submit_batch`].
    type BatchJob: BatchJobHandle;

    /// Get the name of this processor.
    fn name(&self) -> &str;

    /// Submit one circuit executed over every point of `sweep`.
    async fn submit_sweep(
        &self,
        circuit: &Self::Circuit,
        sweep: &Sweep,
        repetitions: u32,
        run_name: &str,
        device_config_name: &str,
    ) -> HalResult<Self::Job>;

    /// Submit several circuits sharing one repetition count as a single job.
    ///
    /// `sweeps[i]` applies to `circuits[i]`.
    async fn submit_batch(
        &self,
        circuits: &[Self::Circuit],
        sweeps: &[Sweep],
        repetitions: u32,
        run_name: &str,
        device_config_name: &str,
    ) -> HalResult<Self::BatchJob>;
}

#[async_trait]
impl<P: Processor> Processor for Arc<P> {
    type Circuit = P::Circuit;
    type Job = P::Job;
    type BatchJob = P::BatchJob;

    fn name(&self) -> &str {
        (**self).name()
    }

    async fn submit_sweep(
        &self,
        circuit: &Self::Circuit,
        sweep: &Sweep,
        repetitions: u32,
        run_name: &str,
        device_config_name: &str,
    ) -> HalResult<Self::Job> {
        (**self)
            .submit_sweep(circuit, sweep, repetitions, run_name, device_config_name)
            .await
    }

    async fn submit_batch(
        &self,
        circuits: &[Self::Circuit],
        sweeps: &[Sweep],
        repetitions: u32,
        run_name: &str,
        device_config_name: &str,
    ) -> HalResult<Self::BatchJob> {
        (**self)
            .submit_batch(circuits, sweeps, repetitions, run_name, device_config_name)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Counts;

    struct EchoJob {
        id: JobId,
        results: Vec<ExecutionResult>,
    }

    #[async_trait]
    impl JobHandle for EchoJob {
        fn id(&self) -> &JobId {
            &self.id
        }

        async fn status(&self) -> HalResult<JobStatus> {
            Ok(JobStatus::Completed)
        }

        async fn results(&self) -> HalResult<Vec<ExecutionResult>> {
            Ok(self.results.clone())
        }
    }

    struct EchoBatch {
        id: JobId,
        groups: Vec<Vec<ExecutionResult>>,
    }

    #[async_trait]
    impl BatchJobHandle for EchoBatch {
        fn id(&self) -> &JobId {
            &self.id
        }

        async fn status(&self) -> HalResult<JobStatus> {
            Ok(JobStatus::Completed)
        }

        async fn batched_results(&self) -> HalResult<Vec<Vec<ExecutionResult>>> {
            Ok(self.groups.clone())
        }
    }

    /// Returns one empty histogram per sweep point.
    struct Echo;

    fn echo(sweep: &Sweep, repetitions: u32) -> Vec<ExecutionResult> {
        sweep
            .resolvers()
            .into_iter()
            .map(|p| ExecutionResult::new(p, Counts::new(), repetitions))
            .collect()
    }

    #[async_trait]
    impl Processor for Echo {
        type Circuit = String;
        type Job = EchoJob;
        type BatchJob = EchoBatch;

        fn name(&self) -> &str {
            "echo"
        }

        async fn submit_sweep(
            &self,
            _circuit: &Self::Circuit,
            sweep: &Sweep,
            repetitions: u32,
            _run_name: &str,
            _device_config_name: &str,
        ) -> HalResult<EchoJob> {
            Ok(EchoJob {
                id: JobId::new("sweep"),
                results: echo(sweep, repetitions),
            })
        }

        async fn submit_batch(
            &self,
            _circuits: &[Self::Circuit],
            sweeps: &[Sweep],
            repetitions: u32,
            _run_name: &str,
            _device_config_name: &str,
        ) -> HalResult<EchoBatch> {
            Ok(EchoBatch {
                id: JobId::new("batch"),
                groups: sweeps.iter().map(|s| echo(s, repetitions)).collect(),
            })
        }
    }

    #[tokio::test]
    async fn test_arc_processor_delegates() {
        let processor = Arc::new(Echo);
        assert_eq!(processor.name(), "echo");

        let sweep = Sweep::values("x", [1.0, 2.0]).unwrap();
        let job = processor
            .submit_sweep(&"c".to_string(), &sweep, 7, "", "")
            .await
            .unwrap();
        assert_eq!(job.id().0, "sweep");
        let results = job.results().await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].repetitions, 7);

        let batch = processor
            .submit_batch(
                &["a".to_string(), "b".to_string()],
                &[Sweep::unit(), sweep],
                3,
                "run",
                "cfg",
            )
            .await
            .unwrap();
        assert!(batch.status().await.unwrap().is_success());
        let groups = batch.batched_results().await.unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].len(), 2);
    }
}
