//! Choosing between one batch job and one job per circuit.
//!
//! ```text
//!   distinct repetitions == 1 ──→ submit_batch ──→ batched_results
//!   distinct repetitions >= 2 ──→ submit_sweep × N ──→ results × N
//! ```
//!
//! A processor can only amortize per-job overhead across circuits that share
//! a repetition count, so the batch path is always taken when it applies.
//! Both paths return one result list per circuit in input order. Processor
//! errors are returned unchanged and nothing is retried.

use futures::{StreamExt, TryStreamExt, stream};
use qbatch_hal::{BatchJobHandle, ExecutionResult, JobHandle, Processor};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SamplerResult;
use crate::identity::ExecutionIdentity;
use crate::normalize::{ExecutionRequest, NormalizedBatch};

/// One result list per circuit, in circuit order.
pub type ResultGroup = Vec<Vec<ExecutionResult>>;

/// How per-circuit jobs are issued when a batch cannot be submitted whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FallbackMode {
    /// One job at a time, in circuit order.
    #[default]
    Sequential,
    /// Up to `max_in_flight` jobs outstanding at once. Results keep circuit
    /// order regardless of completion order.
    Concurrent {
        /// Maximum number of outstanding jobs (values below 1 are treated as 1).
        max_in_flight: usize,
    },
}

/// Execute a normalized batch on `processor`.
pub async fn dispatch<P: Processor>(
    processor: &P,
    circuits: &[P::Circuit],
    batch: &NormalizedBatch,
    identity: &ExecutionIdentity,
    fallback: FallbackMode,
) -> SamplerResult<ResultGroup> {
    if circuits.is_empty() {
        debug!("empty batch, nothing to submit");
        return Ok(Vec::new());
    }

    match batch.uniform_repetitions() {
        Some(repetitions) => {
            debug!(
                circuits = circuits.len(),
                repetitions, "uniform repetitions, submitting as one batch job"
            );
            submit_as_batch(processor, circuits, batch, repetitions, identity).await
        }
        None => {
            debug!(
                circuits = circuits.len(),
                distinct = ?batch.distinct_repetitions(),
                ?fallback,
                "mixed repetitions, submitting one job per circuit"
            );
            run_individually(processor, circuits, batch, identity, fallback).await
        }
    }
}

async fn submit_as_batch<P: Processor>(
    processor: &P,
    circuits: &[P::Circuit],
    batch: &NormalizedBatch,
    repetitions: u32,
    identity: &ExecutionIdentity,
) -> SamplerResult<ResultGroup> {
    let job = processor
        .submit_batch(
            circuits,
            batch.sweeps(),
            repetitions,
            identity.run_name(),
            identity.device_config_name(),
        )
        .await?;
    debug!(job_id = %job.id(), "batch job submitted");

    let groups = job.batched_results().await?;
    debug_assert_eq!(
        groups.len(),
        circuits.len(),
        "batch job returned a result group per circuit"
    );
    debug!(job_id = %job.id(), groups = groups.len(), "batch results retrieved");
    Ok(groups)
}

/// Submit every circuit as its own job and collect results in circuit order.
pub async fn run_individually<P: Processor>(
    processor: &P,
    circuits: &[P::Circuit],
    batch: &NormalizedBatch,
    identity: &ExecutionIdentity,
    fallback: FallbackMode,
) -> SamplerResult<ResultGroup> {
    let requests = batch.requests(circuits);

    match fallback {
        FallbackMode::Sequential => {
            let mut groups = Vec::with_capacity(requests.len());
            for request in requests {
                groups.push(submit_one(processor, request, identity).await?);
            }
            Ok(groups)
        }
        FallbackMode::Concurrent { max_in_flight } => {
            let pending: Vec<_> = requests
                .into_iter()
                .map(|request| submit_one(processor, request, identity))
                .collect();
            // `buffered` yields in input order, not completion order.
            stream::iter(pending)
                .buffered(max_in_flight.max(1))
                .try_collect()
                .await
        }
    }
}

async fn submit_one<P: Processor>(
    processor: &P,
    request: ExecutionRequest<'_, P::Circuit>,
    identity: &ExecutionIdentity,
) -> SamplerResult<Vec<ExecutionResult>> {
    let job = processor
        .submit_sweep(
            request.circuit,
            request.sweep,
            request.repetitions,
            identity.run_name(),
            identity.device_config_name(),
        )
        .await?;
    debug!(
        job_id = %job.id(),
        repetitions = request.repetitions,
        points = request.sweep.len(),
        "sweep job submitted"
    );
    Ok(job.results().await?)
}
