//! Blocking counterparts of the async sampler methods.
//!
//! Each blocking call drives the async operation to completion on a private
//! current-thread runtime. When the caller is itself running inside a tokio
//! runtime, the private runtime is started on a scoped helper thread so the
//! caller's runtime is never re-entered.
//!
//! There is no cancel token. Async callers cancel a wait by dropping the
//! future (for example under `tokio::time::timeout`); a blocking call returns
//! only when the underlying operation completes or fails. Jobs already
//! submitted are not cancelled on the processor either way.

use std::future::Future;

use qbatch_hal::ExecutionResult;
use qbatch_params::{ParamResolver, Sweep};
use tokio::runtime::{Builder, Handle, Runtime};

use crate::dispatch::ResultGroup;
use crate::error::{SamplerError, SamplerResult};
use crate::normalize::Repetitions;
use crate::sampler::Sampler;

/// Run `future` to completion from synchronous code.
pub fn block_on<F, T>(future: F) -> SamplerResult<T>
where
    F: Future<Output = SamplerResult<T>> + Send,
    T: Send,
{
    if Handle::try_current().is_err() {
        return private_runtime()?.block_on(future);
    }

    std::thread::scope(|scope| {
        let worker = scope.spawn(move || private_runtime()?.block_on(future));
        match worker.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    })
}

fn private_runtime() -> SamplerResult<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(SamplerError::Runtime)
}

/// Blocking versions of every [`Sampler`] method.
///
/// Same arguments, same results, same errors; only the calling convention
/// differs. Implemented for every sampler.
pub trait BlockingSampler: Sampler {
    /// Blocking [`Sampler::run`].
    fn run_blocking(
        &self,
        circuit: &Self::Circuit,
        sweep: Option<&Sweep>,
        repetitions: u32,
    ) -> SamplerResult<Vec<ExecutionResult>> {
        block_on(self.run(circuit, sweep, repetitions))
    }

    /// Blocking [`Sampler::run_batch`].
    fn run_batch_blocking(
        &self,
        circuits: &[Self::Circuit],
        sweeps: Option<&[Sweep]>,
        repetitions: Repetitions,
    ) -> SamplerResult<ResultGroup> {
        block_on(self.run_batch(circuits, sweeps, repetitions))
    }

    /// Blocking [`Sampler::run_resolved`].
    fn run_resolved_blocking(
        &self,
        circuit: &Self::Circuit,
        resolver: &ParamResolver,
        repetitions: u32,
    ) -> SamplerResult<ExecutionResult> {
        block_on(self.run_resolved(circuit, resolver, repetitions))
    }
}

impl<S: Sampler + ?Sized> BlockingSampler for S {}
