//! The sampler interface and its processor-backed implementation.

use std::fmt;

use async_trait::async_trait;
use qbatch_hal::{ExecutionResult, Processor};
use qbatch_params::{ParamResolver, Sweep};
use tracing::{info, instrument};

use crate::config::SamplerConfig;
use crate::dispatch::{FallbackMode, ResultGroup, dispatch, run_individually};
use crate::error::{SamplerError, SamplerResult};
use crate::identity::ExecutionIdentity;
use crate::normalize::{Repetitions, normalize};

/// Executes circuits over parameter sweeps.
///
/// The async methods are the source of truth; [`crate::BlockingSampler`]
/// provides blocking versions of each for every implementor.
#[async_trait]
pub trait Sampler: Send + Sync {
    /// Circuit type accepted by this sampler.
    type Circuit: Send + Sync;

    /// Run one circuit over `sweep` (the unit sweep if `None`).
    ///
    /// Returns one result per sweep point.
    async fn run(
        &self,
        circuit: &Self::Circuit,
        sweep: Option<&Sweep>,
        repetitions: u32,
    ) -> SamplerResult<Vec<ExecutionResult>>;

    /// Run several circuits, each over its own sweep.
    ///
    /// `sweeps`, when given, must have one entry per circuit, as must a
    /// per-circuit [`Repetitions`] list. The returned groups are aligned
    /// with `circuits`.
    async fn run_batch(
        &self,
        circuits: &[Self::Circuit],
        sweeps: Option<&[Sweep]>,
        repetitions: Repetitions,
    ) -> SamplerResult<ResultGroup>;

    /// Run one circuit at a single parameter point.
    async fn run_resolved(
        &self,
        circuit: &Self::Circuit,
        resolver: &ParamResolver,
        repetitions: u32,
    ) -> SamplerResult<ExecutionResult> {
        let sweep = Sweep::from(resolver.clone());
        self.run(circuit, Some(&sweep), repetitions)
            .await?
            .into_iter()
            .next()
            .ok_or(SamplerError::EmptyResult)
    }
}

/// A [`Sampler`] that submits work to a [`Processor`].
///
/// Holds only immutable configuration, so one instance can serve any number
/// of concurrent callers.
pub struct ProcessorSampler<P: Processor> {
    processor: P,
    identity: ExecutionIdentity,
    fallback: FallbackMode,
}

impl<P: Processor> ProcessorSampler<P> {
    /// Create a sampler targeting `run_name`/`device_config_name`.
    ///
    /// Both names must be set, or both left empty to use the processor's
    /// default configuration.
    pub fn new(
        processor: P,
        run_name: impl Into<String>,
        device_config_name: impl Into<String>,
    ) -> SamplerResult<Self> {
        Ok(Self::with_identity(
            processor,
            ExecutionIdentity::new(run_name, device_config_name)?,
        ))
    }

    /// Create a sampler from an already validated identity.
    pub fn with_identity(processor: P, identity: ExecutionIdentity) -> Self {
        Self {
            processor,
            identity,
            fallback: FallbackMode::default(),
        }
    }

    /// Create a sampler from loaded configuration.
    pub fn from_config(processor: P, config: &SamplerConfig) -> SamplerResult<Self> {
        let identity = config.identity()?;
        config.validate()?;
        Ok(Self::with_identity(processor, identity).with_fallback(config.fallback))
    }

    /// Set how per-circuit jobs are issued when a batch cannot be submitted whole.
    pub fn with_fallback(mut self, fallback: FallbackMode) -> Self {
        self.fallback = fallback;
        self
    }

    /// The underlying processor.
    pub fn processor(&self) -> &P {
        &self.processor
    }

    /// The configuration every submission targets.
    pub fn identity(&self) -> &ExecutionIdentity {
        &self.identity
    }

    /// Automation run name (empty for the processor default).
    pub fn run_name(&self) -> &str {
        self.identity.run_name()
    }

    /// Device configuration name (empty for the processor default).
    pub fn device_config_name(&self) -> &str {
        self.identity.device_config_name()
    }

    /// Current fallback mode.
    pub fn fallback(&self) -> FallbackMode {
        self.fallback
    }
}

impl<P: Processor> fmt::Debug for ProcessorSampler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorSampler")
            .field("processor", &self.processor.name())
            .field("identity", &self.identity)
            .field("fallback", &self.fallback)
            .finish()
    }
}

#[async_trait]
impl<P: Processor> Sampler for ProcessorSampler<P> {
    type Circuit = P::Circuit;

    #[instrument(skip_all, fields(repetitions = repetitions))]
    async fn run(
        &self,
        circuit: &Self::Circuit,
        sweep: Option<&Sweep>,
        repetitions: u32,
    ) -> SamplerResult<Vec<ExecutionResult>> {
        let circuits = std::slice::from_ref(circuit);
        let batch = normalize(circuits, sweep.map(std::slice::from_ref), repetitions.into())?;

        let mut groups =
            run_individually(&self.processor, circuits, &batch, &self.identity, self.fallback)
                .await?;
        groups.pop().ok_or(SamplerError::EmptyResult)
    }

    #[instrument(skip_all, fields(circuits = circuits.len()))]
    async fn run_batch(
        &self,
        circuits: &[Self::Circuit],
        sweeps: Option<&[Sweep]>,
        repetitions: Repetitions,
    ) -> SamplerResult<ResultGroup> {
        let batch = normalize(circuits, sweeps, repetitions)?;
        let groups = dispatch(
            &self.processor,
            circuits,
            &batch,
            &self.identity,
            self.fallback,
        )
        .await?;
        info!(
            processor = self.processor.name(),
            identity = %self.identity,
            circuits = circuits.len(),
            results = groups.iter().map(Vec::len).sum::<usize>(),
            "batch complete"
        );
        Ok(groups)
    }
}
