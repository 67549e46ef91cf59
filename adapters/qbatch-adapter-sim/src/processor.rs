//! Simulated processor implementation.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use qbatch_hal::{
    BatchJobHandle, Counts, ExecutionResult, HalError, HalResult, Job, JobHandle, JobId,
    JobStatus, Processor,
};
use qbatch_params::Sweep;

use crate::circuit::SimCircuit;

type JobTable = Arc<Mutex<FxHashMap<String, Job>>>;

/// One entry of the simulator's submission log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmissionRecord {
    /// A single-circuit sweep job.
    Sweep {
        /// Assigned job id.
        job_id: JobId,
        /// Circuit name.
        circuit: String,
        /// Number of sweep points.
        points: usize,
        /// Repetitions per point.
        repetitions: u32,
        /// Run name the job carried.
        run_name: String,
        /// Device configuration the job carried.
        device_config_name: String,
    },
    /// A multi-circuit batch job.
    Batch {
        /// Assigned job id.
        job_id: JobId,
        /// Circuit names, in submission order.
        circuits: Vec<String>,
        /// Sweep points per circuit.
        points: Vec<usize>,
        /// Shared repetitions per point.
        repetitions: u32,
        /// Run name the job carried.
        run_name: String,
        /// Device configuration the job carried.
        device_config_name: String,
    },
}

impl SubmissionRecord {
    /// Job id of this submission.
    pub fn job_id(&self) -> &JobId {
        match self {
            SubmissionRecord::Sweep { job_id, .. } | SubmissionRecord::Batch { job_id, .. } => {
                job_id
            }
        }
    }

    /// True for batch submissions.
    pub fn is_batch(&self) -> bool {
        matches!(self, SubmissionRecord::Batch { .. })
    }

    /// Repetitions carried by the submission.
    pub fn repetitions(&self) -> u32 {
        match self {
            SubmissionRecord::Sweep { repetitions, .. }
            | SubmissionRecord::Batch { repetitions, .. } => *repetitions,
        }
    }
}

/// In-process processor producing pseudo-random histograms.
pub struct SimulatedProcessor {
    name: String,
    max_qubits: u32,
    rng: Mutex<StdRng>,
    latency: Duration,
    circuit_latency: FxHashMap<String, Duration>,
    deadline: Option<Duration>,
    device_configs: FxHashSet<(String, String)>,
    submit_failure: Option<String>,
    result_failure: Option<String>,
    submissions: Mutex<Vec<SubmissionRecord>>,
    jobs: JobTable,
}

impl SimulatedProcessor {
    /// Create a simulator with default settings and an entropy-seeded RNG.
    pub fn new() -> Self {
        Self {
            name: "simulator".to_string(),
            max_qubits: 24,
            rng: Mutex::new(StdRng::from_entropy()),
            latency: Duration::ZERO,
            circuit_latency: FxHashMap::default(),
            deadline: None,
            device_configs: FxHashSet::default(),
            submit_failure: None,
            result_failure: None,
            submissions: Mutex::new(Vec::new()),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    /// Set the processor name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Seed the histogram RNG for reproducible output.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Reject circuits wider than `max_qubits`.
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Delay every job's completion by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Delay jobs containing the circuit `name` by `latency` instead.
    pub fn with_circuit_latency(mut self, name: impl Into<String>, latency: Duration) -> Self {
        self.circuit_latency.insert(name.into(), latency);
        self
    }

    /// Give up on jobs whose latency exceeds `deadline`.
    ///
    /// Result retrieval then waits `deadline`, marks the job failed and
    /// returns [`HalError::Timeout`].
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Register an accepted (run, device configuration) pair.
    ///
    /// Once any pair is registered, jobs naming any other pair are rejected.
    /// Jobs using the default configuration are always accepted.
    pub fn with_device_config(
        mut self,
        run_name: impl Into<String>,
        device_config_name: impl Into<String>,
    ) -> Self {
        self.device_configs
            .insert((run_name.into(), device_config_name.into()));
        self
    }

    /// Fail every submission with `message`.
    pub fn failing_submissions(mut self, message: impl Into<String>) -> Self {
        self.submit_failure = Some(message.into());
        self
    }

    /// Accept submissions but fail every result retrieval with `message`.
    pub fn failing_results(mut self, message: impl Into<String>) -> Self {
        self.result_failure = Some(message.into());
        self
    }

    /// Every submission received so far, in arrival order.
    pub fn submissions(&self) -> Vec<SubmissionRecord> {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of batch submissions received.
    pub fn batch_submissions(&self) -> usize {
        self.submissions().iter().filter(|s| s.is_batch()).count()
    }

    /// Number of sweep submissions received.
    pub fn sweep_submissions(&self) -> usize {
        self.submissions().iter().filter(|s| !s.is_batch()).count()
    }

    /// Bookkeeping record for a job.
    pub fn job(&self, id: &JobId) -> Option<Job> {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id.0)
            .cloned()
    }

    fn check_submission(
        &self,
        circuits: &[&SimCircuit],
        run_name: &str,
        device_config_name: &str,
    ) -> HalResult<()> {
        if let Some(message) = &self.submit_failure {
            return Err(HalError::SubmissionFailed(message.clone()));
        }
        if !run_name.is_empty()
            && !self.device_configs.is_empty()
            && !self
                .device_configs
                .contains(&(run_name.to_string(), device_config_name.to_string()))
        {
            return Err(HalError::Configuration(format!(
                "Unknown device configuration {run_name}/{device_config_name} on {}",
                self.name
            )));
        }
        if let Some(c) = circuits.iter().find(|c| c.num_qubits > self.max_qubits) {
            return Err(HalError::InvalidCircuit(format!(
                "Circuit '{}' has {} qubits but {} supports {}",
                c.name, c.num_qubits, self.name, self.max_qubits
            )));
        }
        Ok(())
    }

    fn latency_for(&self, circuits: &[&SimCircuit]) -> Duration {
        circuits
            .iter()
            .map(|c| {
                self.circuit_latency
                    .get(&c.name)
                    .copied()
                    .unwrap_or(self.latency)
            })
            .max()
            .unwrap_or(self.latency)
    }

    fn register(&self, id: &JobId, repetitions: u32, num_circuits: usize, record: SubmissionRecord) {
        let job = Job::new(id.clone(), repetitions, num_circuits).with_processor(&self.name);
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.0.clone(), job);
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    /// Sample one histogram per sweep point.
    fn simulate(
        &self,
        circuit: &SimCircuit,
        sweep: &Sweep,
        repetitions: u32,
        job_id: &JobId,
    ) -> Vec<ExecutionResult> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        sweep
            .resolvers()
            .into_iter()
            .map(|params| {
                let start = Instant::now();
                let mut counts = Counts::new();
                for _ in 0..repetitions {
                    let bitstring: String = (0..circuit.num_qubits)
                        .map(|_| if rng.r#gen::<bool>() { '1' } else { '0' })
                        .collect();
                    counts.insert(bitstring, 1);
                }
                ExecutionResult::new(params, counts, repetitions)
                    .with_job_id(job_id.clone())
                    .with_execution_time(start.elapsed().as_millis() as u64)
            })
            .collect()
    }
}

impl Default for SimulatedProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Processor for SimulatedProcessor {
    type Circuit = SimCircuit;
    type Job = SimJob;
    type BatchJob = SimBatchJob;

    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, circuit, sweep), fields(circuit = %circuit))]
    async fn submit_sweep(
        &self,
        circuit: &SimCircuit,
        sweep: &Sweep,
        repetitions: u32,
        run_name: &str,
        device_config_name: &str,
    ) -> HalResult<SimJob> {
        self.check_submission(&[circuit], run_name, device_config_name)?;

        let id = JobId::new(Uuid::new_v4().to_string());
        self.register(
            &id,
            repetitions,
            1,
            SubmissionRecord::Sweep {
                job_id: id.clone(),
                circuit: circuit.name.clone(),
                points: sweep.len(),
                repetitions,
                run_name: run_name.to_string(),
                device_config_name: device_config_name.to_string(),
            },
        );
        debug!("Submitted sweep job: {}", id);

        let results = self.simulate(circuit, sweep, repetitions, &id);
        Ok(SimJob {
            state: JobState {
                id,
                latency: self.latency_for(&[circuit]),
                deadline: self.deadline,
                failure: self.result_failure.clone(),
                jobs: Arc::clone(&self.jobs),
            },
            results,
        })
    }

    #[instrument(skip(self, circuits, sweeps), fields(circuits = circuits.len()))]
    async fn submit_batch(
        &self,
        circuits: &[SimCircuit],
        sweeps: &[Sweep],
        repetitions: u32,
        run_name: &str,
        device_config_name: &str,
    ) -> HalResult<SimBatchJob> {
        if circuits.len() != sweeps.len() {
            return Err(HalError::SubmissionFailed(format!(
                "{} circuits but {} sweeps",
                circuits.len(),
                sweeps.len()
            )));
        }
        let refs: Vec<&SimCircuit> = circuits.iter().collect();
        self.check_submission(&refs, run_name, device_config_name)?;

        let id = JobId::new(Uuid::new_v4().to_string());
        self.register(
            &id,
            repetitions,
            circuits.len(),
            SubmissionRecord::Batch {
                job_id: id.clone(),
                circuits: circuits.iter().map(|c| c.name.clone()).collect(),
                points: sweeps.iter().map(Sweep::len).collect(),
                repetitions,
                run_name: run_name.to_string(),
                device_config_name: device_config_name.to_string(),
            },
        );
        debug!("Submitted batch job: {}", id);

        let groups = circuits
            .iter()
            .zip(sweeps)
            .map(|(circuit, sweep)| self.simulate(circuit, sweep, repetitions, &id))
            .collect();
        Ok(SimBatchJob {
            state: JobState {
                id,
                latency: self.latency_for(&refs),
                deadline: self.deadline,
                failure: self.result_failure.clone(),
                jobs: Arc::clone(&self.jobs),
            },
            groups,
        })
    }
}

/// Shared completion logic for both handle kinds.
struct JobState {
    id: JobId,
    latency: Duration,
    deadline: Option<Duration>,
    failure: Option<String>,
    jobs: JobTable,
}

impl JobState {
    /// Terminal states are never overwritten.
    fn set_status(&self, status: JobStatus) {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(job) = jobs.get_mut(&self.id.0) {
            if !job.status.is_terminal() {
                *job = job.clone().with_status(status);
            }
        }
    }

    fn status(&self) -> HalResult<JobStatus> {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&self.id.0)
            .map(|j| j.status.clone())
            .ok_or_else(|| HalError::JobNotFound(self.id.0.clone()))
    }

    async fn complete(&self) -> HalResult<()> {
        let status = self.status()?;
        if !status.is_pending() {
            return self.outcome(status);
        }

        self.set_status(JobStatus::Running);
        if let Some(deadline) = self.deadline.filter(|d| *d < self.latency) {
            tokio::time::sleep(deadline).await;
            self.set_status(JobStatus::Failed(format!(
                "Timed out after {} ms",
                deadline.as_millis()
            )));
            return Err(HalError::Timeout(self.id.0.clone()));
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match &self.failure {
            Some(message) => {
                self.set_status(JobStatus::Failed(message.clone()));
                Err(HalError::JobFailed(message.clone()))
            }
            None => {
                self.set_status(JobStatus::Completed);
                Ok(())
            }
        }
    }

    /// Replay a finished job's outcome.
    fn outcome(&self, status: JobStatus) -> HalResult<()> {
        match status {
            JobStatus::Failed(message) => Err(HalError::JobFailed(message)),
            JobStatus::Cancelled => Err(HalError::JobFailed(format!("Job {} was cancelled", self.id))),
            _ => Ok(()),
        }
    }
}

/// Handle to a simulated sweep job.
pub struct SimJob {
    state: JobState,
    results: Vec<ExecutionResult>,
}

#[async_trait]
impl JobHandle for SimJob {
    fn id(&self) -> &JobId {
        &self.state.id
    }

    async fn status(&self) -> HalResult<JobStatus> {
        self.state.status()
    }

    async fn results(&self) -> HalResult<Vec<ExecutionResult>> {
        self.state.complete().await?;
        Ok(self.results.clone())
    }
}

/// Handle to a simulated batch job.
pub struct SimBatchJob {
    state: JobState,
    groups: Vec<Vec<ExecutionResult>>,
}

#[async_trait]
impl BatchJobHandle for SimBatchJob {
    fn id(&self) -> &JobId {
        &self.state.id
    }

    async fn status(&self) -> HalResult<JobStatus> {
        self.state.status()
    }

    async fn batched_results(&self) -> HalResult<Vec<Vec<ExecutionResult>>> {
        self.state.complete().await?;
        Ok(self.groups.clone())
    }
}
