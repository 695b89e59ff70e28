//! Simulator backend implementation.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, instrument};
use uuid::Uuid;

use qrandom_hal::{
    Backend, BackendAvailability, Capabilities, Counts, ExecutionResult, HalError, HalResult, Job,
    JobId, JobStatus,
};
use qrandom_ir::{Circuit, InstructionKind};

use crate::statevector::{Statevector, bits_to_bitstring, index_to_bitstring};

/// Default qubit limit (2^20 amplitudes, ~16 MB).
pub const DEFAULT_MAX_QUBITS: u32 = 20;

/// Job data for the simulator.
struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local simulator backend.
///
/// Circuits run synchronously inside `submit`, so every job is already
/// `Completed` by the time its id is returned.
pub struct SimulatorBackend {
    /// Cached capabilities.
    capabilities: Capabilities,
    /// Jobs whose results have not been fetched yet.
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
    /// Measurement randomness, shared by all jobs.
    rng: Mutex<StdRng>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::build(DEFAULT_MAX_QUBITS, StdRng::from_entropy())
    }

    /// Create a reproducible simulator.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(DEFAULT_MAX_QUBITS, StdRng::seed_from_u64(seed))
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::build(max_qubits, StdRng::from_entropy())
    }

    fn build(max_qubits: u32, rng: StdRng) -> Self {
        Self {
            capabilities: Capabilities::simulator(max_qubits),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            rng: Mutex::new(rng),
        }
    }

    /// Run simulation synchronously.
    #[instrument(skip(self, circuit))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> ExecutionResult {
        let start = Instant::now();
        let num_qubits = circuit.num_qubits();
        let measured = circuit.has_measurements();
        debug!(num_qubits, shots, "starting simulation");

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let mut counts = Counts::new();

        for _ in 0..shots {
            let mut sv = Statevector::new(num_qubits);
            let mut clbits = vec![false; circuit.num_clbits()];

            for inst in circuit.instructions() {
                let qubit = inst.qubits[0].0 as usize;
                match &inst.kind {
                    InstructionKind::Gate(gate) => sv.apply_gate(*gate, qubit),
                    InstructionKind::Measure => {
                        let bit = sv.measure(qubit, &mut *rng);
                        clbits[inst.clbits[0].0 as usize] = bit;
                    }
                }
            }

            // Without measurements, read out every qubit.
            let bitstring = if measured {
                bits_to_bitstring(&clbits)
            } else {
                index_to_bitstring(sv.sample(&mut *rng), num_qubits)
            };
            counts.insert(bitstring, 1);
        }

        let elapsed = start.elapsed();
        debug!(?elapsed, "simulation completed");

        ExecutionResult::new(counts, shots).with_execution_time(elapsed.as_millis() as u64)
    }

    fn with_job<T>(
        &self,
        job_id: &JobId,
        f: impl FnOnce(&mut SimJob) -> HalResult<T>,
    ) -> HalResult<T> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let sim_job = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        f(sim_job)
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    #[instrument(skip(self, circuit))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        if circuit.num_qubits() > self.capabilities.num_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.capabilities.num_qubits
            )));
        }
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be at least 1".into()));
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let mut job = Job::new(job_id.clone(), shots).with_backend(self.name());
        job.transition(JobStatus::Running);

        let result = self.run_simulation(circuit, shots);
        job.transition(JobStatus::Completed);

        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.insert(
            job_id.0.clone(),
            SimJob {
                job,
                result: Some(result),
            },
        );
        debug!(%job_id, "submitted job");

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.with_job(job_id, |sim_job| Ok(sim_job.job.status.clone()))
    }

    /// Hands the result out once; the job is then dropped from the table.
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let sim_job = jobs
            .get(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        match &sim_job.job.status {
            JobStatus::Completed => {}
            JobStatus::Cancelled => return Err(HalError::JobCancelled),
            JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg.clone())),
            other => return Err(HalError::Backend(format!("job {job_id} is {other}"))),
        }

        jobs.remove(&job_id.0)
            .and_then(|sim_job| sim_job.result)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        self.with_job(job_id, |sim_job| {
            sim_job.job.transition(JobStatus::Cancelled);
            Ok(())
        })
    }
}
