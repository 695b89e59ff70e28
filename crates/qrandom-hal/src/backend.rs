//! Backend trait.
//!
//! The [`Backend`] trait defines the lifecycle for running a circuit on a
//! quantum backend:
//!
//! ```text
//!   capabilities() ──→ validate() ──→ submit() ──→ status() ──→ result()
//!    (sync, &ref)       (async)       (async)      (async)      (async)
//! ```
//!
//! | Method | Kind | Required | Returns |
//! |--------|------|----------|---------|
//! | `name()` | sync | yes | `&str` |
//! | `capabilities()` | sync | yes | `&Capabilities` |
//! | `availability()` | async | yes | `HalResult<BackendAvailability>` |
//! | `validate()` | async | provided | `HalResult<ValidationResult>` |
//! | `submit()` | async | yes | `HalResult<JobId>` |
//! | `status()` | async | yes | `HalResult<JobStatus>` |
//! | `result()` | async | yes | `HalResult<ExecutionResult>` |
//! | `cancel()` | async | yes | `HalResult<()>` |
//! | `wait()` | async | provided | `HalResult<ExecutionResult>` |
//! | `run()` | async | provided | `HalResult<ExecutionResult>` |

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use qrandom_ir::Circuit;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Interval between status polls in [`Backend::wait`].
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Number of polls before [`Backend::wait`] gives up (5 minutes).
pub const MAX_POLLS: u32 = 600;

/// Trait for quantum backends.
///
/// # Contract
///
/// - `capabilities()` MUST be synchronous and infallible; capabilities are
///   cached at construction time.
/// - `submit()` MUST return a `JobId` whose initial status is `Queued` or later.
/// - `result()` MUST only be called when status is `Completed`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Check backend availability.
    async fn availability(&self) -> HalResult<BackendAvailability>;

    /// Validate a circuit against the cached capabilities.
    ///
    /// Checks the qubit count and that every gate is in the gate set.
    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        let caps = self.capabilities();
        let mut reasons = Vec::new();

        if circuit.num_qubits() > caps.num_qubits as usize {
            reasons.push(format!(
                "Circuit requires {} qubits but backend only has {}",
                circuit.num_qubits(),
                caps.num_qubits
            ));
        }

        for inst in circuit.instructions() {
            if let Some(gate) = inst.as_gate() {
                if !caps.supports_gate(gate.name()) {
                    reasons.push(format!("Unsupported gate: {}", gate.name()));
                    break;
                }
            }
        }

        if reasons.is_empty() {
            Ok(ValidationResult::Valid)
        } else {
            Ok(ValidationResult::Invalid { reasons })
        }
    }

    /// Submit a circuit for execution.
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId>;

    /// Get the status of a job.
    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Get the result of a completed job.
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    /// Cancel a running job.
    async fn cancel(&self, job_id: &JobId) -> HalResult<()>;

    /// Wait for a job to complete and return its result.
    ///
    /// Polls every [`POLL_INTERVAL`] for up to [`MAX_POLLS`] polls.
    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        for _ in 0..MAX_POLLS {
            match self.status(job_id).await? {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        }

        Err(HalError::Timeout(job_id.0.clone()))
    }

    /// Submit a circuit and wait for its result.
    async fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be at least 1".into()));
        }
        let job_id = self.submit(circuit, shots).await?;
        debug!(backend = self.name(), %job_id, "submitted job");
        self.wait(&job_id).await
    }
}

/// Backend availability information.
#[derive(Debug, Clone)]
pub struct BackendAvailability {
    /// Whether the backend is currently accepting jobs.
    pub is_available: bool,
    /// Number of jobs currently in queue (if known).
    pub queue_depth: Option<u32>,
    /// Human-readable status message.
    pub status_message: Option<String>,
}

impl BackendAvailability {
    /// Availability for a backend that is always ready (local simulators).
    pub fn always_available() -> Self {
        Self {
            is_available: true,
            queue_depth: Some(0),
            status_message: None,
        }
    }

    /// Availability for an offline backend.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            is_available: false,
            queue_depth: None,
            status_message: Some(reason.into()),
        }
    }
}

/// Result of circuit validation against backend constraints.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// Circuit can be submitted as-is.
    Valid,
    /// Circuit cannot run on this backend.
    Invalid {
        /// Reasons the circuit is invalid.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Check if the circuit is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}
