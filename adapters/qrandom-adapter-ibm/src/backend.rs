//! IBM Quantum backend implementation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use qrandom_hal::{
    Backend, BackendAvailability, Capabilities, Counts, ExecutionResult, HalError, HalResult,
    JobId, JobStatus, ValidationResult,
};
use qrandom_ir::{Circuit, gates_outside_basis, qasm, translate_to_ibm};

use crate::api::{BackendInfo, IbmClient, JobResultResponse};
use crate::config::IbmConfig;
use crate::error::{IbmError, IbmResult};

/// How long to cache backend info before refreshing from the API.
const BACKEND_INFO_TTL: Duration = Duration::from_secs(5 * 60);

/// IBM Quantum backend adapter.
pub struct IbmBackend {
    client: Arc<IbmClient>,
    /// Target device name.
    target: String,
    /// Cached capabilities, filled from the device configuration at connect.
    capabilities: Capabilities,
    /// Cached backend info with fetch timestamp for TTL-based refresh.
    backend_info: Arc<RwLock<Option<(BackendInfo, Instant)>>>,
}

impl IbmBackend {
    /// Authenticate and look up the configured device.
    pub async fn connect(config: &IbmConfig) -> IbmResult<Self> {
        info!(backend = %config.backend, endpoint = config.endpoint(), "connecting to IBM Quantum");
        let client = IbmClient::connect(config).await?;
        let info = client.backend_info(&config.backend).await?;
        info!(
            backend = %info.name,
            qubits = info.num_qubits,
            operational = info.operational,
            "IBM backend ready"
        );
        Ok(Self::from_parts(client, info))
    }

    fn from_parts(client: IbmClient, info: BackendInfo) -> Self {
        let mut capabilities = Capabilities::ibm(
            &info.name,
            u32::try_from(info.num_qubits).unwrap_or(u32::MAX),
        );
        if let Some(max_shots) = info.max_shots {
            capabilities.max_shots = max_shots;
        }
        if !info.basis_gates.is_empty() {
            capabilities.gate_set = info.basis_gates.clone();
        }
        Self {
            client: Arc::new(client),
            target: info.name.clone(),
            capabilities,
            backend_info: Arc::new(RwLock::new(Some((info, Instant::now())))),
        }
    }

    /// Get the target device name.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Get backend information, fetching from API if stale.
    async fn backend_info(&self) -> IbmResult<BackendInfo> {
        {
            let cached = self.backend_info.read().await;
            if let Some((ref info, fetched_at)) = *cached {
                if fetched_at.elapsed() < BACKEND_INFO_TTL {
                    return Ok(info.clone());
                }
            }
        }

        let info = self.client.backend_info(&self.target).await?;
        *self.backend_info.write().await = Some((info.clone(), Instant::now()));
        Ok(info)
    }
}

/// Translate into the IBM basis and emit OpenQASM 3.0 on physical qubits,
/// with the standard gate library included.
pub fn circuit_to_qasm(circuit: &Circuit) -> String {
    qasm::emit(&translate_to_ibm(circuit)).replacen(
        "OPENQASM 3.0;",
        "OPENQASM 3.0;\ninclude \"stdgates.inc\";",
        1,
    )
}

/// Reject circuits whose translation uses gates outside `basis_gates`.
///
/// An empty list means the device did not report its basis; the check is
/// skipped.
fn check_basis(circuit: &Circuit, backend: &str, basis_gates: &[String]) -> IbmResult<()> {
    if basis_gates.is_empty() {
        return Ok(());
    }
    let missing = gates_outside_basis(&translate_to_ibm(circuit), basis_gates);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(IbmError::UnsupportedGates {
            backend: backend.to_string(),
            gates: missing.into_iter().map(String::from).collect(),
        })
    }
}

/// Map a Runtime status string onto [`JobStatus`].
fn map_status(status: &str, reason: Option<String>) -> JobStatus {
    match status.to_uppercase().as_str() {
        "QUEUED" => JobStatus::Queued,
        "VALIDATING" | "RUNNING" => JobStatus::Running,
        "COMPLETED" => JobStatus::Completed,
        "FAILED" | "ERROR" => {
            JobStatus::Failed(reason.unwrap_or_else(|| "Unknown error".to_string()))
        }
        "CANCELLED" => JobStatus::Cancelled,
        other => {
            debug!(status = other, "unrecognised job status, treating as running");
            JobStatus::Running
        }
    }
}

/// Aggregate per-shot hex samples into binary-string counts.
///
/// Registers are read in name order. The bit width comes from the
/// register's reported `num_bits`, or the widest sample when absent.
pub fn samples_to_counts(results: &JobResultResponse) -> IbmResult<Counts> {
    let result = results
        .results
        .first()
        .ok_or_else(|| IbmError::MalformedResult("no PUB results".into()))?;

    let mut registers: Vec<_> = result.data.iter().collect();
    registers.sort_by(|a, b| a.0.cmp(b.0));

    let mut counts = Counts::new();
    for (name, register) in registers {
        let width = register
            .num_bits
            .unwrap_or_else(|| infer_bit_width(&register.samples));
        for sample in &register.samples {
            let bitstring = hex_to_binary(sample, width).ok_or_else(|| {
                IbmError::MalformedResult(format!("register {name}: '{sample}' is not hex"))
            })?;
            counts.insert(bitstring, 1);
        }
    }

    if counts.is_empty() {
        return Err(IbmError::MalformedResult("result contains no samples".into()));
    }
    Ok(counts)
}

/// Bits needed for the largest sample; at least 1.
fn infer_bit_width(samples: &[String]) -> usize {
    let max_val = samples
        .iter()
        .filter_map(|s| parse_hex(s))
        .max()
        .unwrap_or(0);

    (u64::BITS - max_val.leading_zeros()).max(1) as usize
}

fn parse_hex(sample: &str) -> Option<u64> {
    let hex = sample.strip_prefix("0x").unwrap_or(sample);
    u64::from_str_radix(hex, 16).ok()
}

/// `"0x2"` at width 3 becomes `"010"`.
fn hex_to_binary(sample: &str, width: usize) -> Option<String> {
    parse_hex(sample).map(|value| format!("{value:0width$b}"))
}

#[async_trait]
impl Backend for IbmBackend {
    fn name(&self) -> &str {
        &self.target
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        match self.backend_info().await {
            Ok(info) if info.operational => Ok(BackendAvailability {
                is_available: true,
                queue_depth: info.pending_jobs,
                status_message: info.status_message,
            }),
            Ok(info) => Ok(BackendAvailability::unavailable(
                info.status_message
                    .unwrap_or_else(|| "backend offline".to_string()),
            )),
            Err(e) => {
                warn!("IBM backend availability check failed: {e}");
                Ok(BackendAvailability::unavailable("failed to query backend"))
            }
        }
    }

    /// Validates the circuit as it will be submitted, after basis
    /// translation.
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
        let missing = gates_outside_basis(&translate_to_ibm(circuit), &caps.gate_set);
        if !missing.is_empty() {
            reasons.push(format!("Unsupported gate(s): {}", missing.join(", ")));
        }

        if reasons.is_empty() {
            Ok(ValidationResult::Valid)
        } else {
            Ok(ValidationResult::Invalid { reasons })
        }
    }

    #[instrument(skip(self, circuit), fields(backend = %self.target))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        let info = self.backend_info().await?;

        if circuit.num_qubits() > info.num_qubits {
            return Err(IbmError::TooManyQubits {
                required: circuit.num_qubits(),
                available: info.num_qubits,
            }
            .into());
        }
        if !info.operational {
            return Err(HalError::BackendUnavailable(
                info.status_message
                    .unwrap_or_else(|| "Backend offline".to_string()),
            ));
        }

        check_basis(circuit, &self.target, &info.basis_gates)?;

        let qasm = circuit_to_qasm(circuit);
        let response = self
            .client
            .submit_sampler_job(&self.target, &qasm, shots)
            .await
            .map_err(|e| match e {
                IbmError::Api { .. } => HalError::SubmissionFailed(e.to_string()),
                other => other.into(),
            })?;

        debug!(job_id = %response.id, shots, "submitted sampler job");
        Ok(JobId(response.id))
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let status = self.client.job_status(&job_id.0).await?;
        Ok(map_status(&status.status, status.error_message()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        match self.status(job_id).await? {
            JobStatus::Completed => {}
            JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
            JobStatus::Cancelled => return Err(HalError::JobCancelled),
            other => {
                return Err(HalError::Backend(format!(
                    "Job {job_id} not yet completed ({other})"
                )));
            }
        }

        let started = Instant::now();
        let results = self.client.job_results(&job_id.0).await?;
        let counts = samples_to_counts(&results)?;
        let shots = u32::try_from(counts.total_shots()).unwrap_or(u32::MAX);

        Ok(ExecutionResult::new(counts, shots)
            .with_execution_time(started.elapsed().as_millis() as u64))
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        self.client.cancel_job(&job_id.0).await?;
        Ok(())
    }
}
