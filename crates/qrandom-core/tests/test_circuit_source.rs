//! Backend-driven bit sources.

use async_trait::async_trait;

use qrandom_adapter_sim::SimulatorBackend;
use qrandom_core::{
    BitSource, Bounds, CircuitSource, CoreError, MeasurementOutcome, Method, RandomNumberGenerator,
};
use qrandom_hal::{
    Backend, BackendAvailability, Capabilities, Counts, ExecutionResult, HalError, HalResult,
    JobId, JobStatus,
};
use qrandom_ir::Circuit;

/// Backend that answers every job with a fixed outcome.
struct ScriptedBackend {
    caps: Capabilities,
    outcome: Result<Counts, String>,
}

impl ScriptedBackend {
    fn counts(entries: &[(&str, u64)]) -> Self {
        Self {
            caps: Capabilities::simulator(1),
            outcome: Ok(entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()),
        }
    }

    fn failing(msg: &str) -> Self {
        Self {
            caps: Capabilities::simulator(1),
            outcome: Err(msg.to_string()),
        }
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn submit(&self, _circuit: &Circuit, _shots: u32) -> HalResult<JobId> {
        Ok(JobId::new("scripted-1"))
    }

    async fn status(&self, _job_id: &JobId) -> HalResult<JobStatus> {
        Ok(match &self.outcome {
            Ok(_) => JobStatus::Completed,
            Err(msg) => JobStatus::Failed(msg.clone()),
        })
    }

    async fn result(&self, _job_id: &JobId) -> HalResult<ExecutionResult> {
        match &self.outcome {
            Ok(counts) => Ok(ExecutionResult::new(counts.clone(), 1)),
            Err(msg) => Err(HalError::JobFailed(msg.clone())),
        }
    }

    async fn cancel(&self, _job_id: &JobId) -> HalResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn simulator_source_is_reproducible() {
    let bounds = Bounds::new(0, 255).unwrap();
    let make = || {
        let source = CircuitSource::new(Method::Simulate, Box::new(SimulatorBackend::with_seed(5)));
        RandomNumberGenerator::new(Box::new(source), 8, bounds).unwrap()
    };

    let first = make().generate_many(5).await.unwrap();
    let second = make().generate_many(5).await.unwrap();
    assert_eq!(first, second);
    assert!(first.iter().all(|v| bounds.contains(*v)));
}

#[tokio::test]
async fn simulator_bits_are_balanced() {
    let mut source = CircuitSource::validated(
        Method::Simulate,
        Box::new(SimulatorBackend::with_seed(12)),
    )
    .await
    .unwrap();
    assert_eq!(source.name(), "simulate");
    assert_eq!(source.backend().name(), "simulator");

    let mut ones = 0;
    for _ in 0..2000 {
        if source.next_bit().await.unwrap() == MeasurementOutcome::One {
            ones += 1;
        }
    }
    let p1 = f64::from(ones) / 2000.0;
    assert!((p1 - 0.5).abs() < 0.05, "p1 = {p1}");
}

#[tokio::test]
async fn single_outcome_is_read() {
    let mut source = CircuitSource::new(Method::Real, Box::new(ScriptedBackend::counts(&[("1", 1)])));
    assert_eq!(source.next_bit().await.unwrap(), MeasurementOutcome::One);
    assert_eq!(source.method(), Method::Real);
}

#[tokio::test]
async fn multiple_outcomes_use_first_key() {
    let backend = ScriptedBackend::counts(&[("1", 1), ("0", 1)]);
    let mut source = CircuitSource::new(Method::Real, Box::new(backend));
    assert_eq!(source.next_bit().await.unwrap(), MeasurementOutcome::Zero);
}

#[tokio::test]
async fn empty_counts_are_malformed() {
    let mut source = CircuitSource::new(Method::Real, Box::new(ScriptedBackend::counts(&[])));
    assert!(matches!(
        source.next_bit().await,
        Err(CoreError::MalformedResult(_))
    ));
}

#[tokio::test]
async fn backend_failure_aborts_generation() {
    let source = CircuitSource::new(Method::Real, Box::new(ScriptedBackend::failing("offline")));
    let mut rng = RandomNumberGenerator::new(Box::new(source), 8, Bounds::default()).unwrap();

    let err = rng.generate_many(3).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::Backend(HalError::JobFailed(ref msg)) if msg == "offline"
    ));
}

#[tokio::test]
async fn validation_rejects_gateless_backend() {
    let mut backend = ScriptedBackend::counts(&[("0", 1)]);
    backend.caps.gate_set.clear();

    let err = CircuitSource::validated(Method::Real, Box::new(backend))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, CoreError::Backend(HalError::InvalidCircuit(_))));
}
