//! Error types for the IBM Quantum adapter.

use qrandom_hal::HalError;
use thiserror::Error;

/// Result type for IBM operations.
pub type IbmResult<T> = Result<T, IbmError>;

/// Errors that can occur when talking to IBM Quantum.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IbmError {
    /// No API key configured.
    #[error("IBM Quantum API key not found. Pass --api-key or set IBM_API_KEY.")]
    MissingApiKey,

    /// No service instance configured.
    #[error("IBM Quantum service CRN not found. Pass --service-crn or set IBM_SERVICE_CRN.")]
    MissingServiceCrn,

    /// A credential cannot be sent as an HTTP header.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// IAM rejected the API key or returned no token.
    #[error("IAM token exchange failed: {0}")]
    IamTokenExchange(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The Runtime API answered with a non-success status.
    #[error("IBM Quantum API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or extracted message.
        message: String,
    },

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Job ended in a failure state.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Job was cancelled.
    #[error("Job was cancelled: {0}")]
    JobCancelled(String),

    /// Device is offline or in maintenance.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// Sampler output could not be turned into counts.
    #[error("Malformed sampler result: {0}")]
    MalformedResult(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Circuit too large for the device.
    #[error("Circuit requires {required} qubits but backend only has {available}")]
    TooManyQubits {
        /// Qubits needed.
        required: usize,
        /// Qubits available.
        available: usize,
    },

    /// The translated circuit still uses gates the device does not list.
    #[error("Backend {backend} does not support gate(s): {}", .gates.join(", "))]
    UnsupportedGates {
        /// Device name.
        backend: String,
        /// Offending gate names.
        gates: Vec<String>,
    },
}

impl From<IbmError> for HalError {
    fn from(e: IbmError) -> Self {
        match e {
            IbmError::MissingApiKey
            | IbmError::MissingServiceCrn
            | IbmError::InvalidCredential(_)
            | IbmError::IamTokenExchange(_) => HalError::AuthenticationFailed(e.to_string()),
            IbmError::Api { status: 401 | 403, .. } => {
                HalError::AuthenticationFailed(e.to_string())
            }
            IbmError::Http(err) => HalError::Network(err),
            IbmError::Json(err) => HalError::Serialization(err),
            IbmError::JobNotFound(id) => HalError::JobNotFound(id),
            IbmError::JobFailed(msg) => HalError::JobFailed(msg),
            IbmError::JobCancelled(_) => HalError::JobCancelled,
            IbmError::BackendUnavailable(msg) => HalError::BackendUnavailable(msg),
            IbmError::TooManyQubits { .. } => HalError::CircuitTooLarge(e.to_string()),
            IbmError::UnsupportedGates { .. } => HalError::InvalidCircuit(e.to_string()),
            _ => HalError::Backend(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_errors_name_their_variable() {
        assert!(IbmError::MissingApiKey.to_string().contains("IBM_API_KEY"));
        assert!(
            IbmError::MissingServiceCrn
                .to_string()
                .contains("IBM_SERVICE_CRN")
        );
    }

    #[test]
    fn test_auth_failures_map_to_hal_auth() {
        for err in [
            IbmError::MissingApiKey,
            IbmError::IamTokenExchange("400 Bad Request".into()),
            IbmError::Api {
                status: 401,
                message: "expired".into(),
            },
        ] {
            let hal: HalError = err.into();
            assert!(matches!(hal, HalError::AuthenticationFailed(_)));
        }
    }

    #[test]
    fn test_job_errors_map_to_hal() {
        let hal: HalError = IbmError::JobFailed("calibration".into()).into();
        assert!(matches!(hal, HalError::JobFailed(msg) if msg == "calibration"));

        let hal: HalError = IbmError::JobCancelled("user".into()).into();
        assert!(matches!(hal, HalError::JobCancelled));

        let hal: HalError = IbmError::JobNotFound("j1".into()).into();
        assert!(matches!(hal, HalError::JobNotFound(id) if id == "j1"));
    }

    #[test]
    fn test_unsupported_gates_map_to_invalid_circuit() {
        let err = IbmError::UnsupportedGates {
            backend: "ibm_torino".into(),
            gates: vec!["sx".into(), "rz".into()],
        };
        assert!(err.to_string().contains("sx, rz"));
        let hal: HalError = err.into();
        assert!(matches!(hal, HalError::InvalidCircuit(msg) if msg.contains("ibm_torino")));
    }

    #[test]
    fn test_other_errors_map_to_backend() {
        let hal: HalError = IbmError::Api {
            status: 500,
            message: "server error".into(),
        }
        .into();
        assert!(matches!(hal, HalError::Backend(msg) if msg.contains("500")));

        let hal: HalError = IbmError::MalformedResult("no samples".into()).into();
        assert!(matches!(hal, HalError::Backend(_)));

        let hal: HalError = IbmError::TooManyQubits {
            required: 200,
            available: 133,
        }
        .into();
        assert!(matches!(hal, HalError::CircuitTooLarge(msg) if msg.contains("133")));
    }
}
