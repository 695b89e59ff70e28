//! IBM Quantum Runtime REST client.
//!
//! Covers the calls the coin-flip workload needs:
//! - IAM token exchange for an API key
//! - Backend configuration and status lookup
//! - Sampler V2 job submission
//! - Job status polling, result retrieval and cancellation

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode, header};
use serde::Deserialize;
use tracing::debug;

use crate::config::IbmConfig;
use crate::error::{IbmError, IbmResult};

/// IBM Cloud IAM token endpoint.
const IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";

/// IBM API version header value.
const IBM_API_VERSION: &str = "2026-02-01";

/// User-Agent sent with requests (Cloudflare blocks the default reqwest UA).
const USER_AGENT: &str = concat!("qrandom/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// IBM Quantum API client.
pub struct IbmClient {
    client: Client,
    endpoint: String,
}

impl fmt::Debug for IbmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IbmClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// IAM token response from `iam.cloud.ibm.com`.
#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
}

impl IbmClient {
    /// Exchange the configured API key for a bearer token and build a client.
    pub async fn connect(config: &IbmConfig) -> IbmResult<Self> {
        config.validate()?;

        let iam_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        let response = iam_client
            .post(IAM_TOKEN_URL)
            .form(&[
                ("grant_type", "urn:ibm:params:oauth:grant-type:apikey"),
                ("apikey", config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| IbmError::IamTokenExchange(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "no body".to_string());
            return Err(IbmError::IamTokenExchange(format!(
                "IAM returned {status}: {body}"
            )));
        }

        let token: IamTokenResponse = response.json().await.map_err(|e| {
            IbmError::IamTokenExchange(format!("failed to parse IAM response: {e}"))
        })?;
        debug!("IAM token exchange succeeded");

        Self::with_token(config.endpoint(), &token.access_token, &config.service_crn)
    }

    /// Build a client from an already issued bearer token.
    pub fn with_token(endpoint: &str, bearer_token: &str, service_crn: &str) -> IbmResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {bearer_token}"))
                .map_err(|_| IbmError::InvalidCredential("bearer token".into()))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::HeaderName::from_static("service-crn"),
            header::HeaderValue::from_str(service_crn)
                .map_err(|_| IbmError::InvalidCredential("service CRN".into()))?,
        );
        headers.insert(
            header::HeaderName::from_static("ibm-api-version"),
            header::HeaderValue::from_static(IBM_API_VERSION),
        );

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch `/configuration` and `/status` for a device.
    pub async fn backend_info(&self, name: &str) -> IbmResult<BackendInfo> {
        let url = format!("{}/v1/backends/{name}/configuration", self.endpoint);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(IbmError::BackendUnavailable(name.to_string()));
        }
        let config: BackendConfigResponse = ensure_success(response).await?.json().await?;

        let url = format!("{}/v1/backends/{name}/status", self.endpoint);
        let response = self.client.get(&url).send().await?;
        // A missing status is treated as operational since the configuration
        // lookup succeeded.
        let status = if response.status().is_success() {
            response.json::<BackendStatusResponse>().await?
        } else {
            BackendStatusResponse::default()
        };

        Ok(BackendInfo {
            name: config.backend_name,
            num_qubits: config.n_qubits,
            basis_gates: config.basis_gates,
            simulator: config.simulator,
            max_shots: config.max_shots,
            operational: status.state,
            status_message: (!status.status.is_empty()).then_some(status.status),
            pending_jobs: status.length_queue,
        })
    }

    /// Submit one circuit to the Sampler primitive.
    pub async fn submit_sampler_job(
        &self,
        backend: &str,
        qasm: &str,
        shots: u32,
    ) -> IbmResult<SubmitResponse> {
        let url = format!("{}/v1/jobs", self.endpoint);
        let body = sampler_request(backend, qasm, shots);
        let response = self.client.post(&url).json(&body).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    pub async fn job_status(&self, job_id: &str) -> IbmResult<JobStatusResponse> {
        let url = format!("{}/v1/jobs/{job_id}", self.endpoint);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(IbmError::JobNotFound(job_id.to_string()));
        }
        Ok(ensure_success(response).await?.json().await?)
    }

    pub async fn job_results(&self, job_id: &str) -> IbmResult<JobResultResponse> {
        let url = format!("{}/v1/jobs/{job_id}/results", self.endpoint);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(IbmError::JobNotFound(job_id.to_string()));
        }
        Ok(ensure_success(response).await?.json().await?)
    }

    pub async fn cancel_job(&self, job_id: &str) -> IbmResult<()> {
        let url = format!("{}/v1/jobs/{job_id}/cancel", self.endpoint);
        let response = self.client.post(&url).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

/// Turn a non-success response into [`IbmError::Api`].
async fn ensure_success(response: Response) -> IbmResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "no body".to_string());
    let message = serde_json::from_str::<ApiErrorResponse>(&body)
        .ok()
        .and_then(ApiErrorResponse::into_message)
        .unwrap_or(body);
    Err(IbmError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Sampler V2 request body: a single PUB `[qasm, {}, shots]`.
///
/// Optimization level 1 lets IBM map the circuit onto physical qubits and
/// translate `h` into the device basis.
pub fn sampler_request(backend: &str, qasm: &str, shots: u32) -> serde_json::Value {
    serde_json::json!({
        "program_id": "sampler",
        "backend": backend,
        "params": {
            "version": 2,
            "pubs": [[qasm, {}, shots]],
            "options": { "optimization_level": 1 }
        }
    })
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl ApiErrorResponse {
    fn into_message(self) -> Option<String> {
        self.message
            .or_else(|| self.errors.into_iter().next().map(|e| e.message))
    }
}

#[derive(Debug, Deserialize)]
struct BackendConfigResponse {
    backend_name: String,
    n_qubits: usize,
    #[serde(default)]
    basis_gates: Vec<String>,
    #[serde(default)]
    simulator: bool,
    #[serde(default)]
    max_shots: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct BackendStatusResponse {
    state: bool,
    #[serde(default)]
    status: String,
    #[serde(default)]
    length_queue: Option<u32>,
}

impl Default for BackendStatusResponse {
    fn default() -> Self {
        Self {
            state: true,
            status: String::new(),
            length_queue: None,
        }
    }
}

/// Merged device configuration and status.
#[derive(Debug, Clone)]
pub struct BackendInfo {
    pub name: String,
    pub num_qubits: usize,
    pub basis_gates: Vec<String>,
    pub simulator: bool,
    pub max_shots: Option<u32>,
    pub operational: bool,
    pub status_message: Option<String>,
    pub pending_jobs: Option<u32>,
}

/// Job submission response.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub id: String,
}

/// Job status response.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusResponse {
    pub id: String,
    /// Top-level status; mixed case on the Cloud API.
    pub status: String,
    #[serde(default)]
    pub state: Option<JobState>,
}

/// Job state with failure reason.
#[derive(Debug, Clone, Deserialize)]
pub struct JobState {
    #[serde(default)]
    pub reason: Option<String>,
}

impl JobStatusResponse {
    pub fn error_message(&self) -> Option<String> {
        self.state.as_ref().and_then(|s| s.reason.clone())
    }
}

/// Job result response.
#[derive(Debug, Deserialize)]
pub struct JobResultResponse {
    /// One entry per PUB.
    pub results: Vec<SamplerResult>,
}

/// Sampler output for one PUB.
#[derive(Debug, Deserialize)]
pub struct SamplerResult {
    /// Classical register name to per-shot samples.
    #[serde(default)]
    pub data: HashMap<String, ClassicalRegisterData>,
}

/// Per-shot samples of one classical register as hex strings (`"0x1"`).
#[derive(Debug, Deserialize)]
pub struct ClassicalRegisterData {
    pub samples: Vec<String>,
    /// Register width, when the service reports it.
    #[serde(default)]
    pub num_bits: Option<usize>,
}
