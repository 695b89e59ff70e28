//! Connection settings for IBM Quantum.

use std::fmt;

use serde::Deserialize;

use crate::error::{IbmError, IbmResult};

/// Default IBM Quantum Cloud API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://quantum.cloud.ibm.com/api";

/// Default device (Heron processor).
pub const DEFAULT_BACKEND: &str = "ibm_torino";

/// Credentials and target device for the "real" method.
///
/// Only the IBM backend ever reads this; the other methods need no
/// configuration.
#[derive(Clone, Deserialize)]
pub struct IbmConfig {
    /// IBM Cloud API key, exchanged for an IAM bearer token.
    pub api_key: String,
    /// Service instance CRN (sent as the `Service-CRN` header).
    pub service_crn: String,
    /// Device name.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Override for the Runtime API base URL.
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn default_backend() -> String {
    DEFAULT_BACKEND.to_string()
}

impl fmt::Debug for IbmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IbmConfig")
            .field("api_key", &"[REDACTED]")
            .field("service_crn", &self.service_crn)
            .field("backend", &self.backend)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl IbmConfig {
    pub fn new(api_key: impl Into<String>, service_crn: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            service_crn: service_crn.into(),
            backend: default_backend(),
            endpoint: None,
        }
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Read `IBM_API_KEY`, `IBM_SERVICE_CRN`, `IBM_BACKEND` and
    /// `IBM_QUANTUM_ENDPOINT`.
    pub fn from_env() -> IbmResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`IbmConfig::from_env`], reading variables through `lookup`.
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> IbmResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("IBM_API_KEY").ok_or(IbmError::MissingApiKey)?;
        let service_crn = get("IBM_SERVICE_CRN").ok_or(IbmError::MissingServiceCrn)?;

        let mut config = Self::new(api_key, service_crn);
        if let Some(backend) = get("IBM_BACKEND") {
            config.backend = backend;
        }
        config.endpoint = get("IBM_QUANTUM_ENDPOINT");
        Ok(config)
    }

    /// Base URL of the Runtime API, without a trailing slash.
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/')
    }

    /// Reject blank credentials before any network call.
    pub fn validate(&self) -> IbmResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(IbmError::MissingApiKey);
        }
        if self.service_crn.trim().is_empty() {
            return Err(IbmError::MissingServiceCrn);
        }
        Ok(())
    }
}
