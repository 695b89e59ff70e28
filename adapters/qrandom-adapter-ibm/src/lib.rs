//! IBM Quantum backend for qrandom.
//!
//! Runs the coin-flip circuit on IBM Quantum hardware through the Qiskit
//! Runtime REST API ("real" generation method).
//!
//! ```ignore
//! use qrandom_adapter_ibm::{IbmBackend, IbmConfig};
//!
//! let config = IbmConfig::from_env()?;
//! let backend = IbmBackend::connect(&config).await?;
//! ```
//!
//! Authentication exchanges an IBM Cloud API key for an IAM bearer token;
//! every request then carries the `Service-CRN` of the Quantum instance.
//! Circuits are translated into the device's native basis (`rz`, `sx`,
//! `x`), emitted as OpenQASM 3 on physical qubits and submitted to the
//! Sampler V2 primitive. Per-shot hex samples are folded back into
//! bitstring counts.

pub mod api;
mod backend;
mod config;
mod error;

pub use backend::{IbmBackend, circuit_to_qasm, samples_to_counts};
pub use config::{DEFAULT_BACKEND, DEFAULT_ENDPOINT, IbmConfig};
pub use error::{IbmError, IbmResult};
