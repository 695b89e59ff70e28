//! Backend capabilities.

use serde::{Deserialize, Serialize};

use qrandom_ir::IBM_BASIS;

/// What a backend can execute.
///
/// Capabilities are cached at construction so that introspection is
/// synchronous and infallible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate names (OpenQASM 3 naming convention).
    pub gate_set: Vec<String>,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) or real hardware (`false`).
    pub is_simulator: bool,
}

impl Capabilities {
    /// Create capabilities for a local simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: ["h", "x", "z", "sx", "rz"].map(String::from).to_vec(),
            max_shots: 100_000,
            is_simulator: true,
        }
    }

    /// Create capabilities for an IBM Quantum device.
    ///
    /// Only the native single-qubit basis is listed; circuits must be
    /// translated with `qrandom_ir::translate_to_ibm` first.
    pub fn ibm(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            gate_set: IBM_BASIS.map(String::from).to_vec(),
            max_shots: 100_000,
            is_simulator: false,
        }
    }

    /// Check whether a gate name is supported.
    pub fn supports_gate(&self, name: &str) -> bool {
        self.gate_set.iter().any(|g| g == name)
    }
}
