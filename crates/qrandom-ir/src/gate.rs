//! Gate definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard single-qubit gates understood by qrandom backends.
///
/// `H`, `X` and `Z` describe circuits; `SX`, `Rz` and `X` form the native
/// basis that IBM devices execute (see [`crate::translate`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Pauli-X gate.
    X,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// Square root of X.
    SX,
    /// Rotation about Z by the given angle (radians).
    Rz(f64),
}

impl StandardGate {
    /// OpenQASM name of the gate.
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::X => "x",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::SX => "sx",
            StandardGate::Rz(_) => "rz",
        }
    }

    /// Rotation angle, for parameterized gates.
    pub fn parameter(&self) -> Option<f64> {
        match self {
            StandardGate::Rz(theta) => Some(*theta),
            _ => None,
        }
    }

    /// Number of qubits the gate acts on.
    pub fn num_qubits(&self) -> u32 {
        1
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parameter() {
            Some(theta) => write!(f, "{}({theta})", self.name()),
            None => write!(f, "{}", self.name()),
        }
    }
}
