//! Fixed 2×2 gate matrices.

use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

use num_complex::Complex64;

use crate::qubit::QubitState;

/// Row-major 2×2 complex matrix.
pub type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A single-qubit gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gate {
    name: &'static str,
    matrix: Matrix2,
}

impl Gate {
    /// Wrap an arbitrary matrix. Unitarity is not checked here.
    pub const fn new(name: &'static str, matrix: Matrix2) -> Self {
        Self { name, matrix }
    }

    /// Hadamard: `(1/√2)·[[1, 1], [1, −1]]`.
    pub const fn hadamard() -> Self {
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        let neg_h = Complex64::new(-FRAC_1_SQRT_2, 0.0);
        Self::new("h", [[h, h], [h, neg_h]])
    }

    /// Pauli-Z: `[[1, 0], [0, −1]]`.
    pub const fn pauli_z() -> Self {
        Self::new("z", [[ONE, ZERO], [ZERO, Complex64::new(-1.0, 0.0)]])
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn matrix(&self) -> &Matrix2 {
        &self.matrix
    }

    /// Matrix-vector product `self · state`.
    pub fn apply(&self, state: QubitState) -> QubitState {
        let [a, b] = state.amplitudes();
        let m = &self.matrix;
        QubitState::new(m[0][0] * a + m[0][1] * b, m[1][0] * a + m[1][1] * b)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Apply `gate` to `state`. Pure; never fails.
pub fn apply_gate(state: QubitState, gate: &Gate) -> QubitState {
    gate.apply(state)
}
