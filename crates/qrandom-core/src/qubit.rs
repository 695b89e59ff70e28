//! Single-qubit state vector.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Amplitudes `[a, b]` of a single qubit over the basis `|0⟩, |1⟩`.
///
/// Normalization (`|a|² + |b|² = 1`) is expected but not enforced; see
/// [`QubitState::is_normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QubitState {
    amplitudes: [Complex64; 2],
}

impl QubitState {
    /// Build a state from explicit amplitudes.
    pub fn new(alpha: Complex64, beta: Complex64) -> Self {
        Self {
            amplitudes: [alpha, beta],
        }
    }

    /// The computational basis state `|0⟩`.
    pub fn zero() -> Self {
        Self::new(Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0))
    }

    /// The computational basis state `|1⟩`.
    pub fn one() -> Self {
        Self::new(Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0))
    }

    /// Amplitude of `|0⟩`.
    pub fn alpha(&self) -> Complex64 {
        self.amplitudes[0]
    }

    /// Amplitude of `|1⟩`.
    pub fn beta(&self) -> Complex64 {
        self.amplitudes[1]
    }

    pub fn amplitudes(&self) -> [Complex64; 2] {
        self.amplitudes
    }

    /// Born-rule probabilities `(|a|², |b|²)`.
    pub fn probabilities(&self) -> (f64, f64) {
        (self.amplitudes[0].norm_sqr(), self.amplitudes[1].norm_sqr())
    }

    /// Sum of the squared magnitudes.
    pub fn norm_sqr(&self) -> f64 {
        let (p0, p1) = self.probabilities();
        p0 + p1
    }

    /// Check `|a|² + |b|² = 1` within `tolerance`.
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        (self.norm_sqr() - 1.0).abs() <= tolerance
    }
}

impl Default for QubitState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Fresh `|0⟩` state, the starting point of every single-bit draw.
pub fn zero_state() -> QubitState {
    QubitState::zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_state() {
        let state = zero_state();
        assert_eq!(state.alpha(), Complex64::new(1.0, 0.0));
        assert_eq!(state.beta(), Complex64::new(0.0, 0.0));
        assert_eq!(state.probabilities(), (1.0, 0.0));
        assert!(state.is_normalized(1e-12));
    }

    #[test]
    fn test_unnormalized_state_is_detected() {
        let state = QubitState::new(Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0));
        assert!(!state.is_normalized(1e-9));
        assert!((state.norm_sqr() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_complex_amplitude_probability() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let state = QubitState::new(Complex64::new(0.0, h), Complex64::new(-h, 0.0));
        let (p0, p1) = state.probabilities();
        assert!((p0 - 0.5).abs() < 1e-12);
        assert!((p1 - 0.5).abs() < 1e-12);
    }
}
