//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;

use qrandom_ir::StandardGate;

/// A statevector over `n` qubits; qubit `k` is bit `k` of the basis index.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Apply a single-qubit gate.
    pub fn apply_gate(&mut self, gate: StandardGate, qubit: usize) {
        match gate {
            StandardGate::X => self.apply_x(qubit),
            StandardGate::Z => self.apply_z(qubit),
            StandardGate::H => self.apply_h(qubit),
            StandardGate::SX => {
                let p = Complex64::new(0.5, 0.5);
                let m = Complex64::new(0.5, -0.5);
                self.apply_matrix(qubit, [[p, m], [m, p]]);
            }
            StandardGate::Rz(theta) => {
                let zero = Complex64::new(0.0, 0.0);
                let lo = Complex64::from_polar(1.0, -theta / 2.0);
                let hi = Complex64::from_polar(1.0, theta / 2.0);
                self.apply_matrix(qubit, [[lo, zero], [zero, hi]]);
            }
        }
    }

    /// Apply a row-major 2×2 matrix to `qubit`.
    fn apply_matrix(&mut self, qubit: usize, m: [[Complex64; 2]; 2]) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp = -*amp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = std::f64::consts::FRAC_1_SQRT_2;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    /// Probability that measuring `qubit` yields 1.
    pub fn probability_one(&self, qubit: usize) -> f64 {
        let mask = 1 << qubit;
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, amp)| amp.norm_sqr())
            .sum()
    }

    /// Measure `qubit`, collapse the state onto the observed value and
    /// renormalize.
    pub fn measure<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) -> bool {
        let p1 = self.probability_one(qubit);
        let r: f64 = rng.r#gen();
        let outcome = r < p1;

        let mask = 1 << qubit;
        let kept = if outcome { p1 } else { 1.0 - p1 };
        let norm = kept.sqrt();
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) != outcome {
                *amp = Complex64::new(0.0, 0.0);
            } else if norm > 0.0 {
                *amp /= norm;
            }
        }
        outcome
    }

    /// Sample a full basis state without collapsing.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.r#gen();

        let mut cumulative = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            cumulative += amp.norm_sqr();
            if r < cumulative {
                return i;
            }
        }

        // Rounding left r above the accumulated mass.
        self.amplitudes.len() - 1
    }

    #[cfg(test)]
    fn amplitude(&self, index: usize) -> Complex64 {
        self.amplitudes[index]
    }
}

/// Render bits with the highest index first.
pub fn bits_to_bitstring(bits: &[bool]) -> String {
    bits.iter()
        .rev()
        .map(|&b| if b { '1' } else { '0' })
        .collect()
}

/// Render a basis index over `width` qubits, highest qubit first.
pub fn index_to_bitstring(index: usize, width: usize) -> String {
    format!("{index:0width$b}")
}
