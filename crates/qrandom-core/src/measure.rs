//! Probabilistic collapse of a single-qubit state.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::qubit::QubitState;

/// Allowed deviation of `|a|² + |b|²` from 1 before a warning is logged.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-9;

/// A single measured bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MeasurementOutcome {
    /// Collapsed to `|0⟩`.
    Zero,
    /// Collapsed to `|1⟩`.
    One,
}

impl MeasurementOutcome {
    /// Numeric bit value.
    pub fn bit(self) -> u64 {
        match self {
            MeasurementOutcome::Zero => 0,
            MeasurementOutcome::One => 1,
        }
    }

    /// Parse a numeric bit; anything other than 0 or 1 is rejected.
    pub fn from_bit(value: u64) -> Option<Self> {
        match value {
            0 => Some(MeasurementOutcome::Zero),
            1 => Some(MeasurementOutcome::One),
            _ => None,
        }
    }
}

impl From<bool> for MeasurementOutcome {
    fn from(bit: bool) -> Self {
        if bit {
            MeasurementOutcome::One
        } else {
            MeasurementOutcome::Zero
        }
    }
}

impl fmt::Display for MeasurementOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bit())
    }
}

/// Measure `state` in the computational basis.
///
/// Draws `r` uniformly from `[0, 1)` and returns [`MeasurementOutcome::Zero`]
/// when `r < |a|²`. The probabilities are used as-is: an unnormalized state
/// logs a warning and is still sampled, so any excess or missing mass lands
/// on `One`.
pub fn measure<R: Rng + ?Sized>(state: QubitState, rng: &mut R) -> MeasurementOutcome {
    let (p0, p1) = state.probabilities();
    let total = p0 + p1;
    if (total - 1.0).abs() > NORMALIZATION_TOLERANCE {
        warn!(p0, p1, total, "measuring an unnormalized qubit state");
    }

    let r: f64 = rng.r#gen();
    if r < p0 {
        MeasurementOutcome::Zero
    } else {
        MeasurementOutcome::One
    }
}
