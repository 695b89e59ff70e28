//! Single-bit sources.
//!
//! Every generation method reduces to "produce one bit". The assembler only
//! sees [`BitSource`]; the three methods differ in what stands behind it:
//!
//! | Source | Method | Backing |
//! |--------|--------|---------|
//! | [`QubitEmulator`] | `pseudo-random` | in-process state vector + RNG |
//! | [`CircuitSource`] | `simulate` / `real` | any [`Backend`], 1 shot per bit |
//! | [`ReplaySource`] | none | a recorded bit sequence |

use std::collections::VecDeque;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use qrandom_hal::{Backend, Counts, HalError, ValidationResult};
use qrandom_ir::Circuit;

use crate::error::{CoreError, CoreResult};
use crate::gate::{Gate, apply_gate};
use crate::measure::{MeasurementOutcome, measure};
use crate::method::Method;
use crate::qubit::zero_state;

/// Produces one measurement outcome per call.
#[async_trait]
pub trait BitSource: Send {
    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Draw the next bit.
    async fn next_bit(&mut self) -> CoreResult<MeasurementOutcome>;
}

/// The "pseudo-random" method: `|0⟩ → H → measure` with an owned RNG.
pub struct QubitEmulator<R = StdRng> {
    rng: R,
}

impl<R: Rng> QubitEmulator<R> {
    /// Emulator driven by the given generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// One emulated coin flip.
    pub fn flip(&mut self) -> MeasurementOutcome {
        let state = apply_gate(zero_state(), &Gate::hadamard());
        measure(state, &mut self.rng)
    }
}

impl QubitEmulator<StdRng> {
    /// Emulator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible emulator.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

#[async_trait]
impl<R: Rng + Send> BitSource for QubitEmulator<R> {
    fn name(&self) -> &str {
        Method::PseudoRandom.as_str()
    }

    async fn next_bit(&mut self) -> CoreResult<MeasurementOutcome> {
        Ok(self.flip())
    }
}

/// The "simulate" and "real" methods: one shot of the coin-flip circuit per
/// bit on a backend.
pub struct CircuitSource {
    method: Method,
    backend: Box<dyn Backend>,
    circuit: Circuit,
}

impl CircuitSource {
    pub fn new(method: Method, backend: Box<dyn Backend>) -> Self {
        Self {
            method,
            backend,
            circuit: Circuit::coin_flip(),
        }
    }

    /// Like [`CircuitSource::new`], but rejects backends that cannot run the
    /// coin-flip circuit.
    pub async fn validated(method: Method, backend: Box<dyn Backend>) -> CoreResult<Self> {
        let source = Self::new(method, backend);
        match source.backend.validate(&source.circuit).await? {
            ValidationResult::Valid => Ok(source),
            ValidationResult::Invalid { reasons } => {
                Err(HalError::InvalidCircuit(reasons.join("; ")).into())
            }
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }
}

#[async_trait]
impl BitSource for CircuitSource {
    fn name(&self) -> &str {
        self.method.as_str()
    }

    async fn next_bit(&mut self) -> CoreResult<MeasurementOutcome> {
        let result = self.backend.run(&self.circuit, 1).await?;
        let bit = extract_bit(&result.counts)?;
        debug!(backend = self.backend.name(), %bit, "drew bit");
        Ok(bit)
    }
}

/// Replays a fixed bit sequence, then fails with
/// [`CoreError::SourceExhausted`].
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    bits: VecDeque<MeasurementOutcome>,
    drawn: usize,
}

impl ReplaySource {
    pub fn new(bits: impl IntoIterator<Item = MeasurementOutcome>) -> Self {
        Self {
            bits: bits.into_iter().collect(),
            drawn: 0,
        }
    }

    /// Build from numeric bits; any value other than 0 or 1 is rejected.
    pub fn from_bits(bits: &[u8]) -> CoreResult<Self> {
        let outcomes = bits
            .iter()
            .map(|&b| {
                MeasurementOutcome::from_bit(u64::from(b))
                    .ok_or_else(|| CoreError::MalformedResult(format!("{b} is not a bit")))
            })
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self::new(outcomes))
    }

    /// Bits not yet handed out.
    pub fn remaining(&self) -> usize {
        self.bits.len()
    }
}

#[async_trait]
impl BitSource for ReplaySource {
    fn name(&self) -> &str {
        "replay"
    }

    async fn next_bit(&mut self) -> CoreResult<MeasurementOutcome> {
        let bit = self
            .bits
            .pop_front()
            .ok_or(CoreError::SourceExhausted { drawn: self.drawn })?;
        self.drawn += 1;
        Ok(bit)
    }
}

/// Read the single bit out of a 1-shot result.
///
/// Uses the first bitstring in the map's (sorted) order. More than one
/// distinct outcome is unexpected for a single shot; it is logged and the
/// first key still wins.
pub fn extract_bit(counts: &Counts) -> CoreResult<MeasurementOutcome> {
    let (key, _) = counts
        .first()
        .ok_or_else(|| CoreError::MalformedResult("result contains no outcomes".into()))?;

    if counts.len() > 1 {
        warn!(
            outcomes = counts.len(),
            chosen = key,
            "expected a single outcome, using the first"
        );
    }

    let value = u64::from_str_radix(key, 2)
        .map_err(|_| CoreError::MalformedResult(format!("'{key}' is not a bitstring")))?;
    MeasurementOutcome::from_bit(value)
        .ok_or_else(|| CoreError::MalformedResult(format!("'{key}' is not a single bit")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, u64)]) -> Counts {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_extract_bit() {
        assert_eq!(
            extract_bit(&counts(&[("0", 1)])).unwrap(),
            MeasurementOutcome::Zero
        );
        assert_eq!(
            extract_bit(&counts(&[("1", 1)])).unwrap(),
            MeasurementOutcome::One
        );
        // Padded single-register bitstrings still parse.
        assert_eq!(
            extract_bit(&counts(&[("01", 1)])).unwrap(),
            MeasurementOutcome::One
        );
    }

    #[test]
    fn test_extract_bit_multiple_keys_uses_first() {
        let bit = extract_bit(&counts(&[("1", 3), ("0", 1)])).unwrap();
        assert_eq!(bit, MeasurementOutcome::Zero);
    }

    #[test]
    fn test_extract_bit_malformed() {
        assert!(matches!(
            extract_bit(&Counts::new()),
            Err(CoreError::MalformedResult(_))
        ));
        assert!(matches!(
            extract_bit(&counts(&[("10", 1)])),
            Err(CoreError::MalformedResult(_))
        ));
        assert!(matches!(
            extract_bit(&counts(&[("x", 1)])),
            Err(CoreError::MalformedResult(_))
        ));
    }

    #[tokio::test]
    async fn test_replay_source() {
        let mut source = ReplaySource::from_bits(&[1, 0]).unwrap();
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.next_bit().await.unwrap(), MeasurementOutcome::One);
        assert_eq!(source.next_bit().await.unwrap(), MeasurementOutcome::Zero);
        let err = source.next_bit().await.unwrap_err();
        assert!(matches!(err, CoreError::SourceExhausted { drawn: 2 }));
    }

    #[test]
    fn test_replay_rejects_non_bits() {
        assert!(ReplaySource::from_bits(&[0, 2]).is_err());
    }

    #[tokio::test]
    async fn test_seeded_emulator_is_reproducible() {
        let mut a = QubitEmulator::seeded(9);
        let mut b = QubitEmulator::seeded(9);
        for _ in 0..32 {
            assert_eq!(a.next_bit().await.unwrap(), b.next_bit().await.unwrap());
        }
        assert_eq!(a.name(), "pseudo-random");
    }
}
