//! Random integer assembly from single-bit draws.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{CoreError, CoreResult};
use crate::measure::MeasurementOutcome;
use crate::source::BitSource;

/// Widest bit sequence that fits the unsigned accumulator.
pub const MAX_BITS: u32 = u64::BITS;

/// Inclusive integer range `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    lower: i64,
    upper: i64,
}

impl Bounds {
    /// Create a range; `upper < lower` is rejected.
    pub fn new(lower: i64, upper: i64) -> CoreResult<Self> {
        if upper < lower {
            return Err(CoreError::InvalidBounds { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> i64 {
        self.lower
    }

    pub fn upper(&self) -> i64 {
        self.upper
    }

    /// Number of integers in the range. Up to 2^64, hence `u128`.
    pub fn span(&self) -> u128 {
        (i128::from(self.upper) - i128::from(self.lower) + 1) as u128
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }

    /// `lower + (value mod span)`.
    pub fn reduce(&self, value: u64) -> i64 {
        let offset = u128::from(value) % self.span();
        // lower + offset <= upper, so the sum fits in i64.
        (i128::from(self.lower) + offset as i128) as i64
    }
}

impl Default for Bounds {
    /// The byte range `[0, 255]`.
    fn default() -> Self {
        Self {
            lower: 0,
            upper: 255,
        }
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Concatenate bits most-significant first. An empty slice is 0; bits past
/// the 64th shift earlier ones out.
pub fn bits_to_value(bits: &[MeasurementOutcome]) -> u64 {
    bits.iter().fold(0u64, |acc, bit| (acc << 1) | bit.bit())
}

/// Turn a bit sequence into an integer in `bounds`.
///
/// The plain modulo keeps the bias of non-power-of-two ranges: with 2 bits
/// and `[0, 2]`, both `00` and `11` map to 0.
pub fn assemble(bits: &[MeasurementOutcome], bounds: Bounds) -> CoreResult<i64> {
    if bits.len() > MAX_BITS as usize {
        return Err(CoreError::TooManyBits(bits.len()));
    }
    Ok(bounds.reduce(bits_to_value(bits)))
}

/// Draw `n_bits` bits from `source`, first bit most significant, and reduce
/// the result into `bounds`.
///
/// Zero bits yield `bounds.lower()`. Any source error aborts the draw.
#[instrument(skip(source), fields(bit_source = source.name()))]
pub async fn random_number<S>(source: &mut S, n_bits: u32, bounds: Bounds) -> CoreResult<i64>
where
    S: BitSource + ?Sized,
{
    if n_bits > MAX_BITS {
        return Err(CoreError::TooManyBits(n_bits as usize));
    }

    let mut bits = Vec::with_capacity(n_bits as usize);
    for _ in 0..n_bits {
        bits.push(source.next_bit().await?);
    }

    let value = assemble(&bits, bounds)?;
    debug!(
        bits = %bits.iter().map(ToString::to_string).collect::<String>(),
        value,
        "assembled random number"
    );
    Ok(value)
}

/// A bit source bundled with a bit width and bounds.
pub struct RandomNumberGenerator {
    source: Box<dyn BitSource>,
    n_bits: u32,
    bounds: Bounds,
}

impl RandomNumberGenerator {
    pub fn new(source: Box<dyn BitSource>, n_bits: u32, bounds: Bounds) -> CoreResult<Self> {
        if n_bits > MAX_BITS {
            return Err(CoreError::TooManyBits(n_bits as usize));
        }
        Ok(Self {
            source,
            n_bits,
            bounds,
        })
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn n_bits(&self) -> u32 {
        self.n_bits
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Generate one integer.
    pub async fn generate(&mut self) -> CoreResult<i64> {
        random_number(self.source.as_mut(), self.n_bits, self.bounds).await
    }

    /// Generate `count` integers in sequence; the first error aborts.
    pub async fn generate_many(&mut self, count: usize) -> CoreResult<Vec<i64>> {
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.generate().await?);
        }
        Ok(values)
    }
}
