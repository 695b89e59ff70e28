//! `qrandom-core`: qubit measurement emulation and random integer assembly.
//!
//! Random integers are built one bit at a time. Each bit comes from a
//! [`BitSource`]:
//!
//! - **pseudo-random**: [`QubitEmulator`] prepares `|0⟩`, applies a Hadamard
//!   and measures with an injected RNG;
//! - **simulate** / **real**: [`CircuitSource`] runs the one-qubit coin-flip
//!   circuit on any `qrandom_hal::Backend`, one shot per bit.
//!
//! The bits are concatenated most-significant first and reduced into an
//! inclusive range with a plain modulo.
//!
//! # Quick start
//!
//! ```rust
//! use qrandom_core::{Bounds, QubitEmulator, assemble};
//!
//! let mut emulator = QubitEmulator::seeded(42);
//! let bits: Vec<_> = (0..8).map(|_| emulator.flip()).collect();
//! let value = assemble(&bits, Bounds::new(0, 255).unwrap()).unwrap();
//! assert!((0..=255).contains(&value));
//! ```

pub mod assembler;
pub mod error;
pub mod gate;
pub mod measure;
pub mod method;
pub mod qubit;
pub mod report;
pub mod source;

pub use assembler::{
    Bounds, MAX_BITS, RandomNumberGenerator, assemble, bits_to_value, random_number,
};
pub use error::{CoreError, CoreResult};
pub use gate::{Gate, apply_gate};
pub use measure::{MeasurementOutcome, NORMALIZATION_TOLERANCE, measure};
pub use method::{Method, ParseMethodError};
pub use qubit::{QubitState, zero_state};
pub use report::{BoxStats, DensityPoint, DistributionSummary, HistogramBin};
pub use source::{BitSource, CircuitSource, QubitEmulator, ReplaySource, extract_bit};
