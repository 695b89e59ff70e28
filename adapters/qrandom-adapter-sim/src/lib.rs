//! qrandom Local Statevector Simulator
//!
//! Backs the "simulate" generation method: a small statevector simulator
//! that executes circuits built from H, X, Z and measurement.
//!
//! # Features
//!
//! - **Mid-circuit collapse**: measurement projects the state and records
//!   into the target classical bit
//! - **Reproducible runs**: [`SimulatorBackend::with_seed`]
//! - **Synchronous jobs**: results are ready as soon as `submit` returns
//!
//! Bitstrings put the highest classical bit first, so a 1-bit circuit
//! reports `"0"` or `"1"`.
//!
//! # Example
//!
//! ```ignore
//! use qrandom_adapter_sim::SimulatorBackend;
//! use qrandom_hal::Backend;
//! use qrandom_ir::Circuit;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::with_seed(7);
//!     let result = backend.run(&Circuit::coin_flip(), 100).await?;
//!
//!     // Roughly 50 of each.
//!     println!("Results: {:?}", result.counts);
//!     Ok(())
//! }
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_QUBITS, SimulatorBackend};
