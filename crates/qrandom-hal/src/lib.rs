//! qrandom Hardware Abstraction Layer
//!
//! A unified interface for executing circuits on quantum backends, so the
//! "simulate" and "real" random bit sources can share one code path.
//!
//! # Overview
//!
//! - A common [`Backend`] trait for job submission and management
//! - [`Capabilities`] to describe what a backend accepts
//! - Unified result handling via [`ExecutionResult`] and [`Counts`]
//!
//! # Backends
//!
//! | Backend | Crate | Authentication |
//! |---------|-------|----------------|
//! | Local Simulator | `qrandom-adapter-sim` | None |
//! | IBM Quantum | `qrandom-adapter-ibm` | API key + service CRN |
//!
//! # Example
//!
//! ```ignore
//! use qrandom_hal::Backend;
//! use qrandom_adapter_sim::SimulatorBackend;
//! use qrandom_ir::Circuit;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::new();
//!     let result = backend.run(&Circuit::coin_flip(), 1).await?;
//!     println!("Results: {:?}", result.counts);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod result;

pub use backend::{Backend, BackendAvailability, MAX_POLLS, POLL_INTERVAL, ValidationResult};
pub use capability::Capabilities;
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use result::{Counts, ExecutionResult};
