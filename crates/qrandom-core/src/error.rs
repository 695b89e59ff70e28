//! Error types for the core crate.

use thiserror::Error;

use qrandom_hal::HalError;

/// Errors produced while drawing bits or assembling random integers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoreError {
    /// The inclusive range is empty.
    #[error("Invalid bounds: upper ({upper}) is below lower ({lower})")]
    InvalidBounds {
        /// Requested lower bound.
        lower: i64,
        /// Requested upper bound.
        upper: i64,
    },

    /// More bits requested than fit in a `u64`.
    #[error("Cannot assemble {0} bits, at most 64 are supported")]
    TooManyBits(usize),

    /// The quantum execution collaborator failed.
    #[error("Backend error: {0}")]
    Backend(#[from] HalError),

    /// A measurement result could not be read as a single bit.
    #[error("Malformed measurement result: {0}")]
    MalformedResult(String),

    /// A replay source ran out of recorded bits.
    #[error("Bit source exhausted after {drawn} bits")]
    SourceExhausted {
        /// Bits handed out before exhaustion.
        drawn: usize,
    },

    /// A summary was requested for an empty sample.
    #[error("Cannot summarise an empty sample: {0}")]
    EmptySample(String),

    /// Writing a summary failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding a summary failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
