//! CLI command implementations.

pub mod common;
pub mod compare;
pub mod generate;
pub mod version;
