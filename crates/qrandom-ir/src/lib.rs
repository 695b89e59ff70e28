//! qrandom Circuit Representation
//!
//! A deliberately small circuit IR: enough to describe the single-qubit
//! coin flip that the "simulate" and "real" random bit sources execute, and
//! to hand it to a backend either directly (local simulator) or as
//! OpenQASM 3.0 (cloud hardware).
//!
//! # Example
//!
//! ```rust
//! use qrandom_ir::{Circuit, qasm};
//!
//! let circuit = Circuit::coin_flip();
//! assert_eq!(circuit.num_qubits(), 1);
//! assert_eq!(circuit.num_clbits(), 1);
//!
//! let source = qasm::emit(&circuit);
//! assert!(source.contains("h $0;"));
//!
//! // IBM devices need the circuit in their native basis.
//! let native = qrandom_ir::translate_to_ibm(&circuit);
//! assert!(qasm::emit(&native).contains("sx $0;"));
//! ```
//!
//! # Supported Operations
//!
//! | Operation | Qubits | Description |
//! |-----------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Z` | 1 | Pauli gates |
//! | `SX`, `Rz(θ)` | 1 | IBM native gates (see [`translate`]) |
//! | `measure` | 1 | Computational-basis measurement into a classical bit |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qasm;
pub mod qubit;
pub mod translate;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId};
pub use translate::{IBM_BASIS, gates_outside_basis, translate_to_ibm};
