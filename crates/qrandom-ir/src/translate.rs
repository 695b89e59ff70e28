//! Basis translation.
//!
//! IBM devices only execute their native gate set. The coin flip's `H` is
//! rewritten into that set before submission:
//!
//! | Gate | IBM basis (RZ + SX + X) |
//! |------|-------------------------|
//! | `X` | `X` |
//! | `Z` | `Rz(π)` |
//! | `H` | `Rz(π/2) · SX · Rz(π/2)` |
//!
//! Each rewrite is exact up to a global phase.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::circuit::Circuit;
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};

/// Single-qubit gates common to IBM Eagle and Heron processors.
pub const IBM_BASIS: [&str; 3] = ["rz", "sx", "x"];

/// Rewrite every gate of `circuit` into [`IBM_BASIS`].
///
/// Measurements and operands are kept in place.
pub fn translate_to_ibm(circuit: &Circuit) -> Circuit {
    let mut out = Circuit::with_size(
        circuit.name(),
        circuit.num_qubits() as u32,
        circuit.num_clbits() as u32,
    );

    for inst in circuit.instructions() {
        let InstructionKind::Gate(gate) = &inst.kind else {
            out.push(inst.clone());
            continue;
        };
        let q0 = inst.qubits[0];
        let replacement = match *gate {
            StandardGate::H => vec![
                StandardGate::Rz(FRAC_PI_2),
                StandardGate::SX,
                StandardGate::Rz(FRAC_PI_2),
            ],
            StandardGate::Z => vec![StandardGate::Rz(PI)],
            native @ (StandardGate::X | StandardGate::SX | StandardGate::Rz(_)) => vec![native],
        };
        for g in replacement {
            out.push(Instruction::single_qubit_gate(g, q0));
        }
    }
    out
}

/// Names of gates in `circuit` that `basis` does not contain, in first-use
/// order without repeats.
pub fn gates_outside_basis<S: AsRef<str>>(circuit: &Circuit, basis: &[S]) -> Vec<&'static str> {
    let mut missing = Vec::new();
    for gate in circuit.instructions().iter().filter_map(Instruction::as_gate) {
        let name = gate.name();
        if !basis.iter().any(|b| b.as_ref() == name) && !missing.contains(&name) {
            missing.push(name);
        }
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qubit::{ClbitId, QubitId};

    #[test]
    fn test_coin_flip_lowering() {
        let native = translate_to_ibm(&Circuit::coin_flip());
        let kinds: Vec<_> = native.instructions().iter().map(|i| i.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                InstructionKind::Gate(StandardGate::Rz(FRAC_PI_2)),
                InstructionKind::Gate(StandardGate::SX),
                InstructionKind::Gate(StandardGate::Rz(FRAC_PI_2)),
                InstructionKind::Measure,
            ]
        );
        assert_eq!(native.num_qubits(), 1);
        assert_eq!(native.num_clbits(), 1);
        assert!(gates_outside_basis(&native, &IBM_BASIS).is_empty());
    }

    #[test]
    fn test_pauli_lowering_keeps_operands() {
        let mut circuit = Circuit::with_size("paulis", 2, 1);
        circuit.x(QubitId(1)).unwrap().z(QubitId(0)).unwrap();
        circuit.measure(QubitId(1), ClbitId(0)).unwrap();

        let native = translate_to_ibm(&circuit);
        let ops = native.instructions();
        assert_eq!(ops[0].kind, InstructionKind::Gate(StandardGate::X));
        assert_eq!(ops[0].qubits, vec![QubitId(1)]);
        assert_eq!(ops[1].kind, InstructionKind::Gate(StandardGate::Rz(PI)));
        assert_eq!(ops[1].qubits, vec![QubitId(0)]);
        assert!(ops[2].is_measure());
    }

    #[test]
    fn test_gates_outside_basis() {
        let circuit = Circuit::coin_flip();
        assert_eq!(gates_outside_basis(&circuit, &IBM_BASIS), vec!["h"]);

        let heron: Vec<String> = ["cz", "rz", "sx", "x"].map(String::from).to_vec();
        let native = translate_to_ibm(&circuit);
        assert!(gates_outside_basis(&native, &heron).is_empty());

        let no_sx = ["rz", "x"];
        assert_eq!(gates_outside_basis(&native, &no_sx), vec!["sx"]);
    }
}
