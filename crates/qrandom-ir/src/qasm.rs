//! OpenQASM 3.0 emission.
//!
//! Circuit qubit `k` is written as physical qubit `$k`, so no `qubit`
//! register is declared. Classical bits live in a register `c`.

use std::f64::consts::PI;
use std::fmt::Write;

use crate::circuit::Circuit;
use crate::instruction::{Instruction, InstructionKind};

/// Emit a circuit as OpenQASM 3.0 source code.
pub fn emit(circuit: &Circuit) -> String {
    let mut out = String::new();
    out.push_str("OPENQASM 3.0;\n\n");

    let num_clbits = circuit.num_clbits();
    if num_clbits > 0 {
        let _ = writeln!(out, "bit[{num_clbits}] c;\n");
    }

    for instruction in circuit.instructions() {
        emit_instruction(&mut out, instruction);
    }
    out
}

fn emit_instruction(out: &mut String, instruction: &Instruction) {
    match &instruction.kind {
        InstructionKind::Gate(gate) => {
            let operands: Vec<String> = instruction
                .qubits
                .iter()
                .map(|q| format!("${}", q.0))
                .collect();
            let _ = match gate.parameter() {
                Some(theta) => writeln!(
                    out,
                    "{}({}) {};",
                    gate.name(),
                    format_angle(theta),
                    operands.join(", ")
                ),
                None => writeln!(out, "{} {};", gate.name(), operands.join(", ")),
            };
        }
        InstructionKind::Measure => {
            for (q, c) in instruction.qubits.iter().zip(&instruction.clbits) {
                let _ = writeln!(out, "c[{}] = measure ${};", c.0, q.0);
            }
        }
    }
}

/// Simple multiples of π print symbolically.
fn format_angle(theta: f64) -> String {
    const EPS: f64 = 1e-12;
    for (multiple, text) in [
        (1.0, "pi"),
        (-1.0, "-pi"),
        (0.5, "pi/2"),
        (-0.5, "-pi/2"),
        (0.25, "pi/4"),
        (-0.25, "-pi/4"),
    ] {
        if (theta - multiple * PI).abs() < EPS {
            return text.to_string();
        }
    }
    format!("{theta}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qubit::QubitId;
    use crate::translate::translate_to_ibm;

    #[test]
    fn test_emit_coin_flip() {
        let qasm = emit(&Circuit::coin_flip());
        assert!(qasm.starts_with("OPENQASM 3.0;"));
        assert!(!qasm.contains("qubit["));
        assert!(qasm.contains("bit[1] c;"));
        assert!(qasm.contains("h $0;"));
        assert!(qasm.contains("c[0] = measure $0;"));
        // Gate must precede the measurement.
        assert!(qasm.find("h $0").unwrap() < qasm.find("measure").unwrap());
    }

    #[test]
    fn test_emit_without_clbits() {
        let mut circuit = Circuit::with_size("bare", 2, 0);
        circuit.x(QubitId(1)).unwrap();
        let qasm = emit(&circuit);
        assert!(!qasm.contains("bit["));
        assert!(qasm.contains("x $1;"));
    }

    #[test]
    fn test_emit_native_coin_flip() {
        let qasm = emit(&translate_to_ibm(&Circuit::coin_flip()));
        assert_eq!(qasm.matches("rz(pi/2) $0;").count(), 2);
        assert!(qasm.contains("sx $0;"));
        assert!(qasm.contains("c[0] = measure $0;"));
        assert!(!qasm.contains("h $0"));
    }

    #[test]
    fn test_angle_formatting() {
        assert_eq!(format_angle(PI), "pi");
        assert_eq!(format_angle(-PI / 2.0), "-pi/2");
        assert_eq!(format_angle(0.125), "0.125");
    }
}
