//! High-level circuit builder API.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit.
///
/// Instructions are kept in program order. Qubits live in a single register
/// `q` and classical bits in a single register `c`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits.
    num_qubits: u32,
    /// Number of classical bits.
    num_clbits: u32,
    /// Instructions in program order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            num_qubits: 0,
            num_clbits: 0,
            instructions: vec![],
        }
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            instructions: vec![],
        }
    }

    /// The single-qubit coin flip: `H q[0]; measure q[0] -> c[0];`.
    ///
    /// One shot of this circuit yields one uniformly distributed bit on an
    /// ideal device.
    pub fn coin_flip() -> Self {
        let mut circuit = Self::with_size("coin_flip", 1, 1);
        circuit.instructions.push(Instruction::single_qubit_gate(
            StandardGate::H,
            QubitId(0),
        ));
        circuit
            .instructions
            .push(Instruction::measure(QubitId(0), ClbitId(0)));
        circuit
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.num_qubits);
        self.num_qubits += 1;
        id
    }

    /// Add a single classical bit to the circuit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.num_clbits);
        self.num_clbits += 1;
        id
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_gate(StandardGate::H, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_gate(StandardGate::X, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_gate(StandardGate::Z, qubit)
    }

    /// Measure a qubit into a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.check_qubit(qubit, None)?;
        if clbit.0 >= self.num_clbits {
            return Err(IrError::ClbitNotFound { clbit });
        }
        self.instructions.push(Instruction::measure(qubit, clbit));
        Ok(self)
    }

    fn apply_gate(&mut self, gate: StandardGate, qubit: QubitId) -> IrResult<&mut Self> {
        self.check_qubit(qubit, Some(gate))?;
        self.instructions
            .push(Instruction::single_qubit_gate(gate, qubit));
        Ok(self)
    }

    /// Append an instruction whose operands are already known to be in range.
    pub(crate) fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    fn check_qubit(&self, qubit: QubitId, gate: Option<StandardGate>) -> IrResult<()> {
        if qubit.0 >= self.num_qubits {
            return Err(IrError::QubitNotFound {
                qubit,
                gate_name: gate.map(|g| g.name().to_string()),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn num_ops(&self) -> usize {
        self.instructions.len()
    }

    /// Check whether the circuit measures anything.
    pub fn has_measurements(&self) -> bool {
        self.instructions.iter().any(Instruction::is_measure)
    }
}
