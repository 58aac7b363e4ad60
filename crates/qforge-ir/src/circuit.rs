//! High-level circuit builder API.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::QubitId;

/// A quantum circuit: an ordered instruction list over a fixed number of
/// qubits.
///
/// Circuits are values. Builder methods consume the circuit and hand back
/// the extended one, so a circuit shared between pipelines is never mutated
/// behind another holder's back:
///
/// ```rust
/// use qforge_ir::{Circuit, QubitId};
///
/// let bell = Circuit::new(2)
///     .h(QubitId(0))?
///     .cx(QubitId(0), QubitId(1))?;
/// assert_eq!(bell.len(), 2);
/// # Ok::<(), qforge_ir::IrError>(())
/// ```
///
/// Equality compares the width and the instruction list; the name is a label
/// and does not take part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Declared qubit count.
    num_qubits: u32,
    /// Instructions in program order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create an empty circuit over `num_qubits` qubits.
    pub fn new(num_qubits: u32) -> Self {
        Self::with_name("circuit", num_qubits)
    }

    /// Create an empty named circuit.
    pub fn with_name(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            instructions: vec![],
        }
    }

    /// Rename the circuit.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Return a new circuit with `instruction` appended, leaving `self`
    /// untouched.
    pub fn add_instruction(&self, instruction: Instruction) -> IrResult<Circuit> {
        self.clone().push(instruction)
    }

    /// Append an instruction after validating its operands.
    ///
    /// Measurements and barriers without operands are dropped. A measurement
    /// of several qubits is kept whole only when it spans the register in
    /// order; otherwise it is split into one measurement per qubit, which
    /// leaves the sampled outcomes unchanged.
    pub fn push(mut self, instruction: Instruction) -> IrResult<Self> {
        instruction.validate(self.num_qubits)?;
        match instruction.kind {
            InstructionKind::Measure | InstructionKind::Barrier if instruction.qubits.is_empty() => {}
            InstructionKind::Measure
                if instruction.qubits.len() > 1 && !instruction.spans_register(self.num_qubits) =>
            {
                self.instructions
                    .extend(instruction.qubits.iter().map(|&q| Instruction::measure([q])));
            }
            _ => self.instructions.push(instruction),
        }
        Ok(self)
    }

    /// Append a gate on the given qubits.
    pub fn gate(
        self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<Self> {
        self.push(Instruction::gate(gate, qubits))
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(self, qubit: QubitId) -> IrResult<Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(self, qubit: QubitId) -> IrResult<Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(self, qubit: QubitId) -> IrResult<Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(self, qubit: QubitId) -> IrResult<Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    /// Apply S gate.
    pub fn s(self, qubit: QubitId) -> IrResult<Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::S, qubit))
    }

    /// Apply S-dagger gate.
    pub fn sdg(self, qubit: QubitId) -> IrResult<Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Sdg, qubit))
    }

    /// Apply T gate.
    pub fn t(self, qubit: QubitId) -> IrResult<Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::T, qubit))
    }

    /// Apply T-dagger gate.
    pub fn tdg(self, qubit: QubitId) -> IrResult<Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Tdg, qubit))
    }

    /// Apply Rx rotation gate.
    pub fn rx(self, theta: f64, qubit: QubitId) -> IrResult<Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Rx(theta), qubit))
    }

    /// Apply Ry rotation gate.
    pub fn ry(self, theta: f64, qubit: QubitId) -> IrResult<Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Ry(theta), qubit))
    }

    /// Apply Rz rotation gate.
    pub fn rz(self, theta: f64, qubit: QubitId) -> IrResult<Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Rz(theta), qubit))
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(self, control: QubitId, target: QubitId) -> IrResult<Self> {
        self.push(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    /// Apply CZ gate.
    pub fn cz(self, control: QubitId, target: QubitId) -> IrResult<Self> {
        self.push(Instruction::two_qubit_gate(StandardGate::CZ, control, target))
    }

    /// Apply SWAP gate.
    pub fn swap(self, q1: QubitId, q2: QubitId) -> IrResult<Self> {
        self.push(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<Self> {
        self.push(Instruction::gate(StandardGate::CCX, [c1, c2, target]))
    }

    /// Apply a controlled phase `diag(1, 1, 1, e^{iθ})`.
    ///
    /// Expanded into `Rz`/`CX` gates; the result matches the controlled phase
    /// up to a global phase of `e^{-iθ/4}`.
    pub fn cphase(self, theta: f64, control: QubitId, target: QubitId) -> IrResult<Self> {
        self.rz(theta / 2.0, control)?
            .cx(control, target)?
            .rz(-theta / 2.0, target)?
            .cx(control, target)?
            .rz(theta / 2.0, target)
    }

    // =========================================================================
    // Non-unitary operations
    // =========================================================================

    /// Measure a single qubit.
    pub fn measure(self, qubit: QubitId) -> IrResult<Self> {
        self.push(Instruction::measure([qubit]))
    }

    /// Measure every qubit.
    pub fn measure_all(self) -> IrResult<Self> {
        let qubits = self.qubit_ids();
        self.push(Instruction::measure(qubits))
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<Self> {
        self.push(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(self) -> IrResult<Self> {
        let qubits = self.qubit_ids();
        self.push(Instruction::barrier(qubits))
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Append every instruction of `other`.
    ///
    /// `other` may be narrower than `self`; its qubit indices are kept as-is.
    pub fn append(mut self, other: &Circuit) -> IrResult<Self> {
        if other.num_qubits > self.num_qubits {
            return Err(IrError::WidthMismatch {
                this: self.num_qubits,
                other: other.num_qubits,
            });
        }
        for inst in &other.instructions {
            self = self.push(inst.clone())?;
        }
        Ok(self)
    }

    /// The adjoint circuit: gates reversed and individually inverted.
    ///
    /// Barriers are kept in mirrored position; measurements make the circuit
    /// non-invertible.
    pub fn inverse(&self) -> IrResult<Circuit> {
        let mut instructions = Vec::with_capacity(self.instructions.len());
        for inst in self.instructions.iter().rev() {
            let kind = match inst.kind {
                InstructionKind::Gate(g) => InstructionKind::Gate(g.inverse()),
                InstructionKind::Barrier => InstructionKind::Barrier,
                InstructionKind::Measure => {
                    return Err(IrError::NonUnitary(inst.name().to_string()));
                }
            };
            instructions.push(Instruction {
                kind,
                qubits: inst.qubits.clone(),
            });
        }
        Ok(Circuit {
            name: format!("{}_dg", self.name),
            num_qubits: self.num_qubits,
            instructions,
        })
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

    /// All qubit identifiers, in index order.
    pub fn qubit_ids(&self) -> Vec<QubitId> {
        (0..self.num_qubits).map(QubitId).collect()
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions, including measurements and barriers.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Number of unitary gate instructions.
    pub fn gate_count(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_gate()).count()
    }

    /// Check if the circuit contains any measurement.
    pub fn has_measurements(&self) -> bool {
        self.instructions.iter().any(Instruction::is_measure)
    }

    /// Circuit depth: the longest chain of gates and measurements along any
    /// qubit wire. Barriers align their wires but add no layer.
    pub fn depth(&self) -> usize {
        let mut levels = vec![0usize; self.num_qubits as usize];
        for inst in &self.instructions {
            let current = inst
                .qubits
                .iter()
                .map(|q| levels[q.index()])
                .max()
                .unwrap_or(0);
            let next = if inst.is_barrier() { current } else { current + 1 };
            for q in &inst.qubits {
                levels[q.index()] = next;
            }
        }
        levels.into_iter().max().unwrap_or(0)
    }
}

impl PartialEq for Circuit {
    fn eq(&self, other: &Self) -> bool {
        self.num_qubits == other.num_qubits && self.instructions == other.instructions
    }
}
