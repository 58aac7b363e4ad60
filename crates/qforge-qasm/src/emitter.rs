//! OpenQASM 2.0 emitter for serializing circuits.

use std::fmt::Write;

use qforge_ir::{Circuit, Instruction, InstructionKind, QubitId};

/// Emit a circuit as OpenQASM 2.0 source code.
///
/// All qubits live in one register `q`. Angles are printed with `f64`'s
/// shortest round-trip representation, so [`crate::parse`] reads back the
/// same circuit. A measurement that spans the whole register in order becomes
/// `measure q -> c;`, any other one is written per qubit. Barriers without
/// operands are dropped.
pub fn emit(circuit: &Circuit) -> String {
    let mut emitter = Emitter::new(circuit.num_qubits() as u32);
    emitter.emit_circuit(circuit);
    emitter.output
}

struct Emitter {
    output: String,
    num_qubits: u32,
}

impl Emitter {
    fn new(num_qubits: u32) -> Self {
        Self {
            output: String::new(),
            num_qubits,
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) {
        self.writeln("OPENQASM 2.0;");
        self.writeln("include \"qelib1.inc\";");

        if self.num_qubits > 0 {
            self.writeln(&format!("qreg q[{}];", self.num_qubits));
        }
        if self.num_qubits > 0 && circuit.has_measurements() {
            self.writeln(&format!("creg c[{}];", self.num_qubits));
        }

        for instruction in circuit.instructions() {
            self.emit_instruction(instruction);
        }
    }

    fn emit_instruction(&mut self, instruction: &Instruction) {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let qubits = Self::emit_qubits(&instruction.qubits);
                match gate.angle() {
                    Some(theta) => self.writeln(&format!("{}({theta:?}) {qubits};", gate.name())),
                    None => self.writeln(&format!("{} {qubits};", gate.name())),
                }
            }

            InstructionKind::Measure => {
                if instruction.spans_register(self.num_qubits) {
                    self.writeln("measure q -> c;");
                } else {
                    for q in &instruction.qubits {
                        self.writeln(&format!("measure q[{0}] -> c[{0}];", q.0));
                    }
                }
            }

            InstructionKind::Barrier => {
                if instruction.qubits.is_empty() {
                    return;
                }
                if instruction.spans_register(self.num_qubits) {
                    self.writeln("barrier q;");
                } else {
                    let qubits = Self::emit_qubits(&instruction.qubits);
                    self.writeln(&format!("barrier {qubits};"));
                }
            }
        }
    }

    fn emit_qubits(qubits: &[QubitId]) -> String {
        let mut out = String::new();
        for (i, q) in qubits.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "q[{}]", q.0);
        }
        out
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qforge_ir::library;

    #[test]
    fn test_emit_bell() {
        let circuit = library::bell().unwrap().measure_all().unwrap();
        let qasm = emit(&circuit);

        assert!(qasm.starts_with("OPENQASM 2.0;\n"));
        assert!(qasm.contains("qreg q[2];"));
        assert!(qasm.contains("creg c[2];"));
        assert!(qasm.contains("h q[0];"));
        assert!(qasm.contains("cx q[0], q[1];"));
        assert!(qasm.contains("measure q -> c;"));
    }

    #[test]
    fn test_emit_parameters_exactly() {
        let circuit = Circuit::new(1)
            .rx(0.1, QubitId(0))
            .unwrap()
            .rz(-1e-7, QubitId(0))
            .unwrap();
        let qasm = emit(&circuit);
        assert!(qasm.contains("rx(0.1) q[0];"));
        assert!(qasm.contains("rz(-1e-7) q[0];"));
    }

    #[test]
    fn test_partial_measure_is_per_qubit() {
        let circuit = Circuit::new(3)
            .push(Instruction::measure([QubitId(2), QubitId(0)]))
            .unwrap();
        let qasm = emit(&circuit);
        assert!(qasm.contains("measure q[2] -> c[2];\nmeasure q[0] -> c[0];"));
    }

    #[test]
    fn test_empty_circuit() {
        let qasm = emit(&Circuit::new(0));
        assert!(!qasm.contains("qreg"));
        assert!(!qasm.contains("creg"));
    }
}
