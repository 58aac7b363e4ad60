//! Statement parsing.

use tracing::debug;

use qforge_ir::{Instruction, QubitId, StandardGate};

use super::{Parser, QuantumRegister};
use crate::MAX_QUBITS;
use crate::error::{QasmError, QasmResult};
use crate::lexer::Token;

/// A gate or measurement argument: one qubit or a whole register.
#[derive(Debug, Clone)]
enum Operand {
    Qubit(QubitId),
    Register(Vec<QubitId>),
}

/// A classical target of `measure`.
#[derive(Debug, Clone, Copy)]
enum ClassicalTarget {
    Bit,
    Register(u32),
}

impl Parser {
    /// Parse a statement.
    pub(super) fn parse_statement(&mut self) -> QasmResult<()> {
        match self.peek() {
            Some(Token::Include) => self.parse_include(),
            Some(Token::Qreg) => self.parse_qreg(),
            Some(Token::Creg) => self.parse_creg(),
            Some(Token::Measure) => self.parse_measure(),
            Some(Token::Barrier) => self.parse_barrier(),
            Some(Token::Identifier(_)) => self.parse_gate_call(),
            Some(other) => Err(self.error(format!("expected statement, found '{other}'"))),
            None => Err(self.error("expected statement, found end of input")),
        }
    }

    /// `include "file";` is accepted and ignored; the standard gates are builtin.
    fn parse_include(&mut self) -> QasmResult<()> {
        self.expect(Token::Include)?;
        match self.advance() {
            Some(Token::Str(path)) => debug!(%path, "Ignoring include"),
            Some(other) => return Err(self.error(format!("expected include path, found '{other}'"))),
            None => return Err(self.error("expected include path, found end of input")),
        }
        self.expect(Token::Semicolon)
    }

    /// Parse `name[size]` after a register keyword.
    fn parse_register_decl(&mut self) -> QasmResult<(String, u32)> {
        let name = self.parse_identifier()?;
        self.expect(Token::LBracket)?;
        let size = self.parse_index()?;
        self.expect(Token::RBracket)?;
        self.expect(Token::Semicolon)?;

        if self.qregs.contains_key(&name) || self.cregs.contains_key(&name) {
            return Err(self.error(format!("duplicate declaration of '{name}'")));
        }
        if size == 0 {
            return Err(self.error(format!("register '{name}' must have at least one bit")));
        }
        Ok((name, size))
    }

    fn parse_qreg(&mut self) -> QasmResult<()> {
        let line = self.tokens.get(self.pos).map_or(self.line, |t| t.line);
        self.expect(Token::Qreg)?;
        let (name, size) = self.parse_register_decl()?;
        let offset = self.num_qubits;
        let total = offset
            .checked_add(size)
            .filter(|&n| n <= MAX_QUBITS)
            .ok_or_else(|| QasmError::Parse {
                line,
                message: format!(
                    "register '{name}' brings the program past the {MAX_QUBITS}-qubit limit"
                ),
            })?;
        self.num_qubits = total;
        self.qregs.insert(name, QuantumRegister { offset, size });
        Ok(())
    }

    fn parse_creg(&mut self) -> QasmResult<()> {
        self.expect(Token::Creg)?;
        let (name, size) = self.parse_register_decl()?;
        self.cregs.insert(name, size);
        Ok(())
    }

    /// `measure q[i] -> c[j];` or `measure q -> c;`
    ///
    /// Outcomes are reported per qubit, so the classical index only has to
    /// exist.
    fn parse_measure(&mut self) -> QasmResult<()> {
        self.expect(Token::Measure)?;
        let operand = self.parse_operand()?;
        self.expect(Token::Arrow)?;
        let target = self.parse_classical_target()?;
        self.expect(Token::Semicolon)?;

        let qubits = match (operand, target) {
            (Operand::Qubit(q), ClassicalTarget::Bit) => vec![q],
            (Operand::Register(qubits), ClassicalTarget::Register(size))
                if qubits.len() == size as usize =>
            {
                qubits
            }
            (Operand::Register(qubits), ClassicalTarget::Register(size)) => {
                return Err(self.error(format!(
                    "cannot measure {} qubits into {size} bits",
                    qubits.len()
                )));
            }
            _ => return Err(self.error("measure must map a qubit to a bit or a register to a register")),
        };
        self.instructions.push(Instruction::measure(qubits));
        Ok(())
    }

    /// `barrier a, b[1];`
    fn parse_barrier(&mut self) -> QasmResult<()> {
        self.expect(Token::Barrier)?;
        let operands = self.parse_operand_list()?;
        self.expect(Token::Semicolon)?;

        let qubits = operands.into_iter().flat_map(|op| match op {
            Operand::Qubit(q) => vec![q],
            Operand::Register(qubits) => qubits,
        });
        self.instructions.push(Instruction::barrier(qubits));
        Ok(())
    }

    /// `name(params) args;`, broadcasting over whole-register arguments.
    fn parse_gate_call(&mut self) -> QasmResult<()> {
        let name = self.parse_identifier()?;
        let params = self.parse_parameters()?;
        let gate = self.resolve_gate(&name, &params)?;
        let operands = self.parse_operand_list()?;
        self.expect(Token::Semicolon)?;

        let arity = gate.num_qubits() as usize;
        if operands.len() != arity {
            return Err(self.error(format!(
                "gate '{name}' expects {arity} qubits, got {}",
                operands.len()
            )));
        }

        let mut width = None;
        for op in &operands {
            if let Operand::Register(qubits) = op {
                match width {
                    Some(w) if w != qubits.len() => {
                        return Err(self.error(format!(
                            "gate '{name}' broadcasts over registers of different sizes"
                        )));
                    }
                    _ => width = Some(qubits.len()),
                }
            }
        }

        match width {
            None => {
                let qubits = operands.into_iter().map(|op| match op {
                    Operand::Qubit(q) => q,
                    Operand::Register(qubits) => qubits[0],
                });
                self.instructions.push(Instruction::gate(gate, qubits));
            }
            Some(width) => {
                for k in 0..width {
                    let qubits = operands.iter().map(|op| match op {
                        Operand::Qubit(q) => *q,
                        Operand::Register(qubits) => qubits[k],
                    });
                    self.instructions.push(Instruction::gate(gate, qubits));
                }
            }
        }
        Ok(())
    }

    fn resolve_gate(&self, name: &str, params: &[f64]) -> QasmResult<StandardGate> {
        if let Some(gate) = StandardGate::from_name(name) {
            if !params.is_empty() {
                return Err(self.error(format!(
                    "gate '{name}' takes no parameters, got {}",
                    params.len()
                )));
            }
            return Ok(gate);
        }
        match params {
            [theta] => StandardGate::rotation_from_name(name, *theta)
                .ok_or_else(|| self.error(format!("unknown gate '{name}'"))),
            _ if StandardGate::rotation_from_name(name, 0.0).is_some() => Err(self.error(format!(
                "gate '{name}' expects 1 parameter, got {}",
                params.len()
            ))),
            _ => Err(self.error(format!("unknown gate '{name}'"))),
        }
    }

    fn parse_operand_list(&mut self) -> QasmResult<Vec<Operand>> {
        let mut operands = vec![self.parse_operand()?];
        while self.consume(&Token::Comma) {
            operands.push(self.parse_operand()?);
        }
        Ok(operands)
    }

    /// `q` or `q[i]`, resolved to flattened qubit indices.
    fn parse_operand(&mut self) -> QasmResult<Operand> {
        let name = self.parse_identifier()?;
        let register = match self.qregs.get(&name) {
            Some(reg) => *reg,
            None => return Err(self.error(format!("undefined quantum register '{name}'"))),
        };

        if self.consume(&Token::LBracket) {
            let index = self.parse_index()?;
            self.expect(Token::RBracket)?;
            if index >= register.size {
                return Err(self.error(format!(
                    "index {index} out of bounds for register '{name}' of size {}",
                    register.size
                )));
            }
            Ok(Operand::Qubit(QubitId(register.offset + index)))
        } else {
            Ok(Operand::Register(register.qubits().collect()))
        }
    }

    fn parse_classical_target(&mut self) -> QasmResult<ClassicalTarget> {
        let name = self.parse_identifier()?;
        let size = match self.cregs.get(&name) {
            Some(size) => *size,
            None => return Err(self.error(format!("undefined classical register '{name}'"))),
        };

        if self.consume(&Token::LBracket) {
            let index = self.parse_index()?;
            self.expect(Token::RBracket)?;
            if index >= size {
                return Err(self.error(format!(
                    "index {index} out of bounds for register '{name}' of size {size}"
                )));
            }
            Ok(ClassicalTarget::Bit)
        } else {
            Ok(ClassicalTarget::Register(size))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use crate::error::QasmError;
    use qforge_ir::{Instruction, QubitId, StandardGate};

    fn header(body: &str) -> String {
        format!("OPENQASM 2.0;\ninclude \"qelib1.inc\";\n{body}")
    }

    #[test]
    fn test_single_measurements() {
        let circuit = parse(&header(
            "qreg q[2]; creg c[2]; measure q[1] -> c[0]; measure q[0] -> c[1];",
        ))
        .unwrap();
        assert_eq!(circuit.instructions()[0], Instruction::measure([QubitId(1)]));
        assert_eq!(circuit.instructions()[1], Instruction::measure([QubitId(0)]));
    }

    #[test]
    fn test_sub_register_measure_is_per_qubit() {
        let circuit = parse(&header(
            "qreg a[2]; qreg b[1]; creg c[2]; measure a -> c;",
        ))
        .unwrap();
        assert_eq!(
            circuit.instructions(),
            &[
                Instruction::measure([QubitId(0)]),
                Instruction::measure([QubitId(1)]),
            ]
        );
    }

    #[test]
    fn test_register_width_limit() {
        let err = parse(&header("qreg q[4000000000];
h q;")).unwrap_err();
        assert!(matches!(err, QasmError::Parse { line: 3, .. }));
        assert!(err.to_string().contains("30-qubit limit"));

        let err = parse(&header("qreg a[20];
qreg b[11];")).unwrap_err();
        assert!(matches!(err, QasmError::Parse { line: 4, .. }));

        let circuit = parse(&header("qreg a[20];
qreg b[10];")).unwrap();
        assert_eq!(circuit.num_qubits(), 30);
    }

    #[test]
    fn test_measure_size_mismatch() {
        let result = parse(&header("qreg q[3]; creg c[2]; measure q -> c;"));
        assert!(matches!(result, Err(QasmError::Parse { .. })));
    }

    #[test]
    fn test_measure_needs_creg() {
        let result = parse(&header("qreg q[1]; measure q[0] -> c[0];"));
        assert!(matches!(result, Err(QasmError::Parse { .. })));
    }

    #[test]
    fn test_broadcast_single_qubit_gate() {
        let circuit = parse(&header("qreg q[3]; h q;")).unwrap();
        assert_eq!(circuit.gate_count(), 3);
        for (k, inst) in circuit.instructions().iter().enumerate() {
            assert_eq!(
                *inst,
                Instruction::single_qubit_gate(StandardGate::H, QubitId(k as u32))
            );
        }
    }

    #[test]
    fn test_broadcast_two_registers() {
        let circuit = parse(&header("qreg a[2]; qreg b[2]; cx a, b;")).unwrap();
        assert_eq!(
            circuit.instructions(),
            &[
                Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(2)),
                Instruction::two_qubit_gate(StandardGate::CX, QubitId(1), QubitId(3)),
            ]
        );
    }

    #[test]
    fn test_broadcast_size_mismatch() {
        let result = parse(&header("qreg a[2]; qreg b[3]; cx a, b;"));
        assert!(matches!(result, Err(QasmError::Parse { .. })));
    }

    #[test]
    fn test_barrier_flattens_operands() {
        let circuit = parse(&header("qreg a[1]; qreg b[2]; barrier b, a[0];")).unwrap();
        assert_eq!(
            circuit.instructions()[0],
            Instruction::barrier([QubitId(1), QubitId(2), QubitId(0)])
        );
    }

    #[test]
    fn test_wrong_arity_and_params() {
        assert!(parse(&header("qreg q[2]; cx q[0];")).is_err());
        assert!(parse(&header("qreg q[1]; rx q[0];")).is_err());
        assert!(parse(&header("qreg q[1]; h(0.5) q[0];")).is_err());
        assert!(parse(&header("qreg q[1]; u3(0,0,0) q[0];")).is_err());
    }

    #[test]
    fn test_index_out_of_bounds() {
        let err = parse(&header("qreg q[2];\nx q[2];")).unwrap_err();
        assert!(matches!(err, QasmError::Parse { line: 4, .. }));
        assert!(err.to_string().contains("out of bounds"));
    }

    #[test]
    fn test_duplicate_register() {
        assert!(parse(&header("qreg q[1]; creg q[1];")).is_err());
        assert!(parse(&header("qreg q[0];")).is_err());
    }
}
