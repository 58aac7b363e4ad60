//! Parser for OpenQASM 2.0.
//!
//! Statements are lowered straight into [`Instruction`]s while parsing;
//! quantum registers are flattened onto one qubit index space in declaration
//! order.

mod expression;
mod statement;

use rustc_hash::FxHashMap;
use tracing::debug;

use qforge_ir::{Circuit, Instruction, QubitId};

use crate::error::{QasmError, QasmResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse an OpenQASM 2.0 source string into a Circuit.
pub fn parse(source: &str) -> QasmResult<Circuit> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()?;
    parser.into_circuit()
}

/// A declared quantum register.
#[derive(Debug, Clone, Copy)]
pub(super) struct QuantumRegister {
    /// First flattened qubit index.
    pub(super) offset: u32,
    pub(super) size: u32,
}

impl QuantumRegister {
    pub(super) fn qubits(self) -> impl Iterator<Item = QubitId> {
        (self.offset..self.offset + self.size).map(QubitId)
    }
}

/// Parser state.
pub(super) struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
    pub(super) line: usize,
    pub(super) qregs: FxHashMap<String, QuantumRegister>,
    pub(super) cregs: FxHashMap<String, u32>,
    pub(super) num_qubits: u32,
    pub(super) instructions: Vec<Instruction>,
}

impl Parser {
    /// Create a new parser from source.
    fn new(source: &str) -> QasmResult<Self> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((line, message)) => return Err(QasmError::Lex { line, message }),
            }
        }

        Ok(Self {
            tokens,
            pos: 0,
            line: 1,
            qregs: FxHashMap::default(),
            cregs: FxHashMap::default(),
            num_qubits: 0,
            instructions: Vec::new(),
        })
    }

    /// Check if we've reached the end.
    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Advance and return the current token.
    pub(super) fn advance(&mut self) -> Option<Token> {
        let spanned = self.tokens.get(self.pos)?;
        self.line = spanned.line;
        self.pos += 1;
        Some(spanned.token.clone())
    }

    /// Build a parse error at the current line.
    pub(super) fn error(&self, message: impl Into<String>) -> QasmError {
        let line = self.tokens.get(self.pos).map_or(self.line, |t| t.line);
        QasmError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Expect a specific token.
    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> QasmResult<()> {
        match self.peek() {
            Some(found) if std::mem::discriminant(found) == std::mem::discriminant(&expected) => {
                self.advance();
                Ok(())
            }
            Some(found) => Err(self.error(format!("expected '{expected}', found '{found}'"))),
            None => Err(self.error(format!("expected '{expected}', found end of input"))),
        }
    }

    /// Check if current token matches.
    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Parse the entire program.
    fn parse_program(&mut self) -> QasmResult<()> {
        self.expect(Token::OpenQasm)?;
        self.parse_version()?;
        self.expect(Token::Semicolon)?;

        while !self.is_eof() {
            self.parse_statement()?;
        }
        Ok(())
    }

    /// Only version 2.0 is accepted.
    fn parse_version(&mut self) -> QasmResult<()> {
        let version = match self.peek() {
            Some(Token::Real(v)) => *v,
            Some(Token::Int(v)) => *v as f64,
            Some(other) => return Err(self.error(format!("invalid OPENQASM version '{other}'"))),
            None => return Err(self.error("expected version number")),
        };
        if (version - 2.0).abs() > f64::EPSILON {
            return Err(self.error(format!("unsupported OPENQASM version {version}")));
        }
        self.advance();
        Ok(())
    }

    /// Parse an identifier.
    pub(super) fn parse_identifier(&mut self) -> QasmResult<String> {
        match self.peek() {
            Some(Token::Identifier(s)) => {
                let s = s.clone();
                self.advance();
                Ok(s)
            }
            Some(other) => Err(self.error(format!("expected identifier, found '{other}'"))),
            None => Err(self.error("expected identifier, found end of input")),
        }
    }

    /// Parse an integer literal that fits in 32 bits.
    pub(super) fn parse_index(&mut self) -> QasmResult<u32> {
        match self.peek() {
            Some(Token::Int(v)) => {
                let v = u32::try_from(*v).map_err(|_| self.error(format!("index {v} is too large")))?;
                self.advance();
                Ok(v)
            }
            Some(other) => Err(self.error(format!("expected integer, found '{other}'"))),
            None => Err(self.error("expected integer, found end of input")),
        }
    }

    /// Replay the collected instructions onto a circuit of the declared width.
    fn into_circuit(self) -> QasmResult<Circuit> {
        debug!(
            num_qubits = self.num_qubits,
            instructions = self.instructions.len(),
            "Parsed OpenQASM program"
        );
        let mut circuit = Circuit::new(self.num_qubits);
        for inst in self.instructions {
            circuit = circuit.push(inst)?;
        }
        Ok(circuit)
    }
}
