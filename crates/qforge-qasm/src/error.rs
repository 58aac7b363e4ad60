//! Error types for OpenQASM import.

use qforge_ir::IrError;
use thiserror::Error;

/// Errors that can occur while reading OpenQASM source.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum QasmError {
    /// The source contains a character sequence that is not a token.
    #[error("Lexer error at line {line}: {message}")]
    Lex { line: usize, message: String },

    /// The token stream does not form a supported program.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The program is well formed but builds an invalid circuit.
    #[error("Circuit error: {0}")]
    Ir(#[from] IrError),
}

/// Result type for OpenQASM operations.
pub type QasmResult<T> = Result<T, QasmError>;
