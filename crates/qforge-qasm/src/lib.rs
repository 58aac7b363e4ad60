//! OpenQASM 2.0 import and export for qforge circuits
//!
//! # Supported subset
//!
//! - `OPENQASM 2.0;` header and `include` lines (includes are ignored; the
//!   standard gates are builtin)
//! - `qreg` / `creg` declarations; multiple quantum registers are flattened
//!   onto one index space in declaration order, up to [`MAX_QUBITS`] in total
//! - `h x y z s sdg t tdg cx CX cz swap ccx`, and `rx ry rz` with constant
//!   expressions over numbers, `pi`, `+ - * /`, unary minus and parentheses
//! - whole-register broadcasting (`h q;`, `cx a, b;`)
//! - `measure q[i] -> c[j];`, `measure q -> c;` and `barrier`
//! - line and block comments
//!
//! # Example
//!
//! ```rust
//! use qforge_qasm::{emit, parse};
//!
//! let source = r#"
//!     OPENQASM 2.0;
//!     include "qelib1.inc";
//!     qreg q[2];
//!     creg c[2];
//!     h q[0];
//!     cx q[0], q[1];
//!     measure q -> c;
//! "#;
//!
//! let circuit = parse(source)?;
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(parse(&emit(&circuit))?, circuit);
//! # Ok::<(), qforge_qasm::QasmError>(())
//! ```

mod emitter;
mod error;
mod lexer;
mod parser;

pub use emitter::emit;
pub use error::{QasmError, QasmResult};
pub use parser::parse;

/// Widest program the parser accepts, matching the sparse simulator's
/// ceiling. Declarations past it are rejected before any operand is expanded.
pub const MAX_QUBITS: u32 = 30;
