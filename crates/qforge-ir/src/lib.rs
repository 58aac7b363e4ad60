//! qforge Circuit Intermediate Representation
//!
//! This crate provides the value types every other qforge crate speaks:
//! qubit identifiers, the closed gate set, instructions and circuits.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`]. Qubit `k` is bit `k` of a basis-state index
//!   (qubit 0 is the least-significant bit).
//! - **Gates**: [`StandardGate`], a closed enum dispatched by exhaustive match
//! - **Instructions**: [`Instruction`] combining a gate, measurement or
//!   barrier with its operands
//! - **Circuit**: [`Circuit`], an immutable value with a consuming builder
//! - **Library**: [`library`] with Bell, GHZ, QFT and Grover constructions
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qforge_ir::{Circuit, QubitId};
//!
//! // |00⟩ → (|00⟩ + |11⟩)/√2
//! let circuit = Circuit::with_name("bell_state", 2)
//!     .h(QubitId(0))?
//!     .cx(QubitId(0), QubitId(1))?
//!     .measure_all()?;
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.gate_count(), 2);
//! # Ok::<(), qforge_ir::IrError>(())
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg` | 1 | S and S-dagger gates |
//! | `T`, `Tdg` | 1 | T and T-dagger gates |
//! | `Rx`, `Ry`, `Rz` | 1 | Rotation gates |
//! | `CX`, `CZ` | 2 | Controlled-NOT and Controlled-Z |
//! | `Swap` | 2 | SWAP gate |
//! | `CCX` | 3 | Toffoli (CCNOT) gate |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod library;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::QubitId;
