//! Error types for the amplitude store.

use thiserror::Error;

/// Errors produced while constructing or querying quantum states.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum StateError {
    /// Amplitude vector length is not a nonzero power of two.
    #[error("Amplitude vector of length {0} is not a nonzero power of two")]
    InvalidDimension(usize),

    /// Basis index outside `0..dimension`.
    #[error("Basis index {index} out of range for dimension {dimension}")]
    IndexOutOfRange {
        /// The requested index.
        index: i64,
        /// Dimension of the state.
        dimension: usize,
    },

    /// Requested qubit count exceeds what this representation can hold.
    #[error("Requested {requested} qubits, but the maximum is {max}")]
    Capacity {
        /// Requested number of qubits.
        requested: usize,
        /// Maximum supported number of qubits.
        max: usize,
    },

    /// State has zero (or non-finite) norm and cannot be normalized.
    #[error("State has zero or non-finite norm ({0})")]
    ZeroNorm(f64),

    /// Two states of different dimension were combined.
    #[error("Dimension mismatch: {left} vs {right}")]
    DimensionMismatch {
        /// Dimension of the receiver.
        left: usize,
        /// Dimension of the argument.
        right: usize,
    },

    /// Representation exists but has no implementation.
    #[error("{what} is not implemented: {hint}")]
    NotImplemented {
        /// What was requested.
        what: String,
        /// Pointer to an alternative.
        hint: String,
    },
}

/// Result type for state operations.
pub type StateResult<T> = Result<T, StateError>;
