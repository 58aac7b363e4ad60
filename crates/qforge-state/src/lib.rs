//! qforge Complex Amplitude Store
//!
//! Storage for n-qubit quantum states and the numerical operations that do
//! not depend on gates: normalization, inner and tensor products,
//! probabilities and tolerance-based comparison.
//!
//! Basis index `i` encodes qubit `k` in bit `k`, so qubit 0 is the
//! least-significant bit. Rendered as a bitstring ([`bitstring`]), qubit 0 is
//! the rightmost character and the string read as binary equals the index.
//!
//! # Example
//!
//! ```rust
//! use num_complex::Complex64;
//! use qforge_state::Statevector;
//!
//! let sv = Statevector::from_amplitudes(vec![
//!     Complex64::new(3.0, 0.0),
//!     Complex64::new(0.0, 4.0),
//! ])?;
//! let unit = sv.normalize()?;
//! assert!(unit.is_normalized());
//! assert!((unit.probability(1)? - 0.64).abs() < 1e-12);
//! # Ok::<(), qforge_state::StateError>(())
//! ```

pub mod error;
pub mod sparse;
pub mod state;
pub mod statevector;

pub use error::{StateError, StateResult};
pub use sparse::SparseState;
pub use state::{QuantumState, Representation};
pub use statevector::Statevector;

/// Widest register held as a dense vector.
pub const MAX_DENSE_QUBITS: usize = 16;

/// Widest register held as a sparse map.
pub const MAX_SPARSE_QUBITS: usize = 30;

/// Per-amplitude tolerance for [`Statevector::approx_eq`].
pub const EQ_TOLERANCE: f64 = 1e-10;

/// Allowed deviation of the total probability from 1.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Sparse amplitudes smaller than this are dropped.
pub const PRUNE_TOLERANCE: f64 = 1e-14;

/// Render basis index `index` of an `num_qubits`-qubit register, qubit 0
/// rightmost.
pub fn bitstring(index: usize, num_qubits: usize) -> String {
    if num_qubits == 0 {
        return String::new();
    }
    format!("{index:0num_qubits$b}")
}

pub(crate) fn check_index(index: i64, dimension: usize) -> StateResult<usize> {
    match usize::try_from(index) {
        Ok(i) if i < dimension => Ok(i),
        _ => Err(StateError::IndexOutOfRange { index, dimension }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitstring_is_binary_index() {
        assert_eq!(bitstring(1, 3), "001");
        assert_eq!(bitstring(6, 3), "110");
        assert_eq!(bitstring(0, 0), "");
        for i in 0..16 {
            assert_eq!(usize::from_str_radix(&bitstring(i, 4), 2).unwrap(), i);
        }
    }
}
