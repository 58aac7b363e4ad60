//! Representation-agnostic quantum state.

use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{StateError, StateResult};
use crate::sparse::SparseState;
use crate::statevector::Statevector;
use crate::{MAX_DENSE_QUBITS, MAX_SPARSE_QUBITS};

/// Storage strategy for a quantum state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// Dense `2^n` amplitude vector.
    #[default]
    Dense,
    /// Map of nonzero amplitudes.
    Sparse,
    /// Reserved; every operation reports `NotImplemented`.
    Topological,
}

impl Representation {
    /// Widest register this representation can hold, if it is implemented.
    pub fn max_qubits(self) -> Option<usize> {
        match self {
            Representation::Dense => Some(MAX_DENSE_QUBITS),
            Representation::Sparse => Some(MAX_SPARSE_QUBITS),
            Representation::Topological => None,
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Representation::Dense => "dense",
            Representation::Sparse => "sparse",
            Representation::Topological => "topological",
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Representation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dense" | "statevector" => Ok(Representation::Dense),
            "sparse" => Ok(Representation::Sparse),
            "topological" => Ok(Representation::Topological),
            other => Err(format!(
                "unknown representation '{other}' (expected dense, sparse or topological)"
            )),
        }
    }
}

/// A quantum state in one of the supported representations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "representation", rename_all = "lowercase")]
pub enum QuantumState {
    /// Dense amplitude vector.
    Dense(Statevector),
    /// Sparse amplitude map.
    Sparse(SparseState),
    /// Placeholder for a topological encoding.
    Topological,
}

impl QuantumState {
    /// Create |0...0⟩ in the given representation.
    pub fn new(representation: Representation, num_qubits: usize) -> StateResult<Self> {
        match representation {
            Representation::Dense => Ok(QuantumState::Dense(Statevector::new(num_qubits)?)),
            Representation::Sparse => Ok(QuantumState::Sparse(SparseState::new(num_qubits)?)),
            Representation::Topological => Err(topological_unimplemented()),
        }
    }

    /// Storage strategy of this state.
    pub fn representation(&self) -> Representation {
        match self {
            QuantumState::Dense(_) => Representation::Dense,
            QuantumState::Sparse(_) => Representation::Sparse,
            QuantumState::Topological => Representation::Topological,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> StateResult<usize> {
        match self {
            QuantumState::Dense(sv) => Ok(sv.num_qubits()),
            QuantumState::Sparse(sp) => Ok(sp.num_qubits()),
            QuantumState::Topological => Err(topological_unimplemented()),
        }
    }

    /// Amplitude of basis state `index`.
    pub fn amplitude(&self, index: i64) -> StateResult<Complex64> {
        match self {
            QuantumState::Dense(sv) => sv.amplitude(index),
            QuantumState::Sparse(sp) => sp.amplitude(index),
            QuantumState::Topological => Err(topological_unimplemented()),
        }
    }

    /// Probability of observing basis state `index`.
    pub fn probability(&self, index: i64) -> StateResult<f64> {
        Ok(self.amplitude(index)?.norm_sqr())
    }

    /// Probabilities for every basis state, in index order.
    ///
    /// Sparse states are expanded, so this is subject to the dense capacity
    /// limit; prefer [`support`](Self::support) for wide registers.
    pub fn probabilities(&self) -> StateResult<Vec<f64>> {
        match self {
            QuantumState::Dense(sv) => Ok(sv.probabilities()),
            QuantumState::Sparse(sp) => Ok(sp.to_dense()?.probabilities()),
            QuantumState::Topological => Err(topological_unimplemented()),
        }
    }

    /// `(index, probability)` pairs for every basis state that may be
    /// observed, ascending by index.
    pub fn support(&self) -> StateResult<Vec<(usize, f64)>> {
        match self {
            QuantumState::Dense(sv) => Ok(sv
                .probabilities()
                .into_iter()
                .enumerate()
                .filter(|(_, p)| *p > 0.0)
                .collect()),
            QuantumState::Sparse(sp) => Ok(sp.support()),
            QuantumState::Topological => Err(topological_unimplemented()),
        }
    }

    /// Sum of all outcome probabilities.
    pub fn total_probability(&self) -> StateResult<f64> {
        match self {
            QuantumState::Dense(sv) => Ok(sv.total_probability()),
            QuantumState::Sparse(sp) => Ok(sp.total_probability()),
            QuantumState::Topological => Err(topological_unimplemented()),
        }
    }

    /// Check that the total probability is 1 within tolerance.
    pub fn is_normalized(&self) -> StateResult<bool> {
        match self {
            QuantumState::Dense(sv) => Ok(sv.is_normalized()),
            QuantumState::Sparse(sp) => Ok(sp.is_normalized()),
            QuantumState::Topological => Err(topological_unimplemented()),
        }
    }

    /// Borrow the dense vector, if this is a dense state.
    pub fn as_statevector(&self) -> Option<&Statevector> {
        match self {
            QuantumState::Dense(sv) => Some(sv),
            _ => None,
        }
    }

    /// Borrow the sparse map, if this is a sparse state.
    pub fn as_sparse(&self) -> Option<&SparseState> {
        match self {
            QuantumState::Sparse(sp) => Some(sp),
            _ => None,
        }
    }

    /// Convert into a dense vector, expanding sparse states.
    pub fn into_dense(self) -> StateResult<Statevector> {
        match self {
            QuantumState::Dense(sv) => Ok(sv),
            QuantumState::Sparse(sp) => sp.to_dense(),
            QuantumState::Topological => Err(topological_unimplemented()),
        }
    }

    /// Element-wise comparison within tolerance, across representations.
    pub fn approx_eq(&self, other: &QuantumState) -> bool {
        match (self, other) {
            (QuantumState::Dense(a), QuantumState::Dense(b)) => a.approx_eq(b),
            (QuantumState::Sparse(a), QuantumState::Sparse(b)) => a.approx_eq(b),
            (QuantumState::Dense(d), QuantumState::Sparse(s))
            | (QuantumState::Sparse(s), QuantumState::Dense(d)) => {
                s.approx_eq(&SparseState::from_dense(d))
            }
            _ => false,
        }
    }
}

impl From<Statevector> for QuantumState {
    fn from(sv: Statevector) -> Self {
        QuantumState::Dense(sv)
    }
}

impl From<SparseState> for QuantumState {
    fn from(sp: SparseState) -> Self {
        QuantumState::Sparse(sp)
    }
}

fn topological_unimplemented() -> StateError {
    StateError::NotImplemented {
        what: "topological state representation".into(),
        hint: "use the dense or sparse representation".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_representation_parse() {
        assert_eq!("dense".parse::<Representation>(), Ok(Representation::Dense));
        assert_eq!("Sparse".parse::<Representation>(), Ok(Representation::Sparse));
        assert!("tensor".parse::<Representation>().is_err());
        assert_eq!(Representation::Sparse.to_string(), "sparse");
        assert_eq!(
            serde_json::to_string(&Representation::Dense).unwrap(),
            "\"dense\""
        );
    }

    #[test]
    fn test_topological_not_implemented() {
        let err = QuantumState::new(Representation::Topological, 2).unwrap_err();
        match err {
            StateError::NotImplemented { hint, .. } => assert!(hint.contains("dense")),
            other => panic!("unexpected error: {other:?}"),
        }
        let state = QuantumState::Topological;
        assert!(state.num_qubits().is_err());
        assert!(state.amplitude(0).is_err());
        assert!(state.probabilities().is_err());
        assert!(state.into_dense().is_err());
    }

    #[test]
    fn test_dense_and_sparse_agree() {
        let dense = QuantumState::new(Representation::Dense, 3).unwrap();
        let sparse = QuantumState::new(Representation::Sparse, 3).unwrap();
        assert!(dense.approx_eq(&sparse));
        assert_eq!(dense.support().unwrap(), sparse.support().unwrap());
        assert_eq!(dense.probabilities().unwrap(), sparse.probabilities().unwrap());
        assert_eq!(sparse.num_qubits().unwrap(), 3);
        assert!(sparse.is_normalized().unwrap());
    }
}
