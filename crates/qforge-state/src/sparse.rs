//! Sparse state storage for wide registers with small support.

use std::collections::BTreeMap;

use num_complex::Complex64;
use serde::Serialize;

use crate::error::{StateError, StateResult};
use crate::statevector::Statevector;
use crate::{EQ_TOLERANCE, MAX_SPARSE_QUBITS, NORM_TOLERANCE, PRUNE_TOLERANCE, check_index};

/// A quantum state stored as a map from basis index to nonzero amplitude.
///
/// Amplitudes whose magnitude falls below [`PRUNE_TOLERANCE`] are dropped.
/// Entries iterate in ascending basis-index order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SparseState {
    num_qubits: usize,
    entries: BTreeMap<usize, Complex64>,
}

impl SparseState {
    /// Create a sparse state initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> StateResult<Self> {
        check_capacity(num_qubits)?;
        let mut entries = BTreeMap::new();
        entries.insert(0, Complex64::new(1.0, 0.0));
        Ok(Self {
            num_qubits,
            entries,
        })
    }

    /// Build a state from explicit `(index, amplitude)` pairs.
    ///
    /// Repeated indices accumulate. Not normalized.
    pub fn from_entries(
        num_qubits: usize,
        entries: impl IntoIterator<Item = (usize, Complex64)>,
    ) -> StateResult<Self> {
        check_capacity(num_qubits)?;
        let dimension = 1usize << num_qubits;
        let mut map = BTreeMap::new();
        for (index, amp) in entries {
            if index >= dimension {
                return Err(StateError::IndexOutOfRange {
                    index: i64::try_from(index).unwrap_or(i64::MAX),
                    dimension,
                });
            }
            *map.entry(index).or_insert(Complex64::new(0.0, 0.0)) += amp;
        }
        let mut state = Self {
            num_qubits,
            entries: map,
        };
        state.prune();
        Ok(state)
    }

    /// Convert a dense vector, keeping only significant amplitudes.
    pub fn from_dense(dense: &Statevector) -> Self {
        let entries = dense
            .amplitudes()
            .iter()
            .enumerate()
            .filter(|(_, a)| a.norm() >= PRUNE_TOLERANCE)
            .map(|(i, a)| (i, *a))
            .collect();
        Self {
            num_qubits: dense.num_qubits(),
            entries,
        }
    }

    /// Expand into a dense vector. Fails when the register is too wide for
    /// dense storage.
    pub fn to_dense(&self) -> StateResult<Statevector> {
        let mut dense = Statevector::new(self.num_qubits)?;
        let amplitudes = dense.amplitudes_mut();
        amplitudes[0] = Complex64::new(0.0, 0.0);
        for (&i, &a) in &self.entries {
            amplitudes[i] = a;
        }
        Ok(dense)
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Dimension of the state space, `2^n`.
    pub fn dimension(&self) -> usize {
        1 << self.num_qubits
    }

    /// Number of stored (nonzero) amplitudes.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Stored amplitudes, ordered by basis index.
    pub fn entries(&self) -> &BTreeMap<usize, Complex64> {
        &self.entries
    }

    /// Replace the stored amplitudes, pruning negligible ones.
    ///
    /// Every index must be below [`dimension`](Self::dimension).
    pub fn set_entries(&mut self, entries: BTreeMap<usize, Complex64>) {
        debug_assert!(entries.keys().all(|&i| i < self.dimension()));
        self.entries = entries;
        self.prune();
    }

    /// Amplitude of basis state `index`.
    pub fn amplitude(&self, index: i64) -> StateResult<Complex64> {
        let i = check_index(index, self.dimension())?;
        Ok(self.get(i))
    }

    /// Amplitude at `index`, zero when not stored.
    pub fn get(&self, index: usize) -> Complex64 {
        self.entries
            .get(&index)
            .copied()
            .unwrap_or(Complex64::new(0.0, 0.0))
    }

    /// L2 norm.
    pub fn norm(&self) -> f64 {
        self.total_probability().sqrt()
    }

    /// Sum of all outcome probabilities.
    pub fn total_probability(&self) -> f64 {
        self.entries.values().map(Complex64::norm_sqr).sum()
    }

    /// Check that the total probability is 1 within tolerance.
    pub fn is_normalized(&self) -> bool {
        (self.total_probability() - 1.0).abs() <= NORM_TOLERANCE
    }

    /// Return a copy scaled to unit norm.
    pub fn normalize(&self) -> StateResult<SparseState> {
        let norm = self.norm();
        if !norm.is_finite() || norm == 0.0 {
            return Err(StateError::ZeroNorm(norm));
        }
        Ok(Self {
            num_qubits: self.num_qubits,
            entries: self.entries.iter().map(|(&i, &a)| (i, a / norm)).collect(),
        })
    }

    /// Probability of observing basis state `index`.
    pub fn probability(&self, index: i64) -> StateResult<f64> {
        Ok(self.amplitude(index)?.norm_sqr())
    }

    /// `(index, probability)` for every stored amplitude, ascending by index.
    pub fn support(&self) -> Vec<(usize, f64)> {
        self.entries
            .iter()
            .map(|(&i, a)| (i, a.norm_sqr()))
            .collect()
    }

    /// Compare amplitudes over the union of both supports within
    /// [`EQ_TOLERANCE`].
    pub fn approx_eq(&self, other: &SparseState) -> bool {
        self.num_qubits == other.num_qubits
            && self
                .entries
                .keys()
                .chain(other.entries.keys())
                .all(|&i| (self.get(i) - other.get(i)).norm() <= EQ_TOLERANCE)
    }

    fn prune(&mut self) {
        self.entries.retain(|_, a| a.norm() >= PRUNE_TOLERANCE);
    }
}

fn check_capacity(num_qubits: usize) -> StateResult<()> {
    if num_qubits > MAX_SPARSE_QUBITS {
        return Err(StateError::Capacity {
            requested: num_qubits,
            max: MAX_SPARSE_QUBITS,
        });
    }
    Ok(())
}
