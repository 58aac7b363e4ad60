//! Dense statevector storage.

use num_complex::Complex64;
use serde::Serialize;

use crate::error::{StateError, StateResult};
use crate::{EQ_TOLERANCE, MAX_DENSE_QUBITS, NORM_TOLERANCE, check_index};

/// A dense statevector: `2^n` complex amplitudes.
///
/// Amplitude `i` belongs to the basis state whose bit `k` is the value of
/// qubit `k`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> StateResult<Self> {
        check_capacity(num_qubits)?;
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Wrap an explicit amplitude vector.
    ///
    /// The length must be a nonzero power of two. The amplitudes are taken
    /// as given; call [`normalize`](Self::normalize) to rescale them.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> StateResult<Self> {
        let len = amplitudes.len();
        if len == 0 || !len.is_power_of_two() {
            return Err(StateError::InvalidDimension(len));
        }
        let num_qubits = len.trailing_zeros() as usize;
        check_capacity(num_qubits)?;
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Dimension of the state space, `2^n`.
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// All amplitudes in basis-index order.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Mutable access for in-place gate kernels.
    pub fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    /// Amplitude of basis state `index`.
    pub fn amplitude(&self, index: i64) -> StateResult<Complex64> {
        let i = check_index(index, self.dimension())?;
        Ok(self.amplitudes[i])
    }

    /// Amplitude of basis state `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<Complex64> {
        self.amplitudes.get(index).copied()
    }

    /// L2 norm.
    pub fn norm(&self) -> f64 {
        self.total_probability().sqrt()
    }

    /// Sum of all outcome probabilities.
    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Check that the total probability is 1 within tolerance.
    pub fn is_normalized(&self) -> bool {
        (self.total_probability() - 1.0).abs() <= NORM_TOLERANCE
    }

    /// Return a copy scaled to unit norm.
    pub fn normalize(&self) -> StateResult<Statevector> {
        let norm = self.norm();
        if !norm.is_finite() || norm == 0.0 {
            return Err(StateError::ZeroNorm(norm));
        }
        Ok(Self {
            amplitudes: self.amplitudes.iter().map(|a| *a / norm).collect(),
            num_qubits: self.num_qubits,
        })
    }

    /// Probability of observing basis state `index`.
    pub fn probability(&self, index: i64) -> StateResult<f64> {
        Ok(self.amplitude(index)?.norm_sqr())
    }

    /// Probabilities for every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Inner product `⟨self|other⟩ = Σ conj(aᵢ)·bᵢ`.
    pub fn inner_product(&self, other: &Statevector) -> StateResult<Complex64> {
        if self.dimension() != other.dimension() {
            return Err(StateError::DimensionMismatch {
                left: self.dimension(),
                right: other.dimension(),
            });
        }
        Ok(self
            .amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * *b)
            .sum())
    }

    /// Kronecker product `self ⊗ other`.
    ///
    /// `other` occupies the low qubit positions of the result.
    pub fn tensor_product(&self, other: &Statevector) -> StateResult<Statevector> {
        let num_qubits = self.num_qubits + other.num_qubits;
        check_capacity(num_qubits)?;
        let m = other.num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        for (i, a) in self.amplitudes.iter().enumerate() {
            for (j, b) in other.amplitudes.iter().enumerate() {
                amplitudes[(i << m) | j] = *a * *b;
            }
        }
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Element-wise comparison within [`EQ_TOLERANCE`]. States of different
    /// dimension are never equal.
    pub fn approx_eq(&self, other: &Statevector) -> bool {
        self.dimension() == other.dimension()
            && self
                .amplitudes
                .iter()
                .zip(&other.amplitudes)
                .all(|(a, b)| (*a - *b).norm() <= EQ_TOLERANCE)
    }
}

fn check_capacity(num_qubits: usize) -> StateResult<()> {
    if num_qubits > MAX_DENSE_QUBITS {
        return Err(StateError::Capacity {
            requested: num_qubits,
            max: MAX_DENSE_QUBITS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2).unwrap();
        assert_eq!(sv.dimension(), 4);
        assert!(approx_eq(sv.amplitudes[0], c(1.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], c(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], c(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], c(0.0, 0.0)));
        assert!(sv.is_normalized());
    }

    #[test]
    fn test_zero_qubits() {
        let sv = Statevector::new(0).unwrap();
        assert_eq!(sv.dimension(), 1);
        assert!(sv.is_normalized());
    }

    #[test]
    fn test_capacity() {
        assert!(Statevector::new(MAX_DENSE_QUBITS).is_ok());
        let err = Statevector::new(MAX_DENSE_QUBITS + 1).unwrap_err();
        assert_eq!(
            err,
            StateError::Capacity {
                requested: 17,
                max: 16
            }
        );
        assert!(err.to_string().contains("17"));
        assert!(err.to_string().contains("16"));
    }

    #[test]
    fn test_from_amplitudes_dimension() {
        assert!(matches!(
            Statevector::from_amplitudes(vec![]),
            Err(StateError::InvalidDimension(0))
        ));
        assert!(matches!(
            Statevector::from_amplitudes(vec![c(1.0, 0.0); 3]),
            Err(StateError::InvalidDimension(3))
        ));
        let sv = Statevector::from_amplitudes(vec![c(1.0, 0.0); 8]).unwrap();
        assert_eq!(sv.num_qubits(), 3);
        // not normalized on construction
        assert!((sv.total_probability() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize() {
        let sv = Statevector::from_amplitudes(vec![c(3.0, 0.0), c(0.0, 4.0)]).unwrap();
        let n = sv.normalize().unwrap();
        assert!(n.is_normalized());
        assert!(approx_eq(n.amplitudes[0], c(0.6, 0.0)));
        assert!(approx_eq(n.amplitudes[1], c(0.0, 0.8)));

        let zero = Statevector::from_amplitudes(vec![c(0.0, 0.0); 2]).unwrap();
        assert!(matches!(zero.normalize(), Err(StateError::ZeroNorm(_))));

        let nan = Statevector::from_amplitudes(vec![c(f64::NAN, 0.0), c(0.0, 0.0)]).unwrap();
        assert!(matches!(nan.normalize(), Err(StateError::ZeroNorm(_))));
    }

    #[test]
    fn test_amplitude_bounds() {
        let sv = Statevector::new(2).unwrap();
        assert!(approx_eq(sv.amplitude(0).unwrap(), c(1.0, 0.0)));
        assert!(matches!(
            sv.amplitude(4),
            Err(StateError::IndexOutOfRange {
                index: 4,
                dimension: 4
            })
        ));
        assert!(matches!(
            sv.amplitude(-1),
            Err(StateError::IndexOutOfRange { index: -1, .. })
        ));
        assert_eq!(sv.get(4), None);
    }

    #[test]
    fn test_inner_product() {
        let s = 1.0 / 2.0_f64.sqrt();
        let plus = Statevector::from_amplitudes(vec![c(s, 0.0), c(s, 0.0)]).unwrap();
        let zero = Statevector::new(1).unwrap();
        assert!(approx_eq(plus.inner_product(&zero).unwrap(), c(s, 0.0)));
        assert!(approx_eq(plus.inner_product(&plus).unwrap(), c(1.0, 0.0)));

        let i_state = Statevector::from_amplitudes(vec![c(0.0, 1.0), c(0.0, 0.0)]).unwrap();
        // conjugate applies to the left operand
        assert!(approx_eq(i_state.inner_product(&zero).unwrap(), c(0.0, -1.0)));

        let wide = Statevector::new(2).unwrap();
        assert!(matches!(
            plus.inner_product(&wide),
            Err(StateError::DimensionMismatch { left: 2, right: 4 })
        ));
    }

    #[test]
    fn test_tensor_product_ordering() {
        // |1⟩ ⊗ |0⟩: the left factor lands on the high qubit → index 0b10
        let one = Statevector::from_amplitudes(vec![c(0.0, 0.0), c(1.0, 0.0)]).unwrap();
        let zero = Statevector::new(1).unwrap();
        let product = one.tensor_product(&zero).unwrap();
        assert_eq!(product.num_qubits(), 2);
        assert!(approx_eq(product.amplitudes[2], c(1.0, 0.0)));
        assert!(product.is_normalized());

        let big = Statevector::new(9).unwrap();
        assert!(matches!(
            big.tensor_product(&big),
            Err(StateError::Capacity { requested: 18, .. })
        ));
    }

    #[test]
    fn test_approx_eq() {
        let a = Statevector::new(1).unwrap();
        let b = Statevector::from_amplitudes(vec![c(1.0 + 1e-12, 0.0), c(0.0, 0.0)]).unwrap();
        let d = Statevector::from_amplitudes(vec![c(1.0 + 1e-6, 0.0), c(0.0, 0.0)]).unwrap();
        assert!(a.approx_eq(&b));
        assert!(!a.approx_eq(&d));
        assert!(!a.approx_eq(&Statevector::new(2).unwrap()));
    }

    #[test]
    fn test_probabilities() {
        let sv = Statevector::from_amplitudes(vec![c(0.6, 0.0), c(0.0, 0.8)]).unwrap();
        let p = sv.probabilities();
        assert!((p[0] - 0.36).abs() < 1e-12);
        assert!((p[1] - 0.64).abs() < 1e-12);
        assert!((sv.probability(1).unwrap() - 0.64).abs() < 1e-12);
        assert!(sv.probability(2).is_err());
    }
}
