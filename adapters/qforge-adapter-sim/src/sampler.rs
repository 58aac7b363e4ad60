//! Measurement sampling.
//!
//! Sampling never collapses the state: every shot draws independently from
//! the same distribution. Shot `k` uses its own generator seeded from the
//! master seed and `k`, so output does not depend on how shots are split
//! across threads.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use qforge_hal::{CancellationToken, Counts, HalError, HalResult};
use qforge_state::{NORM_TOLERANCE, QuantumState};

/// Shot counts at or above this are sampled on the rayon pool.
pub const PARALLEL_SHOT_THRESHOLD: u32 = 4096;

/// Shots drawn between cancellation checks.
pub const SHOT_BATCH: u32 = 1024;

/// SplitMix64 finalizer.
pub fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed for shot `k` under `master`.
pub fn shot_seed(master: u64, k: u64) -> u64 {
    splitmix64(master ^ splitmix64(k))
}

/// Probability of observing basis state `index`.
pub fn probability(index: i64, state: &QuantumState) -> HalResult<f64> {
    Ok(state.probability(index)?)
}

/// Cumulative distribution over the observable basis states.
#[derive(Debug, Clone)]
struct Distribution {
    indices: Vec<usize>,
    cdf: Vec<f64>,
}

impl Distribution {
    fn from_state(state: &QuantumState) -> HalResult<Self> {
        let support = state.support()?;
        let total: f64 = support.iter().map(|(_, p)| p).sum();
        if !total.is_finite() || (total - 1.0).abs() > NORM_TOLERANCE {
            return Err(HalError::Domain(format!(
                "state must be normalized before sampling (total probability {total})"
            )));
        }

        let mut indices = Vec::with_capacity(support.len());
        let mut cdf = Vec::with_capacity(support.len());
        let mut acc = 0.0;
        for (index, p) in support {
            acc += p;
            indices.push(index);
            cdf.push(acc);
        }
        Ok(Self { indices, cdf })
    }

    fn draw(&self, seed: u64) -> usize {
        let mut rng = StdRng::seed_from_u64(seed);
        let total = self.cdf.last().copied().unwrap_or(0.0);
        let r = rng.r#gen::<f64>() * total;
        let pos = self.cdf.partition_point(|&c| c <= r);
        self.indices[pos.min(self.indices.len() - 1)]
    }
}

/// Seeded shot sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampler {
    seed: u64,
}

impl Sampler {
    /// Create a sampler. Without a seed, a fresh master seed is drawn from
    /// the thread RNG.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed: seed.unwrap_or_else(|| rand::thread_rng().r#gen()),
        }
    }

    /// Create a sampler with a fixed master seed.
    pub fn seeded(seed: u64) -> Self {
        Self { seed }
    }

    /// The master seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sample `shots` basis indices from `state`.
    pub fn sample_indices(
        &self,
        state: &QuantumState,
        shots: u32,
        cancel: &CancellationToken,
    ) -> HalResult<Vec<usize>> {
        if shots == 0 {
            return Err(HalError::Validation("shots must be at least 1".into()));
        }
        let dist = Distribution::from_state(state)?;
        let parallel = shots >= PARALLEL_SHOT_THRESHOLD;
        debug!(
            "Sampling {} shots over {} outcomes (parallel: {})",
            shots,
            dist.indices.len(),
            parallel
        );

        let mut out = Vec::with_capacity(shots as usize);
        let mut start = 0u32;
        while start < shots {
            cancel.check()?;
            let end = start.saturating_add(SHOT_BATCH).min(shots);
            let seed = self.seed;
            if parallel {
                out.par_extend(
                    (start..end)
                        .into_par_iter()
                        .map(|k| dist.draw(shot_seed(seed, u64::from(k)))),
                );
            } else {
                out.extend((start..end).map(|k| dist.draw(shot_seed(seed, u64::from(k)))));
            }
            start = end;
        }
        Ok(out)
    }

    /// Sample `shots` measurements as per-shot bit arrays, element `k` being
    /// the value of qubit `k`.
    pub fn measure(&self, state: &QuantumState, shots: u32) -> HalResult<Vec<Vec<u8>>> {
        let num_qubits = state.num_qubits()?;
        let indices = self.sample_indices(state, shots, &CancellationToken::new())?;
        Ok(indices
            .into_iter()
            .map(|index| (0..num_qubits).map(|k| ((index >> k) & 1) as u8).collect())
            .collect())
    }

    /// Sample `shots` measurements into a histogram.
    pub fn counts(
        &self,
        state: &QuantumState,
        shots: u32,
        cancel: &CancellationToken,
    ) -> HalResult<Counts> {
        let num_qubits = state.num_qubits()?;
        let indices = self.sample_indices(state, shots, cancel)?;
        Ok(Counts::from_indices(&indices, num_qubits))
    }
}
