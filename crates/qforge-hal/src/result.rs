//! Execution results and measurement histograms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Measurement histogram: bitstring to number of occurrences.
///
/// Bitstrings put qubit 0 in the rightmost character, so a key read as a
/// binary number is the measured basis index. Keys are kept sorted, which
/// makes serialized histograms byte-stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts(BTreeMap<String, u64>);

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a histogram from sampled basis indices.
    pub fn from_indices(indices: &[usize], num_qubits: usize) -> Self {
        let mut counts = Self::new();
        for &index in indices {
            counts.insert(qforge_state::bitstring(index, num_qubits), 1);
        }
        counts
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.0.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Occurrences of `bitstring`, zero if never observed.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.0.get(bitstring).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total_shots(&self) -> u64 {
        self.0.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(bitstring, count)` in bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.0.iter()
    }

    /// The outcome observed most often. Ties resolve to the smallest
    /// bitstring.
    pub fn most_frequent(&self) -> Option<(&String, u64)> {
        self.0
            .iter()
            .fold(None, |best: Option<(&String, u64)>, (k, &v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((k, v)),
            })
    }

    /// Relative frequency of each outcome.
    pub fn probabilities(&self) -> BTreeMap<String, f64> {
        let total = self.total_shots();
        if total == 0 {
            return BTreeMap::new();
        }
        self.0
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / total as f64))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Counts {
    type Item = (&'a String, &'a u64);
    type IntoIter = std::collections::btree_map::Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Result of executing a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Measurement histogram.
    pub counts: Counts,
    /// Number of shots requested.
    pub shots: u32,
    /// Unitary gates applied (measurements and barriers excluded).
    pub gate_count: usize,
    /// Master seed used for sampling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Wall-clock execution time in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a result from a histogram.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            gate_count: 0,
            seed: None,
            execution_time_ms: None,
        }
    }

    /// Record the number of applied gates.
    #[must_use]
    pub fn with_gate_count(mut self, gate_count: usize) -> Self {
        self.gate_count = gate_count;
        self
    }

    /// Record the sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Record the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let mut counts = Counts::new();
        counts.insert("00", 3);
        counts.insert("11", 5);
        counts.insert("00", 2);

        assert_eq!(counts.get("00"), 5);
        assert_eq!(counts.get("01"), 0);
        assert_eq!(counts.total_shots(), 10);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_most_frequent_tie_break() {
        let mut counts = Counts::new();
        assert!(counts.most_frequent().is_none());
        counts.insert("10", 4);
        counts.insert("01", 4);
        counts.insert("00", 1);
        assert_eq!(counts.most_frequent(), Some((&"01".to_string(), 4)));
    }

    #[test]
    fn test_from_indices_uses_binary_index() {
        let counts = Counts::from_indices(&[1, 1, 4, 6], 3);
        assert_eq!(counts.get("001"), 2);
        assert_eq!(counts.get("100"), 1);
        assert_eq!(counts.get("110"), 1);
        assert_eq!(counts.total_shots(), 4);

        let probs = counts.probabilities();
        assert!((probs["001"] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_serialization_is_sorted() {
        let mut a = Counts::new();
        a.insert("11", 1);
        a.insert("00", 2);
        let mut b = Counts::new();
        b.insert("00", 2);
        b.insert("11", 1);
        let ja = serde_json::to_string(&a).unwrap();
        assert_eq!(ja, r#"{"00":2,"11":1}"#);
        assert_eq!(ja, serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn test_execution_result_builder() {
        let result = ExecutionResult::new(Counts::new(), 100)
            .with_gate_count(7)
            .with_seed(42)
            .with_execution_time(3);
        assert_eq!(result.gate_count, 7);
        assert_eq!(result.seed, Some(42));
        assert_eq!(result.execution_time_ms, Some(3));
    }
}
