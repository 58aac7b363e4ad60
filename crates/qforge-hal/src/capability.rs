//! Backend capability introspection.
//!
//! [`Capabilities`] describe what a backend can run: the widest register,
//! the gates it understands, its state representation and its shot limit.
//! Executors check circuits against them before doing any work.

use qforge_ir::StandardGate;
use qforge_state::Representation;
use serde::{Deserialize, Serialize};

/// Default per-call shot ceiling for local simulation.
pub const DEFAULT_MAX_SHOTS: u32 = 1_000_000;

/// Hardware capabilities of a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate set (OpenQASM naming convention).
    pub gate_set: GateSet,
    /// How the backend stores states.
    pub representation: Representation,
    /// Maximum number of shots per execution.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) or real hardware (`false`).
    pub is_simulator: bool,
    /// Additional capability flags, e.g. `"statevector"`, `"seeded_sampling"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Create capabilities for a dense statevector simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::standard(),
            representation: Representation::Dense,
            max_shots: DEFAULT_MAX_SHOTS,
            is_simulator: true,
            features: vec!["statevector".into(), "seeded_sampling".into()],
        }
    }

    /// Set the backend name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the state representation.
    #[must_use]
    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }

    /// Set the shot ceiling.
    #[must_use]
    pub fn with_max_shots(mut self, max_shots: u32) -> Self {
        self.max_shots = max_shots;
        self
    }
}

/// Gate set supported by a backend.
///
/// Gate names follow the OpenQASM naming convention (lowercase). If
/// `native` is empty, all supported gates are considered native (typical for
/// simulators).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates supported.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates supported.
    pub two_qubit: Vec<String>,
    /// Three-qubit gates supported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub three_qubit: Vec<String>,
    /// Native gates (execute without decomposition on this backend).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub native: Vec<String>,
}

impl GateSet {
    /// Every gate in [`StandardGate`].
    pub fn standard() -> Self {
        let mut set = Self {
            single_qubit: vec![],
            two_qubit: vec![],
            three_qubit: vec![],
            native: vec![],
        };
        for name in StandardGate::NAMES {
            let arity = StandardGate::from_name(name)
                .or_else(|| StandardGate::rotation_from_name(name, 0.0))
                .map_or(1, |g| g.num_qubits());
            let bucket = match arity {
                1 => &mut set.single_qubit,
                2 => &mut set.two_qubit,
                _ => &mut set.three_qubit,
            };
            bucket.push(name.to_string());
        }
        set
    }

    /// Check if a gate is supported.
    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit.iter().any(|g| g == gate)
            || self.two_qubit.iter().any(|g| g == gate)
            || self.three_qubit.iter().any(|g| g == gate)
    }

    /// Check if a gate is native (executes without decomposition).
    pub fn is_native(&self, gate: &str) -> bool {
        if self.native.is_empty() {
            self.contains(gate)
        } else {
            self.native.iter().any(|g| g == gate)
        }
    }

    /// Total number of supported gates.
    pub fn len(&self) -> usize {
        self.single_qubit.len() + self.two_qubit.len() + self.three_qubit.len()
    }

    /// Check if no gates are supported.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
