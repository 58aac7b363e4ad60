//! Simulator backend implementation.

use async_trait::async_trait;
use tracing::{debug, instrument};

use qforge_hal::{
    Backend, BackendConfig, BackendFactory, CancellationToken, Capabilities, ExecutionResult,
    HalError, HalResult, ValidationResult,
};
use qforge_ir::{Circuit, Instruction};
use qforge_state::{MAX_DENSE_QUBITS, QuantumState, Representation};

use crate::executor::{Executor, ExecutorConfig};
use crate::kernels;

/// Local simulator backend.
///
/// Simulates circuits exactly on a dense statevector (up to 16 qubits) or a
/// sparse amplitude map (up to 30 qubits, efficient while few amplitudes
/// are nonzero). Cloning is cheap and clones share no mutable state.
#[derive(Debug, Clone)]
pub struct SimulatorBackend {
    /// Backend configuration.
    config: BackendConfig,
    /// Cached capabilities.
    capabilities: Capabilities,
    /// Master sampling seed.
    seed: Option<u64>,
}

impl SimulatorBackend {
    /// Create a new dense simulator with default settings.
    pub fn new() -> Self {
        Self::with_representation(Representation::Dense)
    }

    /// Create a sparse simulator.
    pub fn sparse() -> Self {
        Self::with_representation(Representation::Sparse)
    }

    /// Create a simulator using `representation`, sized to its ceiling.
    pub fn with_representation(representation: Representation) -> Self {
        let max_qubits = representation.max_qubits().unwrap_or(0);
        Self {
            config: BackendConfig::new("simulator"),
            capabilities: Capabilities::simulator(max_qubits as u32)
                .with_representation(representation),
            seed: None,
        }
    }

    /// Create a dense simulator with custom max qubits, capped at the dense
    /// ceiling.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        let mut backend = Self::new();
        backend.capabilities.num_qubits = max_qubits.min(MAX_DENSE_QUBITS as u32);
        backend
    }

    /// Fix the master sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Limit shots per execution.
    #[must_use]
    pub fn with_max_shots(mut self, max_shots: u32) -> Self {
        self.capabilities.max_shots = max_shots;
        self
    }

    /// The configured master seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            representation: self.capabilities.representation,
            max_qubits: self.capabilities.num_qubits as usize,
            max_shots: self.capabilities.max_shots,
            seed: self.seed,
        }
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn validate(&self, circuit: &Circuit) -> ValidationResult {
        let mut reasons = Vec::new();
        let caps = &self.capabilities;

        if circuit.num_qubits() > caps.num_qubits as usize {
            reasons.push(format!(
                "Circuit has {} qubits but {} supports {}",
                circuit.num_qubits(),
                self.name(),
                caps.num_qubits
            ));
        }
        for inst in circuit.instructions() {
            if let Some(gate) = inst.as_gate() {
                if !caps.gate_set.contains(gate.name()) {
                    reasons.push(format!("Unsupported gate '{}'", gate.name()));
                }
            }
            if let Err(e) = kernels::validate_operands(inst, circuit.num_qubits()) {
                reasons.push(e.to_string());
            }
        }
        ValidationResult::from_reasons(reasons)
    }

    fn initialize_state(&self, num_qubits: usize) -> HalResult<QuantumState> {
        let max = self.capabilities.num_qubits as usize;
        if num_qubits > max {
            return Err(HalError::Capacity {
                requested: num_qubits,
                max,
            });
        }
        Ok(QuantumState::new(self.capabilities.representation, num_qubits)?)
    }

    fn apply_operation(
        &self,
        instruction: &Instruction,
        mut state: QuantumState,
    ) -> HalResult<QuantumState> {
        let width = state.num_qubits()?;
        let max = self.capabilities.num_qubits as usize;
        if width > max {
            return Err(HalError::Capacity {
                requested: width,
                max,
            });
        }
        kernels::apply_instruction(&mut state, instruction)?;
        Ok(state)
    }

    #[instrument(skip(self, circuit))]
    fn execute_to_state(&self, circuit: &Circuit) -> HalResult<QuantumState> {
        let cancel = CancellationToken::new();
        let (state, _) = Executor::new(self.executor_config(), &cancel).run_to_state(circuit)?;
        Ok(state)
    }

    #[instrument(skip(self, circuit, cancel))]
    fn execute_with_cancel(
        &self,
        circuit: &Circuit,
        shots: u32,
        cancel: &CancellationToken,
    ) -> HalResult<ExecutionResult> {
        Executor::new(self.executor_config(), cancel).execute(circuit, shots)
    }

    async fn execute_async(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        let backend = self.clone();
        let circuit = circuit.clone();
        debug!("Dispatching execution to the blocking pool");
        tokio::task::spawn_blocking(move || backend.execute(&circuit, shots))
            .await
            .map_err(|e| HalError::Backend(format!("simulation task failed: {e}")))?
    }

    async fn execute_to_state_async(&self, circuit: &Circuit) -> HalResult<QuantumState> {
        let backend = self.clone();
        let circuit = circuit.clone();
        tokio::task::spawn_blocking(move || backend.execute_to_state(&circuit))
            .await
            .map_err(|e| HalError::Backend(format!("simulation task failed: {e}")))?
    }
}

impl BackendFactory for SimulatorBackend {
    /// Recognized `extra` keys: `representation` (`"dense"`/`"sparse"`),
    /// `max_qubits`, `max_shots` and `seed`.
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let representation = match config.get_str("representation")? {
            Some(s) => s.parse::<Representation>().map_err(HalError::Configuration)?,
            None => Representation::Dense,
        };
        let ceiling = representation.max_qubits().ok_or_else(|| HalError::NotImplemented {
            what: format!("{representation} simulation"),
            hint: Some("use the dense or sparse representation".into()),
        })?;

        let max_qubits = match config.get_u64("max_qubits")? {
            Some(n) if n > ceiling as u64 => {
                return Err(HalError::Configuration(format!(
                    "max_qubits {n} exceeds the {representation} limit of {ceiling}"
                )));
            }
            Some(n) => n as u32,
            None => ceiling as u32,
        };

        let mut capabilities = Capabilities::simulator(max_qubits)
            .with_name(config.name.clone())
            .with_representation(representation);
        if let Some(n) = config.get_u64("max_shots")? {
            capabilities.max_shots = u32::try_from(n).map_err(|_| {
                HalError::Configuration(format!("max_shots {n} does not fit in 32 bits"))
            })?;
        }
        let seed = config.get_u64("seed")?;

        Ok(Self {
            config,
            capabilities,
            seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qforge_ir::{QubitId, library};

    #[test]
    fn test_simulator_capabilities() {
        let backend = SimulatorBackend::new();
        let caps = backend.capabilities();

        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 16);
        assert_eq!(caps.representation, Representation::Dense);
        assert_eq!(SimulatorBackend::sparse().capabilities().num_qubits, 30);
    }

    #[test]
    fn test_simulator_bell_state() {
        let backend = SimulatorBackend::new().with_seed(3);
        let circuit = library::bell().unwrap().measure_all().unwrap();
        let result = backend.execute(&circuit, 1000).unwrap();
        assert_eq!(result.shots, 1000);

        // Bell state should produce only 00 and 11
        let counts = &result.counts;
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
    }

    #[test]
    fn test_simulator_ghz_state() {
        let backend = SimulatorBackend::new();
        let circuit = library::ghz(3).unwrap();
        let result = backend.execute(&circuit, 1000).unwrap();

        let counts = &result.counts;
        assert_eq!(counts.get("000") + counts.get("111"), 1000);
    }

    #[test]
    fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::with_max_qubits(5);
        let circuit = Circuit::with_name("test", 10);

        assert!(matches!(
            backend.execute(&circuit, 100),
            Err(HalError::Capacity {
                requested: 10,
                max: 5
            })
        ));
        assert!(!backend.validate(&circuit).is_valid());
        assert!(matches!(
            backend.initialize_state(6),
            Err(HalError::Capacity { .. })
        ));
    }

    #[test]
    fn test_apply_operation_returns_new_state() {
        let backend = SimulatorBackend::new();
        let state = backend.initialize_state(1).unwrap();
        let next = backend
            .apply_operation(
                &Instruction::single_qubit_gate(qforge_ir::StandardGate::X, QubitId(0)),
                state.clone(),
            )
            .unwrap();
        assert!((next.probability(1).unwrap() - 1.0).abs() < 1e-12);
        assert!((state.probability(0).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_apply_operation_respects_capacity() {
        let backend = SimulatorBackend::with_max_qubits(5);
        let wide = QuantumState::new(Representation::Sparse, 30).unwrap();
        let h = Instruction::single_qubit_gate(qforge_ir::StandardGate::H, QubitId(0));
        assert_eq!(
            backend.apply_operation(&h, wide),
            Err(HalError::Capacity {
                requested: 30,
                max: 5
            })
        );

        let fits = QuantumState::new(Representation::Sparse, 5).unwrap();
        assert!(backend.apply_operation(&h, fits).is_ok());
    }

    #[test]
    fn test_from_config() {
        let config = BackendConfig::new("sparse-sim")
            .with_extra("representation", serde_json::json!("sparse"))
            .with_extra("max_qubits", serde_json::json!(24))
            .with_extra("seed", serde_json::json!(99))
            .with_extra("max_shots", serde_json::json!(500));
        let backend = SimulatorBackend::from_config(config).unwrap();
        assert_eq!(backend.name(), "sparse-sim");
        assert_eq!(backend.capabilities().representation, Representation::Sparse);
        assert_eq!(backend.capabilities().num_qubits, 24);
        assert_eq!(backend.capabilities().max_shots, 500);
        assert_eq!(backend.seed(), Some(99));

        let too_wide = BackendConfig::new("sim").with_extra("max_qubits", serde_json::json!(20));
        assert!(matches!(
            SimulatorBackend::from_config(too_wide),
            Err(HalError::Configuration(_))
        ));

        let topo = BackendConfig::new("sim")
            .with_extra("representation", serde_json::json!("topological"));
        assert!(matches!(
            SimulatorBackend::from_config(topo),
            Err(HalError::NotImplemented { .. })
        ));

        let bogus = BackendConfig::new("sim").with_extra("representation", serde_json::json!("x"));
        assert!(matches!(
            SimulatorBackend::from_config(bogus),
            Err(HalError::Configuration(_))
        ));
    }
}
