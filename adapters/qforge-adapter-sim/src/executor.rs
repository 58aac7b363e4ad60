//! Circuit execution pipeline.

use std::fmt;
use std::time::Instant;

use tracing::{debug, instrument};

use qforge_hal::{CancellationToken, ExecutionResult, HalError, HalResult};
use qforge_ir::Circuit;
use qforge_state::{QuantumState, Representation};

use crate::kernels;
use crate::sampler::Sampler;

/// Where an execution currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPhase {
    /// Nothing has happened yet.
    NotStarted,
    /// Allocating the |0...0⟩ state.
    Initializing,
    /// Folding gates over the state.
    ApplyingGates,
    /// Drawing shots.
    Sampling,
    /// Finished successfully.
    Completed,
}

impl fmt::Display for ExecutionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExecutionPhase::NotStarted => "not_started",
            ExecutionPhase::Initializing => "initializing",
            ExecutionPhase::ApplyingGates => "applying_gates",
            ExecutionPhase::Sampling => "sampling",
            ExecutionPhase::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Limits and settings for one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// State representation to simulate with.
    pub representation: Representation,
    /// Widest circuit accepted.
    pub max_qubits: usize,
    /// Largest shot count accepted.
    pub max_shots: u32,
    /// Master sampling seed; drawn fresh when `None`.
    pub seed: Option<u64>,
}

/// Runs a single circuit: initialize, apply gates, sample.
///
/// Each executor owns the state it builds, so concurrent executions never
/// share mutable data.
pub struct Executor<'a> {
    config: ExecutorConfig,
    cancel: &'a CancellationToken,
    phase: ExecutionPhase,
}

impl<'a> Executor<'a> {
    /// Create an executor that polls `cancel` while it runs.
    pub fn new(config: ExecutorConfig, cancel: &'a CancellationToken) -> Self {
        Self {
            config,
            cancel,
            phase: ExecutionPhase::NotStarted,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> ExecutionPhase {
        self.phase
    }

    fn transition(&mut self, next: ExecutionPhase) {
        debug!("Execution phase: {} -> {}", self.phase, next);
        self.phase = next;
    }

    /// Reject circuits this executor cannot run, before allocating anything.
    fn check_circuit(&self, circuit: &Circuit) -> HalResult<()> {
        let num_qubits = circuit.num_qubits();
        if num_qubits > self.config.max_qubits {
            return Err(HalError::Capacity {
                requested: num_qubits,
                max: self.config.max_qubits,
            });
        }
        for inst in circuit.instructions() {
            kernels::validate_operands(inst, num_qubits)?;
        }
        Ok(())
    }

    /// Apply every instruction of `circuit` to |0...0⟩.
    ///
    /// Returns the final state and the number of unitary gates applied.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub fn run_to_state(&mut self, circuit: &Circuit) -> HalResult<(QuantumState, usize)> {
        self.check_circuit(circuit)?;

        self.transition(ExecutionPhase::Initializing);
        let mut state = QuantumState::new(self.config.representation, circuit.num_qubits())?;

        self.transition(ExecutionPhase::ApplyingGates);
        let mut gate_count = 0;
        for inst in circuit.instructions() {
            self.cancel.check()?;
            if kernels::apply_instruction(&mut state, inst)? {
                gate_count += 1;
            }
        }
        debug!("Applied {} gates", gate_count);

        Ok((state, gate_count))
    }

    /// Run `circuit` and sample `shots` measurements of every qubit.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub fn execute(&mut self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        if shots == 0 {
            return Err(HalError::Validation("shots must be at least 1".into()));
        }
        if shots > self.config.max_shots {
            return Err(HalError::Validation(format!(
                "{} shots requested, backend allows at most {}",
                shots, self.config.max_shots
            )));
        }

        let start = Instant::now();
        debug!(
            "Starting simulation: {} qubits, {} shots",
            circuit.num_qubits(),
            shots
        );

        let (state, gate_count) = self.run_to_state(circuit)?;

        self.transition(ExecutionPhase::Sampling);
        let sampler = Sampler::new(self.config.seed);
        let counts = sampler.counts(&state, shots, self.cancel)?;

        self.transition(ExecutionPhase::Completed);
        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        Ok(ExecutionResult::new(counts, shots)
            .with_gate_count(gate_count)
            .with_seed(sampler.seed())
            .with_execution_time(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)))
    }
}
