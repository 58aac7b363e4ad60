//! Backend trait and configuration.
//!
//! The [`Backend`] trait covers the full local execution lifecycle:
//!
//! ```text
//!   capabilities() ──→ validate() ──→ initialize_state() ──→ apply_operation()* ──→ sample
//!    (sync, &ref)       (sync)          (sync)                 (sync)
//!                                  └──────────── execute() / execute_async() ────────────┘
//! ```
//!
//! ## Method table
//!
//! | Method | Kind | Required | Returns |
//! |--------|------|----------|---------|
//! | `name()` | sync | yes | `&str` |
//! | `capabilities()` | sync | yes | `&Capabilities` |
//! | `validate()` | sync | yes | `ValidationResult` |
//! | `initialize_state()` | sync | yes | `HalResult<QuantumState>` |
//! | `apply_operation()` | sync | yes | `HalResult<QuantumState>` |
//! | `execute_to_state()` | sync | yes | `HalResult<QuantumState>` |
//! | `execute_with_cancel()` | sync | yes | `HalResult<ExecutionResult>` |
//! | `execute()` | sync | provided | `HalResult<ExecutionResult>` |
//! | `execute_async()` | async | provided | `HalResult<ExecutionResult>` |
//! | `execute_to_state_async()` | async | provided | `HalResult<QuantumState>` |

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use qforge_ir::{Circuit, Instruction};
use qforge_state::QuantumState;

use crate::cancel::CancellationToken;
use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::result::ExecutionResult;

/// Configuration for a backend instance.
///
/// Backend-specific settings live in `extra` and are flattened into the
/// serialized form, so `{"name": "sim", "max_qubits": 12}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Additional configuration.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add extra configuration.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an unsigned integer setting. Absent keys yield `None`; present
    /// keys of the wrong type are a configuration error.
    pub fn get_u64(&self, key: &str) -> HalResult<Option<u64>> {
        match self.extra.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                HalError::Configuration(format!(
                    "'{key}' must be a non-negative integer, got {value}"
                ))
            }),
        }
    }

    /// Read a string setting.
    pub fn get_str(&self, key: &str) -> HalResult<Option<&str>> {
        match self.extra.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => value.as_str().map(Some).ok_or_else(|| {
                HalError::Configuration(format!("'{key}' must be a string, got {value}"))
            }),
        }
    }
}

/// Trait for quantum backends.
///
/// # Contract
///
/// - `capabilities()` is synchronous and infallible; implementations cache
///   capabilities at construction time.
/// - `validate()` reports every problem it finds without executing.
/// - `execute()` rejects zero shots, out-of-range operands, oversized
///   circuits and shot counts above `max_shots` before doing any work.
/// - The async variants produce the same observable results as their sync
///   counterparts.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Check a circuit against backend constraints.
    fn validate(&self, circuit: &Circuit) -> ValidationResult;

    /// Create the |0...0⟩ state in this backend's representation.
    fn initialize_state(&self, num_qubits: usize) -> HalResult<QuantumState>;

    /// Apply one instruction, returning the resulting state.
    fn apply_operation(
        &self,
        instruction: &Instruction,
        state: QuantumState,
    ) -> HalResult<QuantumState>;

    /// Run every instruction of `circuit` from |0...0⟩ without sampling.
    fn execute_to_state(&self, circuit: &Circuit) -> HalResult<QuantumState>;

    /// Run `circuit` and sample `shots` measurements, polling `cancel`
    /// between gates and between shot batches.
    fn execute_with_cancel(
        &self,
        circuit: &Circuit,
        shots: u32,
        cancel: &CancellationToken,
    ) -> HalResult<ExecutionResult>;

    /// Run `circuit` and sample `shots` measurements.
    fn execute(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        self.execute_with_cancel(circuit, shots, &CancellationToken::new())
    }

    /// Async form of [`execute`](Backend::execute).
    async fn execute_async(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        self.execute(circuit, shots)
    }

    /// Async form of [`execute_to_state`](Backend::execute_to_state).
    async fn execute_to_state_async(&self, circuit: &Circuit) -> HalResult<QuantumState> {
        self.execute_to_state(circuit)
    }
}

/// Result of circuit validation against backend constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// Circuit can run as-is.
    Valid,
    /// Circuit cannot run on this backend.
    Invalid {
        /// Reasons the circuit is invalid.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Build a result from collected problems.
    pub fn from_reasons(reasons: Vec<String>) -> Self {
        if reasons.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { reasons }
        }
    }

    /// Check if the circuit is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Convert into a [`HalError::Validation`] carrying all reasons.
    pub fn into_result(self) -> HalResult<()> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid { reasons } => Err(HalError::Validation(reasons.join("; "))),
        }
    }
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_config() {
        let config = BackendConfig::new("test")
            .with_extra("max_qubits", serde_json::json!(12))
            .with_extra("representation", serde_json::json!("sparse"));

        assert_eq!(config.name, "test");
        assert_eq!(config.get_u64("max_qubits"), Ok(Some(12)));
        assert_eq!(config.get_u64("seed"), Ok(None));
        assert_eq!(config.get_str("representation"), Ok(Some("sparse")));
        assert!(matches!(
            config.get_u64("representation"),
            Err(HalError::Configuration(_))
        ));
    }

    #[test]
    fn test_backend_config_flattened_json() {
        let config: BackendConfig =
            serde_json::from_str(r#"{"name": "sim", "seed": 7}"#).unwrap();
        assert_eq!(config.name, "sim");
        assert_eq!(config.get_u64("seed"), Ok(Some(7)));
    }

    #[test]
    fn test_validation_result() {
        assert!(ValidationResult::Valid.is_valid());
        assert!(ValidationResult::from_reasons(vec![]).is_valid());

        let invalid = ValidationResult::from_reasons(vec!["a".into(), "b".into()]);
        assert!(!invalid.is_valid());
        assert_eq!(
            invalid.into_result(),
            Err(HalError::Validation("a; b".into()))
        );
    }
}
