//! Error types for the HAL crate.

use qforge_ir::IrError;
use qforge_state::StateError;
use thiserror::Error;

/// Errors that can occur in backend operations.
///
/// Every failure surfaced by a backend falls into one of these kinds, so
/// callers can branch on the kind without parsing messages.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Input violates a precondition (operand ranges, shot count, shape).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Numerically invalid state (zero norm, unnormalized input to sampling).
    #[error("Domain error: {0}")]
    Domain(String),

    /// Circuit exceeds what the backend can hold.
    #[error("Capacity exceeded: requested {requested} qubits, maximum is {max}")]
    Capacity {
        /// Requested number of qubits.
        requested: usize,
        /// Maximum supported by the backend.
        max: usize,
    },

    /// Feature exists in the interface but has no implementation.
    #[error("Not implemented: {what}{}", format_hint(.hint))]
    NotImplemented {
        /// What was requested.
        what: String,
        /// Pointer to a working alternative.
        hint: Option<String>,
    },

    /// Execution was cancelled through its token.
    #[error("Execution cancelled")]
    Cancelled,

    /// Gate is not in the backend's gate set.
    #[error("Unsupported gate: {0}")]
    UnsupportedGate(String),

    /// Backend configuration is malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl HalError {
    /// Whether repeating the same call could succeed.
    ///
    /// Local execution is deterministic in its inputs, so no kind is
    /// retryable here; remote backends layered on this taxonomy may differ.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[allow(clippy::ref_option)]
fn format_hint(hint: &Option<String>) -> String {
    match hint {
        Some(hint) => format!(" ({hint})"),
        None => String::new(),
    }
}

impl From<StateError> for HalError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::Capacity { requested, max } => HalError::Capacity { requested, max },
            StateError::ZeroNorm(_) | StateError::DimensionMismatch { .. } => {
                HalError::Domain(err.to_string())
            }
            StateError::NotImplemented { what, hint } => HalError::NotImplemented {
                what,
                hint: Some(hint),
            },
            StateError::InvalidDimension(_) | StateError::IndexOutOfRange { .. } => {
                HalError::Validation(err.to_string())
            }
            other => HalError::Backend(other.to_string()),
        }
    }
}

impl From<IrError> for HalError {
    fn from(err: IrError) -> Self {
        HalError::Validation(err.to_string())
    }
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
