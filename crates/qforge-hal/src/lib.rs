//! qforge Hardware Abstraction Layer
//!
//! This crate defines the surface through which circuits are executed:
//! - A common [`Backend`] trait with sync and async execution
//! - [`Capabilities`] describing register width, gate set, representation
//!   and shot limit
//! - [`ExecutionResult`] and [`Counts`] for sampled histograms
//! - [`HalError`], the error taxonomy every backend reports through
//! - [`CancellationToken`] for cooperative cancellation
//! - [`BackendRegistry`] for looking backends up by name
//!
//! # Implementing a Custom Backend
//!
//! ```ignore
//! use qforge_hal::{
//!     Backend, CancellationToken, Capabilities, ExecutionResult, HalResult, ValidationResult,
//! };
//! use qforge_ir::{Circuit, Instruction};
//! use qforge_state::QuantumState;
//! use async_trait::async_trait;
//!
//! struct MyBackend {
//!     capabilities: Capabilities,
//! }
//!
//! #[async_trait]
//! impl Backend for MyBackend {
//!     fn name(&self) -> &str { "my_backend" }
//!
//!     fn capabilities(&self) -> &Capabilities {
//!         &self.capabilities
//!     }
//!
//!     fn validate(&self, circuit: &Circuit) -> ValidationResult {
//!         ValidationResult::Valid
//!     }
//!
//!     fn initialize_state(&self, num_qubits: usize) -> HalResult<QuantumState> {
//!         # todo!()
//!     }
//!
//!     fn apply_operation(&self, inst: &Instruction, state: QuantumState) -> HalResult<QuantumState> {
//!         # todo!()
//!     }
//!
//!     fn execute_to_state(&self, circuit: &Circuit) -> HalResult<QuantumState> {
//!         # todo!()
//!     }
//!
//!     fn execute_with_cancel(
//!         &self,
//!         circuit: &Circuit,
//!         shots: u32,
//!         cancel: &CancellationToken,
//!     ) -> HalResult<ExecutionResult> {
//!         # todo!()
//!     }
//! }
//! ```

pub mod backend;
pub mod cancel;
pub mod capability;
pub mod error;
pub mod registry;
pub mod result;

pub use backend::{Backend, BackendConfig, BackendFactory, ValidationResult};
pub use cancel::CancellationToken;
pub use capability::{Capabilities, DEFAULT_MAX_SHOTS, GateSet};
pub use error::{HalError, HalResult};
pub use registry::BackendRegistry;
pub use result::{Counts, ExecutionResult};
