//! qforge Local Simulator
//!
//! Exact local simulation of qforge circuits: gate kernels over dense and
//! sparse states, seeded shot sampling and the [`SimulatorBackend`] that
//! ties them to the [`qforge_hal::Backend`] trait.
//!
//! # Representations
//!
//! | Representation | Max qubits | Memory | Good for |
//! |----------------|------------|--------|----------|
//! | Dense | 16 | 16 B × 2^n | Any circuit |
//! | Sparse | 30 | ~40 B per nonzero amplitude | GHZ-like states, classical logic |
//!
//! # Example
//!
//! ```rust
//! use qforge_adapter_sim::SimulatorBackend;
//! use qforge_hal::Backend;
//! use qforge_ir::library;
//!
//! let backend = SimulatorBackend::new().with_seed(42);
//! let circuit = library::bell()?.measure_all()?;
//! let result = backend.execute(&circuit, 1000)?;
//!
//! // Only |00⟩ and |11⟩ are ever observed
//! assert_eq!(result.counts.get("00") + result.counts.get("11"), 1000);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod executor;
pub mod kernels;
pub mod sampler;
mod simulator;

pub use executor::{ExecutionPhase, Executor, ExecutorConfig};
pub use sampler::{PARALLEL_SHOT_THRESHOLD, Sampler};
pub use simulator::SimulatorBackend;
