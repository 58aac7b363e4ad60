//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;

use qforge_adapter_sim::SimulatorBackend;
use qforge_hal::{Backend, BackendConfig, BackendFactory, BackendRegistry, ExecutionResult};
use qforge_ir::Circuit;
use qforge_state::Representation;

/// Rows printed before the histogram is truncated.
const MAX_ROWS: usize = 16;

/// Load a circuit from an OpenQASM 2.0 file.
pub fn load_circuit(path: &Path) -> Result<Circuit> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    qforge_qasm::parse(&source).with_context(|| format!("Failed to parse {}", path.display()))
}

/// All backends the CLI can run on.
///
/// `simulator` follows the requested representation; `sparse-simulator`
/// is always sparse.
pub fn registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry.register::<SimulatorBackend>("simulator");
    registry.register_factory("sparse-simulator", |config: BackendConfig| {
        let config = config.with_extra("representation", serde_json::json!("sparse"));
        let backend: Arc<dyn Backend> = Arc::new(SimulatorBackend::from_config(config)?);
        Ok(backend)
    });
    registry
}

/// Build a backend from the registry with the CLI's settings.
pub fn create_backend(
    name: &str,
    representation: Representation,
    seed: Option<u64>,
) -> Result<Arc<dyn Backend>> {
    let mut config = BackendConfig::new(name)
        .with_extra("representation", serde_json::json!(representation.as_str()));
    if let Some(seed) = seed {
        config = config.with_extra("seed", serde_json::json!(seed));
    }

    let registry = registry();
    if !registry.has_backend(name) {
        anyhow::bail!(
            "Unknown backend: '{name}'. Available: {}",
            registry.available_backends().join(", ")
        );
    }
    Ok(registry.create(name, config)?)
}

/// Histogram rows ordered by descending count, then bitstring.
pub fn sorted_counts(result: &ExecutionResult) -> Vec<(&str, u64)> {
    let mut rows: Vec<_> = result
        .counts
        .iter()
        .map(|(bits, &count)| (bits.as_str(), count))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    rows
}

/// Print execution results in a table format.
#[allow(clippy::cast_precision_loss)]
pub fn print_results(result: &ExecutionResult) {
    println!(
        "\n{} Results ({} shots, {} gates):",
        style("✓").green().bold(),
        result.shots,
        result.gate_count
    );

    let rows = sorted_counts(result);
    let total = result.counts.total_shots() as f64;

    for (bitstring, count) in rows.iter().take(MAX_ROWS) {
        let prob = *count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if rows.len() > MAX_ROWS {
        println!("  ... and {} more outcomes", rows.len() - MAX_ROWS);
    }

    if let Some(seed) = result.seed {
        println!("\n  Seed: {}", style(seed).yellow());
    }
    if let Some(time_ms) = result.execution_time_ms {
        println!("  Execution time: {} ms", style(time_ms).yellow());
    }
}
