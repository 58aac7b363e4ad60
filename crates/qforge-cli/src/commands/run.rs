//! Run command implementation.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use qforge_state::Representation;

use super::common::{create_backend, load_circuit, print_results};
use crate::OutputFormat;

/// Settings for one `run` invocation.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub shots: u32,
    pub seed: Option<u64>,
    pub representation: Representation,
    pub backend: String,
    pub format: OutputFormat,
}

/// Execute the run command.
pub async fn execute(input: &Path, options: &RunOptions) -> Result<()> {
    let circuit = load_circuit(input)?;
    let backend = create_backend(&options.backend, options.representation, options.seed)?;
    backend.validate(&circuit).into_result()?;
    info!(
        qubits = circuit.num_qubits(),
        gates = circuit.gate_count(),
        backend = backend.name(),
        "Loaded circuit"
    );

    if options.format == OutputFormat::Json {
        let result = backend.execute_async(&circuit, options.shots).await?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} Running {} on {} ({} shots)",
        style("→").cyan().bold(),
        style(input.display()).green(),
        style(backend.name()).yellow(),
        options.shots
    );
    println!(
        "  Loaded: {} qubits, depth {}, {} representation",
        circuit.num_qubits(),
        circuit.depth(),
        backend.capabilities().representation
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message("Simulating...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = backend.execute_async(&circuit, options.shots).await;
    spinner.finish_and_clear();

    print_results(&result?);
    Ok(())
}
