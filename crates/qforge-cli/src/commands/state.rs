//! State command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;
use num_complex::Complex64;
use serde_json::json;

use qforge_state::{EQ_TOLERANCE, QuantumState, Representation, bitstring};

use super::common::{create_backend, load_circuit};
use crate::OutputFormat;

/// Execute the state command.
pub async fn execute(input: &Path, representation: Representation, format: OutputFormat) -> Result<()> {
    let circuit = load_circuit(input)?;
    let backend = create_backend("simulator", representation, None)?;
    backend.validate(&circuit).into_result()?;

    let state = backend.execute_to_state_async(&circuit).await?;
    let num_qubits = state.num_qubits()?;
    let amplitudes = nonzero_amplitudes(&state)?;

    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = amplitudes
                .iter()
                .map(|(index, a)| {
                    json!({
                        "index": index,
                        "bitstring": bitstring(*index, num_qubits),
                        "re": a.re,
                        "im": a.im,
                        "probability": a.norm_sqr(),
                    })
                })
                .collect();
            let doc = json!({
                "num_qubits": num_qubits,
                "representation": state.representation(),
                "amplitudes": entries,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Text => {
            println!(
                "{} {} qubits, {} nonzero amplitudes ({})",
                style("→").cyan().bold(),
                num_qubits,
                amplitudes.len(),
                state.representation()
            );
            for (index, a) in &amplitudes {
                println!(
                    "  |{}⟩  {:+.6} {:+.6}i  p={:.6}",
                    style(bitstring(*index, num_qubits)).cyan(),
                    a.re,
                    a.im,
                    a.norm_sqr()
                );
            }
        }
    }
    Ok(())
}

/// Basis index and amplitude of every entry above the comparison tolerance.
pub fn nonzero_amplitudes(state: &QuantumState) -> Result<Vec<(usize, Complex64)>> {
    let entries: Vec<(usize, Complex64)> = if let Some(dense) = state.as_statevector() {
        dense.amplitudes().iter().copied().enumerate().collect()
    } else if let Some(sparse) = state.as_sparse() {
        sparse.entries().iter().map(|(&i, &a)| (i, a)).collect()
    } else {
        anyhow::bail!("{} states have no amplitudes to print", state.representation());
    };

    Ok(entries
        .into_iter()
        .filter(|(_, a)| a.norm() >= EQ_TOLERANCE)
        .collect())
}
