//! Library command implementation.

use anyhow::Result;

use qforge_ir::{Circuit, library};

/// Build a named library circuit.
pub fn build(name: &str, qubits: u32, marked: usize) -> Result<Circuit> {
    let circuit = match name.to_lowercase().as_str() {
        "bell" => library::bell()?,
        "ghz" => library::ghz(qubits)?,
        "qft" => library::qft(qubits)?,
        "iqft" => library::inverse_qft(qubits)?,
        "grover" => library::grover(qubits, marked)?,
        other => anyhow::bail!("Unknown circuit: '{other}'. Available: bell, ghz, qft, iqft, grover"),
    };
    Ok(circuit)
}

/// Execute the library command.
pub fn execute(name: &str, qubits: u32, marked: usize) -> Result<()> {
    let circuit = build(name, qubits, marked)?;
    print!("{}", qforge_qasm::emit(&circuit));
    Ok(())
}
