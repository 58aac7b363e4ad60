//! Backends command implementation.

use anyhow::Result;
use console::style;

use super::common::registry;

/// Execute the backends command.
pub fn execute() -> Result<()> {
    println!("{} Available backends:\n", style("qforge").cyan().bold());

    let registry = registry();
    for name in registry.available_backends() {
        let backend = registry.get(&name)?;
        let caps = backend.capabilities();

        println!(
            "  {} {} {}",
            style("●").green(),
            style(&name).bold(),
            if caps.is_simulator { "(local)" } else { "" }
        );
        println!("    Representation: {}", caps.representation);
        println!("    Qubits: {}", caps.num_qubits);
        println!("    Max shots: {}", caps.max_shots);
        let gates: Vec<&str> = caps
            .gate_set
            .single_qubit
            .iter()
            .chain(&caps.gate_set.two_qubit)
            .chain(&caps.gate_set.three_qubit)
            .map(String::as_str)
            .collect();
        println!("    Gates: {}", gates.join(", "));
        println!();
    }

    Ok(())
}
