//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - exact local simulation of quantum circuits",
        style("qforge").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qforge-ir           Circuits, gates and the circuit library");
    println!("  qforge-state        Dense and sparse amplitude stores");
    println!("  qforge-hal          Backend trait, registry and results");
    println!("  qforge-adapter-sim  Gate kernels, sampler and simulator backend");
    println!("  qforge-qasm         OpenQASM 2.0 import and export");
    println!("  qforge-cli          Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
