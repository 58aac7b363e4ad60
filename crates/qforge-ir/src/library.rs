//! Prebuilt circuits for common algorithms.

use std::f64::consts::PI;

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::qubit::QubitId;

/// Bell pair preparation `(|00⟩ + |11⟩)/√2`.
pub fn bell() -> IrResult<Circuit> {
    Circuit::with_name("bell", 2)
        .h(QubitId(0))?
        .cx(QubitId(0), QubitId(1))
}

/// GHZ state preparation over `num_qubits` qubits.
pub fn ghz(num_qubits: u32) -> IrResult<Circuit> {
    if num_qubits == 0 {
        return Err(IrError::Unsupported("GHZ state needs at least one qubit".into()));
    }
    let mut circuit = Circuit::with_name("ghz", num_qubits).h(QubitId(0))?;
    for q in 1..num_qubits {
        circuit = circuit.cx(QubitId(q - 1), QubitId(q))?;
    }
    Ok(circuit)
}

/// Quantum Fourier transform over `num_qubits` qubits, including the final
/// qubit-reversal swaps.
///
/// Controlled phases are expanded through [`Circuit::cphase`], so the
/// transform is exact up to a global phase.
pub fn qft(num_qubits: u32) -> IrResult<Circuit> {
    let mut circuit = Circuit::with_name("qft", num_qubits);
    for target in (0..num_qubits).rev() {
        circuit = circuit.h(QubitId(target))?;
        for control in (0..target).rev() {
            let theta = PI / f64::from(1u32 << (target - control));
            circuit = circuit.cphase(theta, QubitId(control), QubitId(target))?;
        }
    }
    for q in 0..num_qubits / 2 {
        circuit = circuit.swap(QubitId(q), QubitId(num_qubits - 1 - q))?;
    }
    Ok(circuit)
}

/// Inverse quantum Fourier transform.
pub fn inverse_qft(num_qubits: u32) -> IrResult<Circuit> {
    Ok(qft(num_qubits)?.inverse()?.named("iqft"))
}

/// Grover search for a single marked basis state.
///
/// Supports 2 qubits (one iteration, exact) and 3 qubits (two iterations).
/// The circuit ends in superposition; measurements are left to the caller.
pub fn grover(num_qubits: u32, marked: usize) -> IrResult<Circuit> {
    let iterations = match num_qubits {
        2 => 1,
        3 => 2,
        n => {
            return Err(IrError::Unsupported(format!(
                "Grover search is built for 2 or 3 qubits, got {n}"
            )));
        }
    };
    if marked >= 1 << num_qubits {
        return Err(IrError::Unsupported(format!(
            "marked state {marked} does not fit in {num_qubits} qubits"
        )));
    }

    let qubits: Vec<QubitId> = (0..num_qubits).map(QubitId).collect();
    let zero_bits: Vec<QubitId> = qubits
        .iter()
        .copied()
        .filter(|q| marked & q.mask() == 0)
        .collect();

    let mut circuit = Circuit::with_name("grover", num_qubits);
    for &q in &qubits {
        circuit = circuit.h(q)?;
    }

    for _ in 0..iterations {
        // Oracle: flip the phase of |marked⟩.
        for &q in &zero_bits {
            circuit = circuit.x(q)?;
        }
        circuit = controlled_z_all(circuit, &qubits)?;
        for &q in &zero_bits {
            circuit = circuit.x(q)?;
        }

        // Diffusion: reflect about the uniform superposition.
        for &q in &qubits {
            circuit = circuit.h(q)?.x(q)?;
        }
        circuit = controlled_z_all(circuit, &qubits)?;
        for &q in &qubits {
            circuit = circuit.x(q)?.h(q)?;
        }
    }

    Ok(circuit)
}

/// Phase-flip |1…1⟩ over two or three qubits.
fn controlled_z_all(circuit: Circuit, qubits: &[QubitId]) -> IrResult<Circuit> {
    match *qubits {
        [a, b] => circuit.cz(a, b),
        [a, b, c] => circuit.h(c)?.ccx(a, b, c)?.h(c),
        _ => Err(IrError::Unsupported(format!(
            "multi-controlled Z over {} qubits",
            qubits.len()
        ))),
    }
}
