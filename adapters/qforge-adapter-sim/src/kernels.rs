//! Gate application kernels for dense and sparse states.
//!
//! Qubit `q` is bit `q` of the basis index. Dense kernels walk index pairs
//! that differ only in the target bit and update them in place; sparse
//! kernels rebuild the amplitude map from the nonzero entries.

use std::collections::BTreeMap;
use std::f64::consts::FRAC_1_SQRT_2;

use num_complex::Complex64;

use qforge_hal::{HalError, HalResult};
use qforge_ir::{Instruction, InstructionKind, StandardGate};
use qforge_state::{QuantumState, SparseState, StateError, Statevector};

/// A 2×2 complex matrix, row-major.
pub type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Check operand count, range and distinctness against `num_qubits`.
pub fn validate_operands(instruction: &Instruction, num_qubits: usize) -> HalResult<()> {
    let width = u32::try_from(num_qubits)
        .map_err(|_| HalError::Validation(format!("register of {num_qubits} qubits")))?;
    instruction.validate(width).map_err(HalError::from)
}

/// Apply one instruction to `state` in place.
///
/// Returns `true` when a unitary gate was applied. Measurements and barriers
/// are accepted and leave the amplitudes untouched.
pub fn apply_instruction(state: &mut QuantumState, instruction: &Instruction) -> HalResult<bool> {
    let num_qubits = state.num_qubits()?;
    validate_operands(instruction, num_qubits)?;

    let InstructionKind::Gate(gate) = &instruction.kind else {
        return Ok(false);
    };
    let qubits: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();

    match state {
        QuantumState::Dense(sv) => apply_dense(sv, gate, &qubits),
        QuantumState::Sparse(sp) => apply_sparse(sp, gate, &qubits),
        QuantumState::Topological => {
            return Err(StateError::NotImplemented {
                what: "gate application on topological states".into(),
                hint: "use the dense or sparse representation".into(),
            }
            .into());
        }
    }
    Ok(true)
}

/// The 2×2 unitary of a single-qubit gate, or of the target action of a
/// controlled gate. `None` for `Swap`.
pub fn target_matrix(gate: &StandardGate) -> Option<Matrix2> {
    let m = match *gate {
        StandardGate::X | StandardGate::CX | StandardGate::CCX => [[ZERO, ONE], [ONE, ZERO]],
        StandardGate::Y => [[ZERO, -I], [I, ZERO]],
        StandardGate::Z | StandardGate::CZ => [[ONE, ZERO], [ZERO, -ONE]],
        StandardGate::H => {
            let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
            [[h, h], [h, -h]]
        }
        StandardGate::S => diagonal(I),
        StandardGate::Sdg => diagonal(-I),
        StandardGate::T => diagonal(Complex64::from_polar(1.0, std::f64::consts::FRAC_PI_4)),
        StandardGate::Tdg => diagonal(Complex64::from_polar(1.0, -std::f64::consts::FRAC_PI_4)),
        StandardGate::Rx(theta) => {
            let c = Complex64::new((theta / 2.0).cos(), 0.0);
            let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
            [[c, neg_i_s], [neg_i_s, c]]
        }
        StandardGate::Ry(theta) => {
            let c = Complex64::new((theta / 2.0).cos(), 0.0);
            let s = Complex64::new((theta / 2.0).sin(), 0.0);
            [[c, -s], [s, c]]
        }
        StandardGate::Rz(theta) => [
            [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
            [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
        ],
        StandardGate::Swap => return None,
    };
    Some(m)
}

fn diagonal(phase: Complex64) -> Matrix2 {
    [[ONE, ZERO], [ZERO, phase]]
}

// =========================================================================
// Dense kernels
// =========================================================================

/// Apply `gate` to a dense statevector. Operands must already be validated.
pub(crate) fn apply_dense(sv: &mut Statevector, gate: &StandardGate, qubits: &[usize]) {
    let amps = sv.amplitudes_mut();
    match gate {
        StandardGate::X => apply_x(amps, qubits[0]),
        StandardGate::Y => apply_y(amps, qubits[0]),
        StandardGate::Z => apply_phase(amps, qubits[0], -ONE),
        StandardGate::H => apply_h(amps, qubits[0]),
        StandardGate::S => apply_phase(amps, qubits[0], I),
        StandardGate::Sdg => apply_phase(amps, qubits[0], -I),
        StandardGate::T => apply_phase(
            amps,
            qubits[0],
            Complex64::from_polar(1.0, std::f64::consts::FRAC_PI_4),
        ),
        StandardGate::Tdg => apply_phase(
            amps,
            qubits[0],
            Complex64::from_polar(1.0, -std::f64::consts::FRAC_PI_4),
        ),
        StandardGate::Rz(theta) => apply_rz(amps, qubits[0], *theta),
        StandardGate::Rx(_) | StandardGate::Ry(_) => {
            if let Some(m) = target_matrix(gate) {
                apply_matrix(amps, qubits[0], &m);
            }
        }
        StandardGate::CX => apply_cx(amps, qubits[0], qubits[1]),
        StandardGate::CZ => apply_cz(amps, qubits[0], qubits[1]),
        StandardGate::Swap => apply_swap(amps, qubits[0], qubits[1]),
        StandardGate::CCX => apply_ccx(amps, qubits[0], qubits[1], qubits[2]),
    }
}

fn apply_x(amps: &mut [Complex64], qubit: usize) {
    let mask = 1 << qubit;
    for i in 0..amps.len() {
        if i & mask == 0 {
            amps.swap(i, i | mask);
        }
    }
}

fn apply_y(amps: &mut [Complex64], qubit: usize) {
    let mask = 1 << qubit;
    for i in 0..amps.len() {
        if i & mask == 0 {
            let j = i | mask;
            let tmp = amps[i];
            amps[i] = -I * amps[j];
            amps[j] = I * tmp;
        }
    }
}

fn apply_h(amps: &mut [Complex64], qubit: usize) {
    let mask = 1 << qubit;
    for i in 0..amps.len() {
        if i & mask == 0 {
            let j = i | mask;
            let a = amps[i];
            let b = amps[j];
            amps[i] = FRAC_1_SQRT_2 * (a + b);
            amps[j] = FRAC_1_SQRT_2 * (a - b);
        }
    }
}

/// Multiply every amplitude with the qubit set by `phase`.
fn apply_phase(amps: &mut [Complex64], qubit: usize, phase: Complex64) {
    let mask = 1 << qubit;
    for (i, amp) in amps.iter_mut().enumerate() {
        if i & mask != 0 {
            *amp *= phase;
        }
    }
}

fn apply_rz(amps: &mut [Complex64], qubit: usize, theta: f64) {
    let mask = 1 << qubit;
    let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
    let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
    for (i, amp) in amps.iter_mut().enumerate() {
        *amp *= if i & mask == 0 { phase_0 } else { phase_1 };
    }
}

fn apply_matrix(amps: &mut [Complex64], qubit: usize, m: &Matrix2) {
    let mask = 1 << qubit;
    for i in 0..amps.len() {
        if i & mask == 0 {
            let j = i | mask;
            let a = amps[i];
            let b = amps[j];
            amps[i] = m[0][0] * a + m[0][1] * b;
            amps[j] = m[1][0] * a + m[1][1] * b;
        }
    }
}

fn apply_cx(amps: &mut [Complex64], control: usize, target: usize) {
    let ctrl_mask = 1 << control;
    let tgt_mask = 1 << target;
    for i in 0..amps.len() {
        if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
            amps.swap(i, i | tgt_mask);
        }
    }
}

fn apply_cz(amps: &mut [Complex64], control: usize, target: usize) {
    let mask = (1 << control) | (1 << target);
    for (i, amp) in amps.iter_mut().enumerate() {
        if i & mask == mask {
            *amp = -*amp;
        }
    }
}

fn apply_swap(amps: &mut [Complex64], q1: usize, q2: usize) {
    let mask1 = 1 << q1;
    let mask2 = 1 << q2;
    for i in 0..amps.len() {
        // visit each (10, 01) pair once, from the side with q1 set
        if (i & mask1 != 0) && (i & mask2 == 0) {
            amps.swap(i, (i & !mask1) | mask2);
        }
    }
}

fn apply_ccx(amps: &mut [Complex64], c1: usize, c2: usize, target: usize) {
    let ctrl_mask = (1 << c1) | (1 << c2);
    let tgt_mask = 1 << target;
    for i in 0..amps.len() {
        if (i & ctrl_mask == ctrl_mask) && (i & tgt_mask == 0) {
            amps.swap(i, i | tgt_mask);
        }
    }
}

// =========================================================================
// Sparse kernels
// =========================================================================

/// Apply `gate` to a sparse state. Operands must already be validated.
pub(crate) fn apply_sparse(sp: &mut SparseState, gate: &StandardGate, qubits: &[usize]) {
    let entries = match gate {
        StandardGate::Swap => swap_sparse(sp.entries(), qubits[0], qubits[1]),
        _ => {
            let (controls, target) = qubits.split_at(qubits.len() - 1);
            let ctrl_mask = controls.iter().fold(0usize, |m, &q| m | (1 << q));
            match target_matrix(gate) {
                Some(m) => controlled_sparse(sp, ctrl_mask, target[0], &m),
                None => return,
            }
        }
    };
    sp.set_entries(entries);
}

fn controlled_sparse(
    sp: &SparseState,
    ctrl_mask: usize,
    target: usize,
    m: &Matrix2,
) -> BTreeMap<usize, Complex64> {
    let tgt_mask = 1 << target;
    let mut out = BTreeMap::new();
    for (&i, &amp) in sp.entries() {
        if i & ctrl_mask != ctrl_mask {
            out.insert(i, amp);
            continue;
        }
        let i0 = i & !tgt_mask;
        let i1 = i | tgt_mask;
        // Each pair is computed once, from whichever member is seen first.
        if out.contains_key(&i0) || out.contains_key(&i1) {
            continue;
        }
        let a = sp.get(i0);
        let b = sp.get(i1);
        out.insert(i0, m[0][0] * a + m[0][1] * b);
        out.insert(i1, m[1][0] * a + m[1][1] * b);
    }
    out
}

fn swap_sparse(
    entries: &BTreeMap<usize, Complex64>,
    q1: usize,
    q2: usize,
) -> BTreeMap<usize, Complex64> {
    let mask1 = 1 << q1;
    let mask2 = 1 << q2;
    entries
        .iter()
        .map(|(&i, &amp)| {
            let b1 = i & mask1 != 0;
            let b2 = i & mask2 != 0;
            let j = if b1 == b2 { i } else { i ^ (mask1 | mask2) };
            (j, amp)
        })
        .collect()
}
