//! Property-based tests for the gate kernels and sampler.

use proptest::prelude::*;

use qforge_adapter_sim::SimulatorBackend;
use qforge_adapter_sim::kernels::apply_instruction;
use qforge_hal::Backend;
use qforge_ir::{Circuit, Instruction, QubitId, StandardGate};
use qforge_state::{QuantumState, Representation};

const NUM_QUBITS: u32 = 4;

/// A gate plus distinct operands within a 4-qubit register.
fn arb_instruction() -> impl Strategy<Value = Instruction> {
    let angle = -10.0f64..10.0;
    let gate = prop_oneof![
        Just(StandardGate::X),
        Just(StandardGate::Y),
        Just(StandardGate::Z),
        Just(StandardGate::H),
        Just(StandardGate::S),
        Just(StandardGate::Sdg),
        Just(StandardGate::T),
        Just(StandardGate::Tdg),
        angle.clone().prop_map(StandardGate::Rx),
        angle.clone().prop_map(StandardGate::Ry),
        angle.prop_map(StandardGate::Rz),
        Just(StandardGate::CX),
        Just(StandardGate::CZ),
        Just(StandardGate::Swap),
        Just(StandardGate::CCX),
    ];
    (gate, Just((0..NUM_QUBITS).collect::<Vec<u32>>()).prop_shuffle()).prop_map(|(g, order)| {
        let arity = g.num_qubits() as usize;
        Instruction::gate(g, order[..arity].iter().map(|&q| QubitId(q)))
    })
}

/// A random 4-qubit circuit starting from a nontrivial superposition.
fn arb_circuit() -> impl Strategy<Value = Circuit> {
    prop::collection::vec(arb_instruction(), 1..30).prop_map(|insts| {
        let mut circuit = Circuit::new(NUM_QUBITS);
        for inst in insts {
            // every generated instruction is valid for the register
            circuit = circuit.push(inst).unwrap();
        }
        circuit
    })
}

fn prepared_state(representation: Representation) -> QuantumState {
    let mut state = QuantumState::new(representation, NUM_QUBITS as usize).unwrap();
    for (q, theta) in [(0, 0.3), (1, 1.1), (2, 2.0), (3, 0.7)] {
        apply_instruction(
            &mut state,
            &Instruction::single_qubit_gate(StandardGate::Ry(theta), QubitId(q)),
        )
        .unwrap();
    }
    apply_instruction(
        &mut state,
        &Instruction::single_qubit_gate(StandardGate::T, QubitId(2)),
    )
    .unwrap();
    state
}

proptest! {
    #[test]
    fn gates_preserve_norm(inst in arb_instruction()) {
        for representation in [Representation::Dense, Representation::Sparse] {
            let mut state = prepared_state(representation);
            apply_instruction(&mut state, &inst).unwrap();
            let total = state.total_probability().unwrap();
            prop_assert!((total - 1.0).abs() < 1e-10, "{} drifted to {}", inst.name(), total);
        }
    }

    #[test]
    fn self_inverse_gates_cancel(inst in arb_instruction()) {
        let gate = *inst.as_gate().unwrap();
        prop_assume!(gate.is_self_inverse());

        let original = prepared_state(Representation::Dense);
        let mut state = original.clone();
        apply_instruction(&mut state, &inst).unwrap();
        apply_instruction(&mut state, &inst).unwrap();
        prop_assert!(state.approx_eq(&original));
    }

    #[test]
    fn gate_then_inverse_is_identity(inst in arb_instruction()) {
        let gate = *inst.as_gate().unwrap();
        let inverse = Instruction::gate(gate.inverse(), inst.qubits.iter().copied());

        let original = prepared_state(Representation::Sparse);
        let mut state = original.clone();
        apply_instruction(&mut state, &inst).unwrap();
        apply_instruction(&mut state, &inverse).unwrap();
        prop_assert!(state.approx_eq(&original));
    }

    #[test]
    fn circuits_preserve_norm_and_agree(circuit in arb_circuit()) {
        let dense = SimulatorBackend::new().execute_to_state(&circuit).unwrap();
        let sparse = SimulatorBackend::sparse().execute_to_state(&circuit).unwrap();
        prop_assert!(dense.is_normalized().unwrap());
        prop_assert!(sparse.is_normalized().unwrap());
        prop_assert!(dense.approx_eq(&sparse));
    }

    #[test]
    fn histogram_total_equals_shots(
        circuit in arb_circuit(),
        shots in 1u32..6000,
        seed in any::<u64>(),
    ) {
        let result = SimulatorBackend::new()
            .with_seed(seed)
            .execute(&circuit, shots)
            .unwrap();
        prop_assert_eq!(result.counts.total_shots(), u64::from(shots));
        prop_assert_eq!(result.gate_count, circuit.gate_count());
        for (bits, _) in result.counts.iter() {
            prop_assert_eq!(bits.len(), NUM_QUBITS as usize);
        }
    }

    #[test]
    fn inverse_circuit_restores_ground_state(circuit in arb_circuit()) {
        let round_trip = circuit.clone().append(&circuit.inverse().unwrap()).unwrap();
        let state = SimulatorBackend::new().execute_to_state(&round_trip).unwrap();
        prop_assert!((state.probability(0).unwrap() - 1.0).abs() < 1e-9);
    }
}
