//! End-to-end execution scenarios against the simulator backend.

use std::f64::consts::PI;

use num_complex::Complex64;
use qforge_adapter_sim::SimulatorBackend;
use qforge_hal::{Backend, CancellationToken, HalError};
use qforge_ir::{Circuit, QubitId, library};
use qforge_state::{QuantumState, StateError, Statevector};

#[test]
fn hadamard_splits_evenly() {
    let backend = SimulatorBackend::new().with_seed(2024);
    let circuit = Circuit::new(1).h(QubitId(0)).unwrap().measure_all().unwrap();
    let result = backend.execute(&circuit, 10_000).unwrap();

    let zeros = result.counts.get("0");
    let ones = result.counts.get("1");
    assert_eq!(zeros + ones, 10_000);
    assert!((4500..=5500).contains(&zeros), "|0⟩ count {zeros}");
    assert!((4500..=5500).contains(&ones), "|1⟩ count {ones}");
}

#[test]
fn bell_state_is_correlated() {
    let backend = SimulatorBackend::new().with_seed(5);
    let circuit = library::bell().unwrap().measure_all().unwrap();
    let result = backend.execute(&circuit, 4000).unwrap();

    assert_eq!(result.counts.get("00") + result.counts.get("11"), 4000);
    assert_eq!(result.counts.get("01"), 0);
    assert_eq!(result.counts.get("10"), 0);
    assert!(result.counts.get("00") > 0);
    assert!(result.counts.get("11") > 0);
    assert_eq!(result.gate_count, 2);
}

#[test]
fn qft_then_inverse_is_identity() {
    let backend = SimulatorBackend::new();
    for n in 1..=5 {
        let circuit = library::qft(n)
            .unwrap()
            .append(&library::inverse_qft(n).unwrap())
            .unwrap();
        let state = backend.execute_to_state(&circuit).unwrap();
        let expected = Statevector::new(n as usize).unwrap();
        assert!(
            state.as_statevector().unwrap().approx_eq(&expected),
            "QFT·QFT⁻¹ ≠ I on {n} qubits"
        );
    }
}

#[test]
fn qft_of_zero_is_uniform() {
    let backend = SimulatorBackend::new();
    let state = backend.execute_to_state(&library::qft(3).unwrap()).unwrap();
    for p in state.probabilities().unwrap() {
        assert!((p - 0.125).abs() < 1e-10);
    }
}

#[test]
fn amplitude_out_of_range_is_reported() {
    let backend = SimulatorBackend::new();
    let state = backend
        .execute_to_state(&library::bell().unwrap())
        .unwrap();
    assert!(matches!(
        state.amplitude(4),
        Err(StateError::IndexOutOfRange { index: 4, dimension: 4 })
    ));
    assert!(matches!(
        state.amplitude(-1),
        Err(StateError::IndexOutOfRange { .. })
    ));
}

#[test]
fn zero_shots_is_a_validation_error() {
    let backend = SimulatorBackend::new();
    let circuit = library::bell().unwrap();
    assert!(matches!(
        backend.execute(&circuit, 0),
        Err(HalError::Validation(_))
    ));
}

#[test]
fn same_seed_gives_byte_identical_histograms() {
    let circuit = library::qft(4)
        .unwrap()
        .ry(0.7, QubitId(2))
        .unwrap()
        .measure_all()
        .unwrap();
    let a = SimulatorBackend::new().with_seed(1234);
    let b = SimulatorBackend::new().with_seed(1234);

    let ra = a.execute(&circuit, 5000).unwrap();
    let rb = b.execute(&circuit, 5000).unwrap();
    assert_eq!(
        serde_json::to_string(&ra.counts).unwrap(),
        serde_json::to_string(&rb.counts).unwrap()
    );
}

#[test]
fn different_seeds_diverge() {
    let circuit = library::qft(3).unwrap();
    let ra = SimulatorBackend::new()
        .with_seed(1)
        .execute(&circuit, 2000)
        .unwrap();
    let rb = SimulatorBackend::new()
        .with_seed(2)
        .execute(&circuit, 2000)
        .unwrap();
    assert_ne!(ra.counts, rb.counts);
}

#[test]
fn unseeded_runs_diverge() {
    // uniform over 16 outcomes, so equal histograms are vanishingly unlikely
    let circuit = library::qft(4).unwrap().measure_all().unwrap();
    let backend = SimulatorBackend::new();
    assert_eq!(backend.seed(), None);

    let ra = backend.execute(&circuit, 2000).unwrap();
    let rb = SimulatorBackend::new().execute(&circuit, 2000).unwrap();
    assert_eq!(ra.counts.total_shots(), 2000);
    assert_eq!(rb.counts.total_shots(), 2000);
    assert!(ra.seed.is_some() && rb.seed.is_some());
    assert_ne!(ra.seed, rb.seed);
    assert_ne!(ra.counts, rb.counts);
}

#[test]
fn histogram_totals_match_shots_across_parallel_threshold() {
    let backend = SimulatorBackend::new().with_seed(9);
    let circuit = library::ghz(4).unwrap().h(QubitId(3)).unwrap();
    for shots in [1, 17, 4095, 4096, 12_345] {
        let result = backend.execute(&circuit, shots).unwrap();
        assert_eq!(result.counts.total_shots(), u64::from(shots));
        assert_eq!(result.shots, shots);
    }
}

#[test]
fn bitstrings_put_qubit_zero_rightmost() {
    let backend = SimulatorBackend::new().with_seed(0);
    let n = 4u32;
    for k in 0..n {
        let circuit = Circuit::new(n).x(QubitId(k)).unwrap().measure_all().unwrap();
        let result = backend.execute(&circuit, 10).unwrap();
        let (bits, count) = result.counts.most_frequent().unwrap();
        assert_eq!(count, 10);

        let pos = (n - 1 - k) as usize;
        for (i, ch) in bits.chars().enumerate() {
            assert_eq!(ch, if i == pos { '1' } else { '0' }, "qubit {k}: {bits}");
        }
        assert_eq!(usize::from_str_radix(bits, 2).unwrap(), 1 << k);

        let state = backend.execute_to_state(&circuit).unwrap();
        assert!((state.probability(1 << k).unwrap() - 1.0).abs() < 1e-12);
    }
}

#[test]
fn dense_and_sparse_agree() {
    let circuits = [
        library::ghz(5).unwrap(),
        library::bell().unwrap().ry(PI / 3.0, QubitId(1)).unwrap(),
        library::grover(3, 5).unwrap(),
    ];
    for circuit in &circuits {
        let dense = SimulatorBackend::new().with_seed(77);
        let sparse = SimulatorBackend::sparse().with_seed(77);

        let ds = dense.execute_to_state(circuit).unwrap();
        let ss = sparse.execute_to_state(circuit).unwrap();
        assert!(ds.approx_eq(&ss), "states differ for {}", circuit.name());

        let dc = dense.execute(circuit, 3000).unwrap().counts;
        let sc = sparse.execute(circuit, 3000).unwrap().counts;
        assert_eq!(dc, sc, "histograms differ for {}", circuit.name());
    }
}

#[test]
fn sparse_handles_wide_ghz() {
    let backend = SimulatorBackend::sparse().with_seed(3);
    let circuit = library::ghz(30).unwrap();
    let result = backend.execute(&circuit, 1000).unwrap();
    let zeros = "0".repeat(30);
    let ones = "1".repeat(30);
    assert_eq!(result.counts.get(&zeros) + result.counts.get(&ones), 1000);
    assert_eq!(result.counts.len(), 2);
}

#[test]
fn grover_two_qubits_finds_marked_item() {
    let backend = SimulatorBackend::new();
    for marked in 0..4 {
        let state = backend
            .execute_to_state(&library::grover(2, marked).unwrap())
            .unwrap();
        let p = state.probability(marked as i64).unwrap();
        assert!((p - 1.0).abs() < 1e-10, "marked {marked}: p = {p}");
    }
}

#[test]
fn grover_three_qubits_amplifies_marked_item() {
    let backend = SimulatorBackend::new();
    for marked in 0..8 {
        let state = backend
            .execute_to_state(&library::grover(3, marked).unwrap())
            .unwrap();
        assert!(state.probability(marked as i64).unwrap() > 0.9);
    }
}

#[test]
fn cancelled_execution_returns_cancelled() {
    let backend = SimulatorBackend::new();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let circuit = library::qft(4).unwrap();
    assert_eq!(
        backend.execute_with_cancel(&circuit, 100, &cancel),
        Err(HalError::Cancelled)
    );
}

#[test]
fn capacity_error_names_both_numbers() {
    let backend = SimulatorBackend::new();
    let err = backend.execute(&Circuit::new(17), 1).unwrap_err();
    assert_eq!(
        err,
        HalError::Capacity {
            requested: 17,
            max: 16
        }
    );
    let msg = err.to_string();
    assert!(msg.contains("17") && msg.contains("16"));
}

#[test]
fn apply_operation_folds_like_execute() {
    let backend = SimulatorBackend::new();
    let circuit = library::ghz(3).unwrap().t(QubitId(1)).unwrap();
    let mut state = backend.initialize_state(3).unwrap();
    for inst in circuit.instructions() {
        state = backend.apply_operation(inst, state).unwrap();
    }
    assert!(state.approx_eq(&backend.execute_to_state(&circuit).unwrap()));

    let s = std::f64::consts::FRAC_1_SQRT_2;
    let expected: QuantumState = Statevector::from_amplitudes(vec![
        Complex64::new(s, 0.0),
        Complex64::new(0.0, 0.0),
        Complex64::new(0.0, 0.0),
        Complex64::new(0.0, 0.0),
        Complex64::new(0.0, 0.0),
        Complex64::new(0.0, 0.0),
        Complex64::new(0.0, 0.0),
        Complex64::from_polar(s, PI / 4.0),
    ])
    .unwrap()
    .into();
    assert!(state.approx_eq(&expected));
}

#[tokio::test]
async fn async_matches_sync() {
    let backend = SimulatorBackend::new().with_seed(31);
    let circuit = library::qft(3).unwrap().measure_all().unwrap();

    let sync = backend.execute(&circuit, 2000).unwrap();
    let asynchronous = backend.execute_async(&circuit, 2000).await.unwrap();
    assert_eq!(sync.counts, asynchronous.counts);
    assert_eq!(sync.gate_count, asynchronous.gate_count);

    let state = backend.execute_to_state_async(&circuit).await.unwrap();
    assert!(state.approx_eq(&backend.execute_to_state(&circuit).unwrap()));
}

#[tokio::test]
async fn concurrent_executions_are_independent() {
    let backend = SimulatorBackend::new().with_seed(8);
    let circuit = library::ghz(6).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let backend = backend.clone();
            let circuit = circuit.clone();
            tokio::spawn(async move { backend.execute_async(&circuit, 1500).await })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }
    for r in &results[1..] {
        assert_eq!(r.counts, results[0].counts);
    }
}
