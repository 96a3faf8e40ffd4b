// tests/graph_tests.rs

// Algebraic properties of the public graph engine: the diagram arithmetic
// must behave like the linear algebra it stands for, and identical
// constructions must land on identical edges.

use qmdd::{
    CircuitBuilder, ComplexTable, Control, Gate, NormalizationRule, QmddEngine, QmddError,
    Simulator,
};

fn engine(n: u32) -> QmddEngine {
    QmddEngine::new(n, NormalizationRule::FirstNonzero).unwrap()
}

#[test]
fn matrix_products_associate() -> Result<(), QmddError> {
    let mut eng = engine(2);
    let h0 = eng.gate(Gate::H.matrix(), 0, &[])?;
    let cx = eng.gate(Gate::X.matrix(), 1, &[Control::new(0, true)])?;
    let z1 = eng.gate(Gate::Z.matrix(), 1, &[])?;

    let left = eng.multiply_matrix(h0, cx)?;
    let left = eng.multiply_matrix(left, z1)?;
    let right = eng.multiply_matrix(cx, z1)?;
    let right = eng.multiply_matrix(h0, right)?;
    assert_eq!(left, right);
    Ok(())
}

#[test]
fn application_distributes_over_addition() -> Result<(), QmddError> {
    let mut eng = engine(3);
    let cx = eng.gate(Gate::X.matrix(), 2, &[Control::new(0, true)])?;
    let u = eng.basis_state(0b001)?;
    let v = eng.basis_state(0b110)?;

    let sum = eng.add(u, v)?;
    let applied_sum = eng.multiply_vector(cx, sum)?;
    let mu = eng.multiply_vector(cx, u)?;
    let mv = eng.multiply_vector(cx, v)?;
    let sum_applied = eng.add(mu, mv)?;
    assert_eq!(applied_sum, sum_applied);
    Ok(())
}

#[test]
fn a_parallel_layer_equals_its_sequential_product() -> Result<(), QmddError> {
    let mut eng = engine(4);
    let layer = eng.parallel(&[
        (Gate::X.matrix(), 0),
        (Gate::H.matrix(), 1),
        (Gate::S.matrix(), 3),
    ])?;

    let x0 = eng.gate(Gate::X.matrix(), 0, &[])?;
    let h1 = eng.gate(Gate::H.matrix(), 1, &[])?;
    let s3 = eng.gate(Gate::S.matrix(), 3, &[])?;
    let product = eng.multiply_matrix(x0, h1)?;
    let product = eng.multiply_matrix(product, s3)?;

    assert_eq!(layer, product);
    Ok(())
}

#[test]
fn independent_sessions_build_identical_diagrams() -> Result<(), QmddError> {
    let circuit = CircuitBuilder::new(3).h(0).cx(0, 1).t(1).cx(1, 2).build()?;
    let simulator = Simulator::new();
    let first = simulator.run(&circuit)?;
    let second = simulator.run(&circuit)?;
    // Construction order is deterministic, so even the raw arena indices of
    // the two sessions line up.
    assert_eq!(first.root(), second.root());
    assert_eq!(first.engine().node_count(), second.engine().node_count());
    Ok(())
}

#[test]
fn a_triply_controlled_flip_touches_exactly_one_basis_state() -> Result<(), QmddError> {
    let mut eng = engine(4);
    let controls = [Control::new(0, true), Control::new(1, true), Control::new(2, true)];
    let mcx = eng.gate(Gate::X.matrix(), 3, &controls)?;

    for input in 0u64..16 {
        let expected = if input & 0b0111 == 0b0111 { input ^ 0b1000 } else { input };
        let state = eng.basis_state(input)?;
        let mapped = eng.multiply_vector(mcx, state)?;
        assert_eq!(mapped, eng.basis_state(expected)?, "input {:04b}", input);
    }
    Ok(())
}

#[test]
fn shared_structure_keeps_wide_states_small() -> Result<(), QmddError> {
    // A 16-qubit GHZ state needs 2^16 dense amplitudes but only a node per
    // level and branch in the diagram.
    let width = 16;
    let mut builder = CircuitBuilder::new(width).h(0);
    for qubit in 0..width - 1 {
        builder = builder.cx(qubit, qubit + 1);
    }
    let run = Simulator::new().run(&builder.build()?)?;
    assert!(
        run.engine().node_count() < 500,
        "GHZ diagram grew to {} nodes",
        run.engine().node_count()
    );

    let amplitudes: Vec<_> = run.statevector(4)?.collect();
    assert_eq!(amplitudes.len(), 2);
    Ok(())
}

#[test]
fn engine_weights_are_plain_table_indices() -> Result<(), QmddError> {
    let mut eng = engine(1);
    let h = eng.gate(Gate::H.matrix(), 0, &[])?;
    // The Hadamard's normalization factor is the interned 1/√2.
    assert_eq!(h.weight, ComplexTable::ONE_OVER_SQRT_2);
    assert_eq!(eng.complex().re(h.weight)?, std::f64::consts::FRAC_1_SQRT_2);
    Ok(())
}
