// src/simulation/weak.rs

//! Weak simulation: shot-based sampling from the induced distribution.
//!
//! Each shot walks the vector diagram from the root to the terminal. At a
//! node, child `i` is taken with probability `pᵢ / (p₀ + p₁)`, where `pᵢ`
//! combines the child's stored selection mass, the squared magnitude of the
//! edge weight, and the width of any elided levels the edge jumps over;
//! bits for elided levels are uniform by construction and drawn directly.
//! The reported amplitude is the exact product of the taken edge weights.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::core::{ComplexTable, QmddError};
use crate::graph::engine::QmddEngine;
use crate::graph::node::{Edge, NodeEdges};

use super::results::SamplingResult;

/// Samples `shots` basis states from the state behind `root`.
///
/// Determinism is controlled entirely by the seed; when the caller supplies
/// none, one is drawn from the process generator and recorded in the result.
pub(crate) fn sample(
    engine: &mut QmddEngine,
    root: Edge,
    shots: u64,
    seed: Option<u64>,
) -> Result<SamplingResult, QmddError> {
    if shots == 0 {
        return Err(QmddError::InvalidShots { shots });
    }
    if root.weight == ComplexTable::ZERO {
        return Err(QmddError::ZeroEdge);
    }
    if root.node == engine.terminal() {
        return Err(QmddError::TerminalEdge);
    }

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);
    let num_qubits = engine.num_qubits();
    let mut result = SamplingResult::new(seed, shots);

    for _ in 0..shots {
        let mut bits = vec![false; num_qubits as usize];
        let mut amp = root.weight;

        // Levels the entry edge skips hold uniform amplitude.
        for q in 0..engine.variable(root.node) {
            bits[q as usize] = rng.random();
        }

        let mut current = root.node;
        loop {
            let node = engine.node(current);
            let var = node.var;
            let children = match node.edges {
                NodeEdges::Terminal => break,
                NodeEdges::Vector(children) => children,
                NodeEdges::Matrix(_) => unreachable!("sampling over a matrix diagram"),
            };

            let p0 = branch_mass(engine, var, children[0]);
            let p1 = branch_mass(engine, var, children[1]);
            let total = p0 + p1;
            assert!(total > 0.0, "vector node with no selectable branch");

            let chosen = if rng.random::<f64>() * total < p0 { 0 } else { 1 };
            bits[var as usize] = chosen == 1;
            let edge = children[chosen];
            amp = engine.complex_mut().mul(amp, edge.weight)?;

            for q in var + 1..engine.variable(edge.node) {
                bits[q as usize] = rng.random();
            }
            current = edge.node;
        }

        let state: String = (0..num_qubits)
            .rev()
            .map(|q| if bits[q as usize] { '1' } else { '0' })
            .collect();
        let re = engine.complex().re(amp)?;
        let im = engine.complex().im(amp)?;
        result.record(state, re, im);
    }
    Ok(result)
}

/// Selection mass of one branch: `2^skip · child.prob · |weight|²`, zero for
/// a dead edge.
fn branch_mass(engine: &QmddEngine, var: u32, edge: Edge) -> f64 {
    if edge.weight == ComplexTable::ZERO {
        return 0.0;
    }
    let skip = engine.variable(edge.node) - var - 1;
    let width = (1u64 << skip) as f64;
    width * engine.node(edge.node).prob * engine.complex().val(edge.weight).mag2()
}
