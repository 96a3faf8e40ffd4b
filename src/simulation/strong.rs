// src/simulation/strong.rs

//! Strong simulation: lazy enumeration of every nonzero amplitude.
//!
//! The enumeration is a preorder depth-first walk over the vector diagram,
//! driven by the caller one element at a time. The walk keeps an explicit
//! stack so circuit depth never turns into call-stack depth, and an edge
//! that skips levels expands into every combination of the missing bits.

use num_complex::Complex;
use num_traits::Zero;

use crate::core::{ComplexTable, QmddError};
use crate::graph::engine::QmddEngine;
use crate::graph::node::{Edge, NodeEdges, NodeId};

use super::results::Amplitude;

/// One pending branch of the walk: a node, the amplitude accumulated along
/// the edges taken to reach it, and the bits decided so far (deepest qubit
/// leftmost).
struct Frame {
    node: NodeId,
    amp: Complex<f64>,
    state: String,
}

/// Lazy iterator over the nonzero amplitudes of a simulated state.
///
/// Yields at most `2^n` elements in a deterministic preorder; the sequence
/// is not restartable. Created by
/// [`SimulationRun::statevector`](super::SimulationRun::statevector).
pub struct StatevectorIter<'a> {
    engine: &'a QmddEngine,
    stack: Vec<Frame>,
    scale: f64,
}

impl<'a> StatevectorIter<'a> {
    pub(crate) fn new(
        engine: &'a QmddEngine,
        root: Edge,
        decimals: u32,
    ) -> Result<Self, QmddError> {
        if decimals > 10 {
            return Err(QmddError::InvalidPrecision { decimals });
        }
        if root.weight == ComplexTable::ZERO {
            return Err(QmddError::ZeroEdge);
        }
        if root.node == engine.terminal() {
            return Err(QmddError::TerminalEdge);
        }
        let mut stack = Vec::new();
        let amp = engine.complex().val(root.weight).to_complex();
        // The entry edge may itself skip the shallowest qubits.
        push_expanded(&mut stack, root.node, amp, String::new(), engine.variable(root.node));
        Ok(Self { engine, stack, scale: 10f64.powi(decimals as i32) })
    }

    fn round(&self, x: f64) -> f64 {
        let rounded = (x * self.scale).round() / self.scale;
        // Avoid the -0.0 artifact on sign-flipped dust.
        if rounded == 0.0 { 0.0 } else { rounded }
    }
}

impl Iterator for StatevectorIter<'_> {
    type Item = Amplitude;

    fn next(&mut self) -> Option<Amplitude> {
        let engine = self.engine;
        while let Some(frame) = self.stack.pop() {
            let node = engine.node(frame.node);
            let children = match node.edges {
                NodeEdges::Terminal => {
                    return Some(Amplitude {
                        state: frame.state,
                        re: self.round(frame.amp.re),
                        im: self.round(frame.amp.im),
                    });
                }
                NodeEdges::Vector(children) => children,
                NodeEdges::Matrix(_) => {
                    unreachable!("statevector enumeration over a matrix diagram")
                }
            };
            let var = node.var;
            // Push the |1⟩ branch first so the |0⟩ path is explored first.
            for bit in [1usize, 0] {
                let edge = children[bit];
                if edge.weight == ComplexTable::ZERO {
                    continue;
                }
                let amp = frame.amp * engine.complex().val(edge.weight).to_complex();
                let state = format!("{}{}", bit, frame.state);
                let skip = engine.variable(edge.node) - var - 1;
                push_expanded(&mut self.stack, edge.node, amp, state, skip);
            }
        }
        None
    }
}

/// Pushes `dest` onto the stack once per combination of the `skip` missing
/// bits between the decided prefix and the destination's level.
///
/// Combinations go on the stack in descending order so they pop in
/// ascending order, keeping the overall enumeration a stable preorder.
fn push_expanded(
    stack: &mut Vec<Frame>,
    dest: NodeId,
    amp: Complex<f64>,
    state: String,
    skip: u32,
) {
    if amp.is_zero() {
        return;
    }
    if skip == 0 {
        stack.push(Frame { node: dest, amp, state });
        return;
    }
    for missing in (0..(1u64 << skip)).rev() {
        let state = format!("{:0width$b}{}", missing, state, width = skip as usize);
        stack.push(Frame { node: dest, amp, state });
    }
}
