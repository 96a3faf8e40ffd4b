// src/graph/engine.rs

//! The decision-diagram engine: node construction with normalization and
//! reduction, memoized addition and multiplication, and the ground-state and
//! gate-matrix constructors.
//!
//! One engine is one simulation session. It owns the complex table, the node
//! arena, the unique table and all operation caches; everything it hands out
//! is an index into those arenas, so results are cheap to copy, compare and
//! hash. Tables only ever grow during a session; [`QmddEngine::reset`] voids
//! them and reseeds the well-known constants.

use rustc_hash::FxHashMap;

use crate::core::{ComplexId, ComplexTable, QmddError};
use crate::operations::Control;

use super::node::{Edge, Node, NodeEdges, NodeId};
use super::table::NodeTable;

/// Edge-weight normalization rule, fixed once per session.
///
/// Mixing rules within one graph breaks canonicity, so the engine takes the
/// rule at construction and never exposes a way to change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizationRule {
    /// Divide all outgoing weights by the first nonzero weight.
    #[default]
    FirstNonzero,
    /// Divide all outgoing weights by the first weight of maximal
    /// squared magnitude.
    LargestMagnitude,
}

/// Node rank at a recursion level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rank {
    Vector,
    Matrix,
}

/// A decision-diagram session over a fixed number of qubits.
///
/// Qubit 0 is the root side of the diagram; larger qubit indices lie deeper,
/// and the terminal node sits below them all at `var = n`. An edge whose
/// destination skips levels stands for a scaled identity (matrix side) or a
/// duplicated branch (vector side); the factory's reduction rules produce
/// such edges and every operation understands them.
#[derive(Debug)]
pub struct QmddEngine {
    num_qubits: u32,
    rule: NormalizationRule,
    complex: ComplexTable,
    nodes: Vec<Node>,
    table: NodeTable,
    add_cache: FxHashMap<(NodeId, NodeId, ComplexId, ComplexId), Edge>,
    matvec_cache: FxHashMap<(NodeId, ComplexId, NodeId, ComplexId), Edge>,
    matmat_cache: FxHashMap<(NodeId, ComplexId, NodeId, ComplexId), Edge>,
}

impl QmddEngine {
    /// Creates a session for `num_qubits` qubits under the given
    /// normalization rule.
    pub fn new(num_qubits: u32, rule: NormalizationRule) -> Result<Self, QmddError> {
        if num_qubits == 0 || num_qubits > 63 {
            return Err(QmddError::InvalidQubitCount { count: num_qubits as u64 });
        }
        let mut engine = Self {
            num_qubits,
            rule,
            complex: ComplexTable::new(),
            nodes: Vec::new(),
            table: NodeTable::new(),
            add_cache: FxHashMap::default(),
            matvec_cache: FxHashMap::default(),
            matmat_cache: FxHashMap::default(),
        };
        engine.seed_terminal();
        Ok(engine)
    }

    fn seed_terminal(&mut self) {
        // The terminal lives one level past the last qubit, deeper than any
        // real node, and carries unit selection mass.
        self.nodes.push(Node {
            var: self.num_qubits,
            edges: NodeEdges::Terminal,
            prob: 1.0,
        });
    }

    /// Voids every table and cache and reseeds the constants, returning the
    /// session to its freshly constructed state.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.table.clear();
        self.add_cache.clear();
        self.matvec_cache.clear();
        self.matmat_cache.clear();
        self.complex.reset();
        self.seed_terminal();
    }

    /// Number of qubits in this session.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The active normalization rule.
    pub fn rule(&self) -> NormalizationRule {
        self.rule
    }

    /// The terminal node.
    pub fn terminal(&self) -> NodeId {
        NodeId(0)
    }

    /// The zero edge: weight zero into the terminal.
    pub fn zero_edge(&self) -> Edge {
        Edge { node: self.terminal(), weight: ComplexTable::ZERO }
    }

    /// Weight-one edge into the terminal; as a matrix this is the identity.
    fn unit_edge(&self) -> Edge {
        Edge { node: self.terminal(), weight: ComplexTable::ONE }
    }

    /// Read access to the session's complex table.
    pub fn complex(&self) -> &ComplexTable {
        &self.complex
    }

    /// Write access to the session's complex table.
    pub fn complex_mut(&mut self) -> &mut ComplexTable {
        &mut self.complex
    }

    /// Number of nodes in the arena, terminal included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Decision variable of a node; the terminal reports `num_qubits`.
    pub fn variable(&self, id: NodeId) -> u32 {
        self.nodes[id.idx()].var
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.idx()]
    }

    // --- Node factory ---

    /// Normalizes edge weights in place per the active rule and returns the
    /// extracted factor, or zero if every weight is zero.
    fn normalize(&mut self, edges: &mut [Edge]) -> Result<ComplexId, QmddError> {
        // Zero-weight edges are canonicalized onto the terminal so the
        // unique-table key is independent of where a dead branch pointed.
        for edge in edges.iter_mut() {
            if edge.weight == ComplexTable::ZERO {
                *edge = self.zero_edge();
            }
        }
        let pivot = match self.rule {
            NormalizationRule::FirstNonzero => {
                edges.iter().position(|e| e.weight != ComplexTable::ZERO)
            }
            NormalizationRule::LargestMagnitude => {
                let mut best: Option<(usize, f64)> = None;
                for (i, edge) in edges.iter().enumerate() {
                    if edge.weight == ComplexTable::ZERO {
                        continue;
                    }
                    let mag = self.complex.mag2(edge.weight)?;
                    if best.is_none_or(|(_, best_mag)| mag > best_mag) {
                        best = Some((i, mag));
                    }
                }
                best.map(|(i, _)| i)
            }
        };
        let Some(pivot) = pivot else {
            return Ok(ComplexTable::ZERO);
        };
        let factor = edges[pivot].weight;
        for edge in edges.iter_mut() {
            edge.weight = self.complex.div(edge.weight, factor)?;
        }
        Ok(factor)
    }

    /// Builds a vector node at `var`, returning the edge into it.
    ///
    /// The returned weight is the normalization factor extracted from the
    /// given edges. A node whose two normalized edges coincide is elided:
    /// the shared destination is returned directly and the skipped level
    /// stands for the duplicated branch.
    pub fn make_vector_node(&mut self, var: u32, mut edges: [Edge; 2]) -> Result<Edge, QmddError> {
        debug_assert!(var < self.num_qubits, "vector node beyond the register");
        let factor = self.normalize(&mut edges)?;
        if factor == ComplexTable::ZERO {
            return Ok(self.zero_edge());
        }
        if edges[0] == edges[1] {
            return Ok(Edge { node: edges[0].node, weight: factor });
        }
        let node = self.intern(var, NodeEdges::Vector(edges));
        Ok(Edge { node, weight: factor })
    }

    /// Builds a matrix node at `var`, returning the edge into it.
    ///
    /// The returned weight is the normalization factor. A node of the shape
    /// `(w, 0, 0, w)` with a shared diagonal destination is a scaled
    /// identity at this level and is elided onto that destination; chained,
    /// this bubbles identity scalars all the way up, so a whole identity
    /// branch reduces to a weighted edge into the terminal.
    pub fn make_matrix_node(&mut self, var: u32, mut edges: [Edge; 4]) -> Result<Edge, QmddError> {
        debug_assert!(var < self.num_qubits, "matrix node beyond the register");
        let factor = self.normalize(&mut edges)?;
        if factor == ComplexTable::ZERO {
            return Ok(self.zero_edge());
        }
        if edges[1].weight == ComplexTable::ZERO
            && edges[2].weight == ComplexTable::ZERO
            && edges[0] == edges[3]
            && edges[0].weight != ComplexTable::ZERO
        {
            return Ok(Edge { node: edges[0].node, weight: factor });
        }
        let node = self.intern(var, NodeEdges::Matrix(edges));
        Ok(Edge { node, weight: factor })
    }

    fn intern(&mut self, var: u32, edges: NodeEdges) -> NodeId {
        if let Some(id) = self.table.lookup(var, &edges) {
            return id;
        }
        let prob = self.selection_mass(var, &edges);
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { var, edges, prob });
        self.table.record(var, edges, id);
        id
    }

    /// Selection mass of a fresh node: the sum over outgoing edges of
    /// `2^skip · child.prob · |weight|²`, where `skip` counts the levels the
    /// edge jumps over (an elided branch stands for `2^skip` identical
    /// sub-branches, each contributing the same mass).
    fn selection_mass(&self, var: u32, edges: &NodeEdges) -> f64 {
        let children: &[Edge] = match edges {
            NodeEdges::Terminal => return 1.0,
            NodeEdges::Vector(children) => children,
            NodeEdges::Matrix(children) => children,
        };
        let mut mass = 0.0;
        for edge in children {
            if edge.weight == ComplexTable::ZERO {
                continue;
            }
            let skip = self.nodes[edge.node.idx()].var - var - 1;
            let width = (1u64 << skip) as f64;
            mass += width * self.nodes[edge.node.idx()].prob * self.complex.val(edge.weight).mag2();
        }
        mass
    }

    // --- State and operator constructors ---

    /// The `|0…0⟩` state: a chain of vector nodes, each sending its |0⟩ edge
    /// to the next level and its |1⟩ edge to zero, from qubit `n−1` up to
    /// qubit 0.
    pub fn ground_state(&mut self) -> Result<Edge, QmddError> {
        let mut edge = self.unit_edge();
        for qubit in (0..self.num_qubits).rev() {
            let zero = self.zero_edge();
            edge = self.make_vector_node(qubit, [edge, zero])?;
        }
        Ok(edge)
    }

    /// A basis state `|bits⟩`, with bit `q` of `bits` giving qubit `q`.
    pub fn basis_state(&mut self, bits: u64) -> Result<Edge, QmddError> {
        debug_assert!(bits < (1u64 << self.num_qubits));
        let mut edge = self.unit_edge();
        for qubit in (0..self.num_qubits).rev() {
            let zero = self.zero_edge();
            let pair = if (bits >> qubit) & 1 == 0 { [edge, zero] } else { [zero, edge] };
            edge = self.make_vector_node(qubit, pair)?;
        }
        Ok(edge)
    }

    /// Builds the operator for a single gate on `target`, conditioned on any
    /// number of controls.
    ///
    /// `matrix` is the gate's 2×2 in row-major order. Controls deeper than
    /// the target wrap each quadrant edge in a projector node: the activator
    /// quadrant keeps the quadrant's value, the anti-activator carries the
    /// identity's entry for that quadrant (1 on the diagonal, 0 off it).
    /// Controls above the target wrap the finished root: activator into the
    /// root, anti-activator into the identity. Untouched qubits are skipped
    /// entirely and act as identities.
    pub fn gate(
        &mut self,
        matrix: [ComplexId; 4],
        target: u32,
        controls: &[Control],
    ) -> Result<Edge, QmddError> {
        debug_assert!(target < self.num_qubits);
        debug_assert!(controls.iter().all(|c| c.qubit < self.num_qubits && c.qubit != target));

        let terminal = self.terminal();
        let mut quadrants: [Edge; 4] =
            matrix.map(|entry| Edge { node: terminal, weight: entry });
        for q in &mut quadrants {
            if q.weight == ComplexTable::ZERO {
                *q = self.zero_edge();
            }
        }

        // Deeper controls first, so each wrap lands directly below the next.
        let mut below: Vec<&Control> = controls.iter().filter(|c| c.qubit > target).collect();
        below.sort_by_key(|c| std::cmp::Reverse(c.qubit));
        for control in below {
            for index in 0..4 {
                let (row, col) = (index >> 1, index & 1);
                let mut edges = [self.zero_edge(); 4];
                edges[control.activator()] = quadrants[index];
                if row == col {
                    edges[control.antiactivator()] = self.unit_edge();
                }
                quadrants[index] = self.make_matrix_node(control.qubit, edges)?;
            }
        }

        let mut root = self.make_matrix_node(target, quadrants)?;

        let mut above: Vec<&Control> = controls.iter().filter(|c| c.qubit < target).collect();
        above.sort_by_key(|c| std::cmp::Reverse(c.qubit));
        for control in above {
            let mut edges = [self.zero_edge(); 4];
            edges[control.activator()] = root;
            edges[control.antiactivator()] = self.unit_edge();
            root = self.make_matrix_node(control.qubit, edges)?;
        }
        Ok(root)
    }

    /// Builds one operator for an uncontrolled parallel layer: 2×2 gates on
    /// distinct qubits, tensored bottom-up into a single matrix diagram.
    pub fn parallel(&mut self, parts: &[([ComplexId; 4], u32)]) -> Result<Edge, QmddError> {
        debug_assert!(!parts.is_empty());
        let mut order: Vec<usize> = (0..parts.len()).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(parts[i].1));
        let mut edge = self.unit_edge();
        for i in order {
            let (matrix, qubit) = parts[i];
            debug_assert!(qubit < self.num_qubits);
            let mut edges = [self.zero_edge(); 4];
            for (slot, entry) in edges.iter_mut().zip(matrix) {
                let weight = self.complex.mul(edge.weight, entry)?;
                if weight != ComplexTable::ZERO {
                    *slot = Edge { node: edge.node, weight };
                }
            }
            edge = self.make_matrix_node(qubit, edges)?;
        }
        Ok(edge)
    }

    // --- Memoized graph arithmetic ---

    /// Sum of two equal-rank edges.
    pub fn add(&mut self, e0: Edge, e1: Edge) -> Result<Edge, QmddError> {
        if e0.weight == ComplexTable::ZERO {
            return Ok(e1);
        }
        if e1.weight == ComplexTable::ZERO {
            return Ok(e0);
        }
        if e0.node == e1.node {
            let weight = self.complex.add(e0.weight, e1.weight)?;
            if weight == ComplexTable::ZERO {
                return Ok(self.zero_edge());
            }
            return Ok(Edge { node: e0.node, weight });
        }
        // Addition commutes; canonicalize the key on node-id order.
        let (lo, hi) = if e0.node <= e1.node { (e0, e1) } else { (e1, e0) };
        let key = (lo.node, hi.node, lo.weight, hi.weight);
        if let Some(&hit) = self.add_cache.get(&key) {
            return Ok(hit);
        }

        let level = self.variable(e0.node).min(self.variable(e1.node));
        let result = match self.rank_at(e0.node, e1.node, level) {
            Rank::Vector => {
                let mut out = [self.zero_edge(); 2];
                for (q, slot) in out.iter_mut().enumerate() {
                    let c0 = self.vector_child(e0, q, level)?;
                    let c1 = self.vector_child(e1, q, level)?;
                    *slot = self.add(c0, c1)?;
                }
                self.make_vector_node(level, out)?
            }
            Rank::Matrix => {
                let mut out = [self.zero_edge(); 4];
                for (q, slot) in out.iter_mut().enumerate() {
                    let c0 = self.matrix_child(e0, q, level)?;
                    let c1 = self.matrix_child(e1, q, level)?;
                    *slot = self.add(c0, c1)?;
                }
                self.make_matrix_node(level, out)?
            }
        };
        self.add_cache.insert(key, result);
        Ok(result)
    }

    /// Applies a matrix edge to a vector edge.
    pub fn multiply_vector(&mut self, m: Edge, v: Edge) -> Result<Edge, QmddError> {
        if m.weight == ComplexTable::ZERO || v.weight == ComplexTable::ZERO {
            return Ok(self.zero_edge());
        }
        // A terminal matrix edge is a scaled identity over everything below.
        if m.node == self.terminal() {
            let weight = self.complex.mul(m.weight, v.weight)?;
            return Ok(Edge { node: v.node, weight });
        }
        let key = (m.node, m.weight, v.node, v.weight);
        if let Some(&hit) = self.matvec_cache.get(&key) {
            return Ok(hit);
        }

        let level = self.variable(m.node).min(self.variable(v.node));
        let mut out = [self.zero_edge(); 2];
        for (row, slot) in out.iter_mut().enumerate() {
            let mut acc = self.zero_edge();
            for col in 0..2 {
                let me = self.matrix_child(m, 2 * row + col, level)?;
                let ve = self.vector_child(v, col, level)?;
                let term = self.multiply_vector(me, ve)?;
                acc = self.add(acc, term)?;
            }
            *slot = acc;
        }
        let result = self.make_vector_node(level, out)?;
        self.matvec_cache.insert(key, result);
        Ok(result)
    }

    /// Product of two matrix edges (`m` applied after `o`).
    pub fn multiply_matrix(&mut self, m: Edge, o: Edge) -> Result<Edge, QmddError> {
        if m.weight == ComplexTable::ZERO || o.weight == ComplexTable::ZERO {
            return Ok(self.zero_edge());
        }
        if m.node == self.terminal() {
            let weight = self.complex.mul(m.weight, o.weight)?;
            return Ok(Edge { node: o.node, weight });
        }
        if o.node == self.terminal() {
            let weight = self.complex.mul(m.weight, o.weight)?;
            return Ok(Edge { node: m.node, weight });
        }
        let key = (m.node, m.weight, o.node, o.weight);
        if let Some(&hit) = self.matmat_cache.get(&key) {
            return Ok(hit);
        }

        let level = self.variable(m.node).min(self.variable(o.node));
        let mut out = [self.zero_edge(); 4];
        for (index, slot) in out.iter_mut().enumerate() {
            let (row, col) = (index >> 1, index & 1);
            let mut acc = self.zero_edge();
            for k in 0..2 {
                let me = self.matrix_child(m, 2 * row + k, level)?;
                let oe = self.matrix_child(o, 2 * k + col, level)?;
                let term = self.multiply_matrix(me, oe)?;
                acc = self.add(acc, term)?;
            }
            *slot = acc;
        }
        let result = self.make_matrix_node(level, out)?;
        self.matmat_cache.insert(key, result);
        Ok(result)
    }

    // --- Recursion helpers ---

    /// Rank of the recursion at `level`, taken from whichever operand
    /// actually decides that level.
    fn rank_at(&self, n0: NodeId, n1: NodeId, level: u32) -> Rank {
        let pick = |id: NodeId| {
            let node = &self.nodes[id.idx()];
            if node.var != level {
                return None;
            }
            match node.edges {
                NodeEdges::Vector(_) => Some(Rank::Vector),
                NodeEdges::Matrix(_) => Some(Rank::Matrix),
                NodeEdges::Terminal => None,
            }
        };
        match (pick(n0), pick(n1)) {
            (Some(r0), Some(r1)) => {
                assert!(r0 == r1, "addition of edges with incompatible ranks");
                r0
            }
            (Some(rank), None) | (None, Some(rank)) => rank,
            (None, None) => unreachable!("no operand decides level {}", level),
        }
    }

    /// Child `q` of a vector operand at `level`. An operand whose node sits
    /// deeper stands for a duplicated branch: both children inherit the edge
    /// unchanged.
    fn vector_child(&mut self, e: Edge, q: usize, level: u32) -> Result<Edge, QmddError> {
        let node = &self.nodes[e.node.idx()];
        if node.var > level {
            return Ok(e);
        }
        let child = match node.edges {
            NodeEdges::Vector(children) => children[q],
            _ => unreachable!("vector recursion over a non-vector node"),
        };
        if child.weight == ComplexTable::ZERO {
            return Ok(self.zero_edge());
        }
        let weight = self.complex.mul(e.weight, child.weight)?;
        Ok(Edge { node: child.node, weight })
    }

    /// Quadrant `q` of a matrix operand at `level`. An operand whose node
    /// sits deeper is a scaled identity here: diagonal quadrants inherit the
    /// edge, off-diagonal quadrants are zero.
    fn matrix_child(&mut self, e: Edge, q: usize, level: u32) -> Result<Edge, QmddError> {
        let node = &self.nodes[e.node.idx()];
        if node.var > level {
            return Ok(if q == 0 || q == 3 { e } else { self.zero_edge() });
        }
        let child = match node.edges {
            NodeEdges::Matrix(children) => children[q],
            _ => unreachable!("matrix recursion over a non-matrix node"),
        };
        if child.weight == ComplexTable::ZERO {
            return Ok(self.zero_edge());
        }
        let weight = self.complex.mul(e.weight, child.weight)?;
        Ok(Edge { node: child.node, weight })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::Gate;

    fn engine(n: u32) -> QmddEngine {
        QmddEngine::new(n, NormalizationRule::FirstNonzero).unwrap()
    }

    #[test]
    fn rejects_empty_and_oversized_registers() {
        assert!(matches!(
            QmddEngine::new(0, NormalizationRule::FirstNonzero),
            Err(QmddError::InvalidQubitCount { count: 0 })
        ));
        assert!(matches!(
            QmddEngine::new(64, NormalizationRule::FirstNonzero),
            Err(QmddError::InvalidQubitCount { count: 64 })
        ));
    }

    #[test]
    fn interning_the_same_node_twice_is_idempotent() -> Result<(), QmddError> {
        let mut eng = engine(2);
        let unit = Edge { node: eng.terminal(), weight: ComplexTable::ONE };
        let zero = eng.zero_edge();
        let first = eng.make_vector_node(1, [unit, zero])?;
        let second = eng.make_vector_node(1, [unit, zero])?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn identical_operator_constructions_share_the_root() -> Result<(), QmddError> {
        let mut eng = engine(3);
        let controls = [Control::new(0, true)];
        let first = eng.gate(Gate::X.matrix(), 2, &controls)?;
        let second = eng.gate(Gate::X.matrix(), 2, &controls)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn scaled_identity_nodes_collapse_onto_their_destination() -> Result<(), QmddError> {
        let mut eng = engine(2);
        let x1 = eng.gate(Gate::X.matrix(), 1, &[])?;
        let w = eng.complex_mut().intern(crate::core::ComplexValue::new(0, 0, 3, 0, 5));
        let diag = Edge { node: x1.node, weight: w };
        let zero = eng.zero_edge();
        let collapsed = eng.make_matrix_node(0, [diag, zero, zero, diag])?;
        assert_eq!(collapsed, Edge { node: x1.node, weight: w });
        Ok(())
    }

    #[test]
    fn hadamard_squares_to_the_identity() -> Result<(), QmddError> {
        let mut eng = engine(1);
        let h = eng.gate(Gate::H.matrix(), 0, &[])?;
        let hh = eng.multiply_matrix(h, h)?;
        assert_eq!(hh, Edge { node: eng.terminal(), weight: ComplexTable::ONE });
        Ok(())
    }

    #[test]
    fn phase_gates_cancel_against_their_daggers() -> Result<(), QmddError> {
        let mut eng = engine(1);
        let identity = Edge { node: eng.terminal(), weight: ComplexTable::ONE };
        let s = eng.gate(Gate::S.matrix(), 0, &[])?;
        let sdg = eng.gate(Gate::Sdg.matrix(), 0, &[])?;
        assert_eq!(eng.multiply_matrix(s, sdg)?, identity);
        let t = eng.gate(Gate::T.matrix(), 0, &[])?;
        let tdg = eng.gate(Gate::Tdg.matrix(), 0, &[])?;
        assert_eq!(eng.multiply_matrix(t, tdg)?, identity);
        Ok(())
    }

    #[test]
    fn cnot_permutes_the_two_qubit_basis() -> Result<(), QmddError> {
        // Control on qubit 0, target on qubit 1: |q1 q0⟩ mapping
        // 00→00, 01→11, 10→10, 11→01.
        let mut eng = engine(2);
        let cx = eng.gate(Gate::X.matrix(), 1, &[Control::new(0, true)])?;
        for (input, expected) in [(0b00, 0b00), (0b01, 0b11), (0b10, 0b10), (0b11, 0b01)] {
            let state = eng.basis_state(input)?;
            let mapped = eng.multiply_vector(cx, state)?;
            assert_eq!(mapped, eng.basis_state(expected)?, "input {:02b}", input);
        }
        Ok(())
    }

    #[test]
    fn cnot_with_control_below_target_permutes_the_basis() -> Result<(), QmddError> {
        // Control on qubit 1, target on qubit 0: |q1 q0⟩ mapping
        // 00→00, 01→01, 10→11, 11→10.
        let mut eng = engine(2);
        let cx = eng.gate(Gate::X.matrix(), 0, &[Control::new(1, true)])?;
        for (input, expected) in [(0b00, 0b00), (0b01, 0b01), (0b10, 0b11), (0b11, 0b10)] {
            let state = eng.basis_state(input)?;
            let mapped = eng.multiply_vector(cx, state)?;
            assert_eq!(mapped, eng.basis_state(expected)?, "input {:02b}", input);
        }
        Ok(())
    }

    #[test]
    fn negative_controls_activate_on_zero() -> Result<(), QmddError> {
        let mut eng = engine(2);
        let cx = eng.gate(Gate::X.matrix(), 1, &[Control::new(0, false)])?;
        for (input, expected) in [(0b00, 0b10), (0b01, 0b01), (0b10, 0b00), (0b11, 0b11)] {
            let state = eng.basis_state(input)?;
            let mapped = eng.multiply_vector(cx, state)?;
            assert_eq!(mapped, eng.basis_state(expected)?, "input {:02b}", input);
        }
        Ok(())
    }

    #[test]
    fn operators_on_one_qubit_of_a_wide_register_skip_the_rest() -> Result<(), QmddError> {
        for n in [3, 7, 12] {
            let mut eng = engine(n);
            let x = eng.gate(Gate::X.matrix(), 2, &[])?;
            let ground = eng.ground_state()?;
            let flipped = eng.multiply_vector(x, ground)?;
            assert_eq!(flipped, eng.basis_state(0b100)?, "register width {}", n);
        }
        Ok(())
    }

    #[test]
    fn identity_collapse_holds_under_both_rules() -> Result<(), QmddError> {
        for rule in [NormalizationRule::FirstNonzero, NormalizationRule::LargestMagnitude] {
            let mut eng = QmddEngine::new(2, rule)?;
            let h0 = eng.gate(Gate::H.matrix(), 0, &[])?;
            let hh = eng.multiply_matrix(h0, h0)?;
            assert_eq!(hh.node, eng.terminal(), "rule {:?}", rule);
            assert_eq!(hh.weight, ComplexTable::ONE, "rule {:?}", rule);
        }
        Ok(())
    }

    #[test]
    fn largest_magnitude_rule_pivots_on_the_heaviest_weight() -> Result<(), QmddError> {
        let mut eng = QmddEngine::new(1, NormalizationRule::LargestMagnitude)?;
        let small = Edge { node: eng.terminal(), weight: ComplexTable::ONE_OVER_SQRT_2 };
        let unit = Edge { node: eng.terminal(), weight: ComplexTable::NEG_ONE };
        let edge = eng.make_vector_node(0, [small, unit])?;
        // |−1|² > |1/√2|², so the factor is −1 and the |1⟩ slot holds 1.
        assert_eq!(edge.weight, ComplexTable::NEG_ONE);
        match eng.node(edge.node).edges {
            NodeEdges::Vector(children) => {
                assert_eq!(children[1].weight, ComplexTable::ONE);
                assert_eq!(children[0].weight, ComplexTable::NEG_ONE_OVER_SQRT_2);
            }
            _ => panic!("expected a vector node"),
        }
        Ok(())
    }

    #[test]
    fn addition_is_commutative_over_the_cache() -> Result<(), QmddError> {
        let mut eng = engine(2);
        let h0 = eng.gate(Gate::H.matrix(), 0, &[])?;
        let z1 = eng.gate(Gate::Z.matrix(), 1, &[])?;
        assert_eq!(eng.add(h0, z1)?, eng.add(z1, h0)?);
        Ok(())
    }

    #[test]
    fn reset_returns_the_session_to_its_initial_state() -> Result<(), QmddError> {
        let mut eng = engine(2);
        let h = eng.gate(Gate::H.matrix(), 0, &[])?;
        let ground = eng.ground_state()?;
        eng.multiply_vector(h, ground)?;
        assert!(eng.node_count() > 1);
        eng.reset();
        assert_eq!(eng.node_count(), 1);
        assert_eq!(eng.complex().len(), 9);
        // The session is fully usable again after a reset.
        let ground = eng.ground_state()?;
        assert_eq!(ground.weight, ComplexTable::ONE);
        Ok(())
    }
}
