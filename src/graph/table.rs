// src/graph/table.rs

//! The unique table: hash-consing for decision-diagram nodes.

use rustc_hash::FxHashMap;

use super::node::{NodeEdges, NodeId};

/// Maps a node's canonical key (its decision variable plus the exact
/// outgoing-edge signature) to the one interned node carrying it.
///
/// Because edge weights are interned complex indices and destinations are
/// node ids, structural equality of keys is mathematical equality of the
/// represented tensors (up to the active normalization rule), which is what
/// makes the diagram canonical.
#[derive(Debug, Default)]
pub(crate) struct NodeTable {
    unique: FxHashMap<(u32, NodeEdges), NodeId>,
}

impl NodeTable {
    pub(crate) fn new() -> Self {
        Self { unique: FxHashMap::default() }
    }

    /// Looks up an interned node for this key.
    pub(crate) fn lookup(&self, var: u32, edges: &NodeEdges) -> Option<NodeId> {
        self.unique.get(&(var, *edges)).copied()
    }

    /// Records a freshly interned node under its key.
    pub(crate) fn record(&mut self, var: u32, edges: NodeEdges, id: NodeId) {
        let previous = self.unique.insert((var, edges), id);
        debug_assert!(previous.is_none(), "node key interned twice");
    }

    /// Number of interned nodes.
    pub(crate) fn len(&self) -> usize {
        self.unique.len()
    }

    /// Drops every entry.
    pub(crate) fn clear(&mut self) {
        self.unique.clear();
    }
}
