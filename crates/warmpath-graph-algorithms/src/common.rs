//! Shared utilities for graph algorithms
//!
//! Provides a read-only, compact view of a weighted relationship graph for
//! path discovery.

use std::collections::HashMap;

/// Node identifier type (opaque entity id)
pub type NodeId = String;

/// One outgoing edge as seen from its source node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutEdge<'a> {
    /// Dense index of the target node
    pub target: usize,
    /// Relationship strength in [0, 1]
    pub strength: f64,
    /// Relationship kind (e.g. "portfolio_connection")
    pub kind: &'a str,
}

/// A dense, integer-indexed view of a directed, weighted multigraph using
/// Compressed Sparse Row (CSR) format.
///
/// Outgoing edges of every node keep the order in which they were added to the
/// builder. Path discovery explores edges in exactly that order.
#[derive(Debug, Clone, Default)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// Offsets into `out_targets`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<usize>,
    /// Edge strengths: aligned with `out_targets`
    pub strengths: Vec<f64>,
    /// Edge kinds as indices into `kinds`: aligned with `out_targets`
    pub out_kinds: Vec<usize>,
    /// Interned kind names
    pub kinds: Vec<String>,
}

impl GraphView {
    /// Build a view straight from `(source, target, kind, strength)` tuples.
    pub fn from_edges<I, S>(edges: I) -> Self
    where
        I: IntoIterator<Item = (S, S, S, f64)>,
        S: AsRef<str>,
    {
        let mut builder = GraphViewBuilder::new();
        for (source, target, kind, strength) in edges {
            builder.add_edge(source.as_ref(), target.as_ref(), kind.as_ref(), strength);
        }
        builder.build()
    }

    /// Number of directed edges in the view
    pub fn edge_count(&self) -> usize {
        self.out_targets.len()
    }

    /// Dense index of a node, if the node appears in any edge
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.node_to_index.get(id).copied()
    }

    /// NodeId for a dense index
    pub fn node_id(&self, idx: usize) -> &str {
        &self.index_to_node[idx]
    }

    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: usize) -> &[usize] {
        &self.out_targets[self.out_offsets[idx]..self.out_offsets[idx + 1]]
    }

    /// Get strengths for outgoing edges of a node
    pub fn strengths(&self, idx: usize) -> &[f64] {
        &self.strengths[self.out_offsets[idx]..self.out_offsets[idx + 1]]
    }

    /// Iterate the outgoing edges of a node in insertion order
    pub fn out_edges(&self, idx: usize) -> impl Iterator<Item = OutEdge<'_>> + '_ {
        (self.out_offsets[idx]..self.out_offsets[idx + 1]).map(move |e| OutEdge {
            target: self.out_targets[e],
            strength: self.strengths[e],
            kind: &self.kinds[self.out_kinds[e]],
        })
    }
}

/// Incrementally assembles a [`GraphView`].
///
/// Node indices are assigned in order of first appearance, either through
/// [`add_node`](Self::add_node) or as an edge endpoint.
#[derive(Debug, Default)]
pub struct GraphViewBuilder {
    index_to_node: Vec<NodeId>,
    node_to_index: HashMap<NodeId, usize>,
    /// index -> vec![(target_index, strength, kind_index)]
    outgoing: Vec<Vec<(usize, f64, usize)>>,
    kinds: Vec<String>,
    kind_index: HashMap<String, usize>,
    edge_count: usize,
}

impl GraphViewBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node without edges, returning its dense index.
    pub fn add_node(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.node_to_index.get(id) {
            return idx;
        }
        let idx = self.index_to_node.len();
        self.index_to_node.push(id.to_string());
        self.node_to_index.insert(id.to_string(), idx);
        self.outgoing.push(Vec::new());
        idx
    }

    /// Append one directed edge.
    pub fn add_edge(&mut self, source: &str, target: &str, kind: &str, strength: f64) -> &mut Self {
        let u = self.add_node(source);
        let v = self.add_node(target);
        let k = self.intern_kind(kind);
        self.outgoing[u].push((v, strength, k));
        self.edge_count += 1;
        self
    }

    fn intern_kind(&mut self, kind: &str) -> usize {
        if let Some(&k) = self.kind_index.get(kind) {
            return k;
        }
        let k = self.kinds.len();
        self.kinds.push(kind.to_string());
        self.kind_index.insert(kind.to_string(), k);
        k
    }

    /// Freeze into CSR form.
    pub fn build(self) -> GraphView {
        let node_count = self.index_to_node.len();
        let mut out_offsets = Vec::with_capacity(node_count + 1);
        let mut out_targets = Vec::with_capacity(self.edge_count);
        let mut strengths = Vec::with_capacity(self.edge_count);
        let mut out_kinds = Vec::with_capacity(self.edge_count);

        out_offsets.push(0);
        for row in self.outgoing {
            for (target, strength, kind) in row {
                out_targets.push(target);
                strengths.push(strength);
                out_kinds.push(kind);
            }
            out_offsets.push(out_targets.len());
        }

        GraphView {
            node_count,
            index_to_node: self.index_to_node,
            node_to_index: self.node_to_index,
            out_offsets,
            out_targets,
            strengths,
            out_kinds,
            kinds: self.kinds,
        }
    }
}
