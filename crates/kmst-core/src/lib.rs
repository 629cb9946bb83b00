//! # kmst-core: Graph instances for the k-MST problem
//!
//! Provides the immutable graph representation shared by the formulation,
//! separation and I/O crates.
//!
//! ## Design Philosophy
//!
//! An instance is an **undirected simple graph** stored as an arena
//! (petgraph `UnGraph<NodeId, Edge>`):
//! - **Nodes** carry their external [`NodeId`] (1-based in instance files)
//! - **Edges** carry their external [`EdgeId`] and integer cost
//!
//! Everything the models need at search time is precomputed once when the
//! instance is built and never mutated afterwards:
//! - the directed arc list (two arcs per edge, see [`GraphInstance::arcs`])
//! - per-node incoming/outgoing arc incidence
//! - the id -> index lookup tables
//!
//! Dense indices (`0..node_count`, `0..edge_count`, `0..2*edge_count`) are
//! what the model layer uses; external ids only appear at the I/O boundary
//! and in extracted solutions.
//!
//! ## Quick Start
//!
//! ```rust
//! use kmst_core::GraphBuilder;
//!
//! let graph = GraphBuilder::new()
//!     .nodes(1..=4)
//!     .edge(0, 1, 2, 1)
//!     .edge(1, 2, 3, 1)
//!     .edge(2, 3, 4, 1)
//!     .edge(3, 4, 1, 1)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(graph.node_count(), 4);
//! assert_eq!(graph.arcs().len(), 8);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Unified [`KmstError`] / [`KmstResult`]
//! - [`graph_utils`] - Tree validation and instance statistics

use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

pub mod error;
pub mod graph_utils;

pub use error::{KmstError, KmstResult};
pub use graph_utils::{instance_stats, validate_tree, InfeasibleTree, InstanceStats};
pub use petgraph::graph::{EdgeIndex, NodeIndex};

/// External node identifier as it appears in instance files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

/// External edge identifier as it appears in instance and solution files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(usize);

impl NodeId {
    #[inline]
    pub fn new(value: usize) -> Self {
        NodeId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl EdgeId {
    #[inline]
    pub fn new(value: usize) -> Self {
        EdgeId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Node id reserved for the artificial root of the rooted formulations.
pub const ROOT_NODE_ID: NodeId = NodeId(0);

/// Undirected weighted edge `{source, target}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub cost: u64,
}

impl Edge {
    pub fn new(id: usize, source: usize, target: usize, cost: u64) -> Self {
        Self {
            id: EdgeId::new(id),
            source: NodeId::new(source),
            target: NodeId::new(target),
            cost,
        }
    }
}

/// Directed arc derived from an undirected edge.
///
/// `tail` and `head` are dense node indices, `edge` is the dense edge index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectedArc {
    pub tail: usize,
    pub head: usize,
    pub edge: usize,
}

/// Immutable k-MST instance.
#[derive(Debug, Clone)]
pub struct GraphInstance {
    graph: UnGraph<NodeId, Edge>,
    node_lookup: HashMap<NodeId, usize>,
    edge_lookup: HashMap<EdgeId, usize>,
    arcs: Vec<DirectedArc>,
    incoming: Vec<Vec<usize>>,
    outgoing: Vec<Vec<usize>>,
}

impl GraphInstance {
    /// Build an instance, checking the simple-graph invariants.
    pub fn new(
        nodes: impl IntoIterator<Item = NodeId>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> KmstResult<Self> {
        let mut graph = UnGraph::<NodeId, Edge>::default();
        let mut node_lookup = HashMap::new();
        for node in nodes {
            if node_lookup.contains_key(&node) {
                return Err(KmstError::InvalidGraph(format!("duplicate node id {node}")));
            }
            let index = graph.add_node(node);
            node_lookup.insert(node, index.index());
        }

        let mut edge_lookup = HashMap::new();
        let mut endpoints_seen = HashSet::new();
        for edge in edges {
            if edge.source == edge.target {
                return Err(KmstError::InvalidGraph(format!(
                    "edge {} is a self-loop on node {}",
                    edge.id, edge.source
                )));
            }
            let source = *node_lookup.get(&edge.source).ok_or_else(|| {
                KmstError::InvalidGraph(format!(
                    "edge {} references unknown node {}",
                    edge.id, edge.source
                ))
            })?;
            let target = *node_lookup.get(&edge.target).ok_or_else(|| {
                KmstError::InvalidGraph(format!(
                    "edge {} references unknown node {}",
                    edge.id, edge.target
                ))
            })?;
            if !endpoints_seen.insert((source.min(target), source.max(target))) {
                return Err(KmstError::InvalidGraph(format!(
                    "edge {} is parallel to an existing edge between {} and {}",
                    edge.id, edge.source, edge.target
                )));
            }
            if edge_lookup.contains_key(&edge.id) {
                return Err(KmstError::InvalidGraph(format!("duplicate edge id {}", edge.id)));
            }
            let id = edge.id;
            let index = graph.add_edge(NodeIndex::new(source), NodeIndex::new(target), edge);
            edge_lookup.insert(id, index.index());
        }

        let node_count = graph.node_count();
        let mut arcs = Vec::with_capacity(2 * graph.edge_count());
        let mut incoming = vec![Vec::new(); node_count];
        let mut outgoing = vec![Vec::new(); node_count];
        for edge in graph.edge_references() {
            let (i, j) = (edge.source().index(), edge.target().index());
            for (tail, head) in [(i, j), (j, i)] {
                let arc = arcs.len();
                arcs.push(DirectedArc {
                    tail,
                    head,
                    edge: edge.id().index(),
                });
                outgoing[tail].push(arc);
                incoming[head].push(arc);
            }
        }

        Ok(Self {
            graph,
            node_lookup,
            edge_lookup,
            arcs,
            incoming,
            outgoing,
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// External node ids in index order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_weights().copied()
    }

    /// Edges in index order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.graph.edge_weights()
    }

    pub fn node_id(&self, index: usize) -> NodeId {
        self.graph[NodeIndex::new(index)]
    }

    pub fn node_index(&self, id: NodeId) -> Option<usize> {
        self.node_lookup.get(&id).copied()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_lookup.contains_key(&id)
    }

    pub fn edge(&self, index: usize) -> &Edge {
        &self.graph[EdgeIndex::new(index)]
    }

    pub fn edge_index(&self, id: EdgeId) -> Option<usize> {
        self.edge_lookup.get(&id).copied()
    }

    /// Dense endpoint indices of an edge.
    pub fn endpoints(&self, index: usize) -> (usize, usize) {
        let arc = &self.arcs[Self::forward_arc(index)];
        (arc.tail, arc.head)
    }

    /// All directed arcs. Arc `2e` runs source -> target of edge `e`,
    /// arc `2e + 1` runs target -> source.
    pub fn arcs(&self) -> &[DirectedArc] {
        &self.arcs
    }

    #[inline]
    pub fn forward_arc(edge: usize) -> usize {
        2 * edge
    }

    #[inline]
    pub fn reverse_arc(edge: usize) -> usize {
        2 * edge + 1
    }

    /// Arc indices entering the node.
    pub fn incoming(&self, node: usize) -> &[usize] {
        &self.incoming[node]
    }

    /// Arc indices leaving the node.
    pub fn outgoing(&self, node: usize) -> &[usize] {
        &self.outgoing[node]
    }

    pub fn total_cost(&self) -> u64 {
        self.edges().map(|edge| edge.cost).sum()
    }

    /// Underlying petgraph arena (read-only).
    pub fn graph(&self) -> &UnGraph<NodeId, Edge> {
        &self.graph
    }
}

/// Fluent builder used by tests, the generator and the instance reader.
#[derive(Debug, Default, Clone)]
pub struct GraphBuilder {
    nodes: Vec<NodeId>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(mut self, ids: impl IntoIterator<Item = usize>) -> Self {
        self.nodes.extend(ids.into_iter().map(NodeId::new));
        self
    }

    pub fn edge(mut self, id: usize, source: usize, target: usize, cost: u64) -> Self {
        self.edges.push(Edge::new(id, source, target, cost));
        self
    }

    pub fn build(self) -> KmstResult<GraphInstance> {
        GraphInstance::new(self.nodes, self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> GraphInstance {
        GraphBuilder::new()
            .nodes(1..=4)
            .edge(10, 1, 2, 3)
            .edge(11, 2, 3, 4)
            .edge(12, 3, 4, 5)
            .edge(13, 4, 1, 6)
            .build()
            .unwrap()
    }

    #[test]
    fn arcs_come_in_forward_reverse_pairs() {
        let graph = square();
        assert_eq!(graph.arcs().len(), 8);
        for e in 0..graph.edge_count() {
            let fwd = graph.arcs()[GraphInstance::forward_arc(e)];
            let rev = graph.arcs()[GraphInstance::reverse_arc(e)];
            assert_eq!(fwd.edge, e);
            assert_eq!((fwd.tail, fwd.head), (rev.head, rev.tail));
        }
    }

    #[test]
    fn incidence_is_precomputed() {
        let graph = square();
        for node in 0..graph.node_count() {
            assert_eq!(graph.incoming(node).len(), 2);
            assert_eq!(graph.outgoing(node).len(), 2);
            for &arc in graph.incoming(node) {
                assert_eq!(graph.arcs()[arc].head, node);
            }
        }
    }

    #[test]
    fn lookups_map_external_ids() {
        let graph = square();
        assert_eq!(graph.node_index(NodeId::new(3)), Some(2));
        assert_eq!(graph.node_id(0), NodeId::new(1));
        assert_eq!(graph.edge_index(EdgeId::new(12)), Some(2));
        assert_eq!(graph.edge(2).cost, 5);
        assert_eq!(graph.total_cost(), 18);
        assert!(!graph.contains_node(ROOT_NODE_ID));
    }

    #[test]
    fn rejects_self_loops() {
        let err = GraphBuilder::new().nodes(1..=2).edge(0, 1, 1, 1).build().unwrap_err();
        assert!(matches!(err, KmstError::InvalidGraph(_)));
    }

    #[test]
    fn rejects_parallel_edges_in_either_direction() {
        let err = GraphBuilder::new()
            .nodes(1..=2)
            .edge(0, 1, 2, 1)
            .edge(1, 2, 1, 7)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("parallel"));
    }

    #[test]
    fn rejects_dangling_endpoints_and_duplicate_ids() {
        let dangling = GraphBuilder::new().nodes(1..=2).edge(0, 1, 9, 1).build();
        assert!(matches!(dangling, Err(KmstError::InvalidGraph(_))));

        let duplicate = GraphBuilder::new()
            .nodes(1..=3)
            .edge(0, 1, 2, 1)
            .edge(0, 2, 3, 1)
            .build();
        assert!(matches!(duplicate, Err(KmstError::InvalidGraph(_))));
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&EdgeId::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
