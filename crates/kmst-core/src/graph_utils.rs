use crate::{EdgeId, GraphInstance};
use petgraph::algo::connected_components;
use petgraph::graph::UnGraph;
use std::collections::HashMap;
use thiserror::Error;

/// Reasons an extracted edge set fails to be a k-tree.
///
/// This is a diagnostic, not a fatal error: callers log it and mark the run
/// invalid (it usually means the solver stopped before a valid incumbent).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InfeasibleTree {
    #[error("edge id {0} is not part of the instance")]
    UnknownEdge(EdgeId),
    #[error("expected {expected} edges, found {found}")]
    EdgeCount { expected: usize, found: usize },
    #[error("expected {expected} nodes, found {found}")]
    NodeCount { expected: usize, found: usize },
    #[error("selected subgraph has {components} connected components")]
    Disconnected { components: usize },
}

/// Summary statistics printed by `kmst generate` and `kmst solve`.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub connected_components: usize,
    pub min_degree: usize,
    pub max_degree: usize,
    pub density: f64,
    pub total_cost: u64,
}

/// Check that `edges` forms a tree on exactly `k` nodes of `graph`.
///
/// `k - 1` edges spanning `k` nodes in one component leave no room for a
/// cycle, so no separate acyclicity test is needed.
///
/// For `k <= 1` the only valid selection is the empty edge set; a single
/// selected node cannot be observed from edges alone.
pub fn validate_tree(graph: &GraphInstance, edges: &[EdgeId], k: usize) -> Result<(), InfeasibleTree> {
    let expected_edges = k.saturating_sub(1);
    if edges.len() != expected_edges {
        return Err(InfeasibleTree::EdgeCount {
            expected: expected_edges,
            found: edges.len(),
        });
    }
    if edges.is_empty() {
        return Ok(());
    }

    let mut subgraph = UnGraph::<(), ()>::default();
    let mut local: HashMap<usize, petgraph::graph::NodeIndex> = HashMap::new();
    for &id in edges {
        let index = graph.edge_index(id).ok_or(InfeasibleTree::UnknownEdge(id))?;
        let (i, j) = graph.endpoints(index);
        let a = *local.entry(i).or_insert_with(|| subgraph.add_node(()));
        let b = *local.entry(j).or_insert_with(|| subgraph.add_node(()));
        subgraph.add_edge(a, b, ());
    }

    if subgraph.node_count() != k {
        return Err(InfeasibleTree::NodeCount {
            expected: k,
            found: subgraph.node_count(),
        });
    }
    let components = connected_components(&subgraph);
    if components != 1 {
        return Err(InfeasibleTree::Disconnected { components });
    }
    Ok(())
}

/// Degree, density and component statistics of an instance.
pub fn instance_stats(graph: &GraphInstance) -> InstanceStats {
    let node_count = graph.node_count();
    let edge_count = graph.edge_count();
    let degrees: Vec<usize> = (0..node_count).map(|n| graph.outgoing(n).len()).collect();
    let density = if node_count < 2 {
        0.0
    } else {
        2.0 * edge_count as f64 / (node_count as f64 * (node_count as f64 - 1.0))
    };
    InstanceStats {
        node_count,
        edge_count,
        connected_components: connected_components(graph.graph()),
        min_degree: degrees.iter().copied().min().unwrap_or(0),
        max_degree: degrees.iter().copied().max().unwrap_or(0),
        density,
        total_cost: graph.total_cost(),
    }
}
