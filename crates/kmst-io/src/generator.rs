//! Seeded random connected instances.

use kmst_core::{Edge, GraphInstance, KmstError, NodeId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

/// Default seed of `kmst generate`.
pub const DEFAULT_SEED: u64 = 42;

/// Edge costs are drawn from `COST_RANGE`.
pub const COST_RANGE: std::ops::Range<u64> = 1..1000;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("{n_edges} edges cannot connect {n_nodes} nodes")]
    TooFewEdges { n_nodes: usize, n_edges: usize },

    #[error("{n_edges} edges exceed the {max} possible on {n_nodes} nodes")]
    TooManyEdges {
        n_nodes: usize,
        n_edges: usize,
        max: usize,
    },

    #[error(transparent)]
    Graph(#[from] KmstError),
}

/// Random connected simple graph on nodes `1..=n_nodes` with `n_edges` edges.
///
/// A random spanning tree comes first: every node outside the tree, in
/// shuffled order, is attached to a uniformly chosen tree node. Remaining
/// edges join uniformly chosen distinct node pairs. Edge ids follow the
/// sorted `(min, max)` endpoint order and costs are drawn in that order.
pub fn generate_instance(
    n_nodes: usize,
    n_edges: usize,
    seed: u64,
) -> Result<GraphInstance, GeneratorError> {
    let max = n_nodes * n_nodes.saturating_sub(1) / 2;
    if n_edges > max {
        return Err(GeneratorError::TooManyEdges {
            n_nodes,
            n_edges,
            max,
        });
    }
    if n_edges + 1 < n_nodes {
        return Err(GeneratorError::TooFewEdges { n_nodes, n_edges });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut connected: Vec<usize> = (1..=n_nodes.min(1)).collect();
    let mut unconnected: Vec<usize> = (2..=n_nodes).collect();
    unconnected.shuffle(&mut rng);

    let mut pairs = BTreeSet::new();
    while let Some(j) = unconnected.pop() {
        let Some(&i) = connected.choose(&mut rng) else {
            break;
        };
        connected.push(j);
        pairs.insert((i.min(j), i.max(j)));
    }

    while pairs.len() < n_edges {
        let (i, j) = (rng.gen_range(1..=n_nodes), rng.gen_range(1..=n_nodes));
        if i != j {
            pairs.insert((i.min(j), i.max(j)));
        }
    }

    let edges: Vec<Edge> = pairs
        .into_iter()
        .enumerate()
        .map(|(id, (i, j))| Edge::new(id, i, j, rng.gen_range(COST_RANGE)))
        .collect();
    debug!(n_nodes, n_edges, seed, "generated instance");

    Ok(GraphInstance::new((1..=n_nodes).map(NodeId::new), edges)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmst_core::instance_stats;

    #[test]
    fn test_generated_instance_is_connected() {
        for seed in [1, 7, DEFAULT_SEED] {
            let graph = generate_instance(12, 20, seed).unwrap();
            let stats = instance_stats(&graph);
            assert_eq!(stats.node_count, 12);
            assert_eq!(stats.edge_count, 20);
            assert_eq!(stats.connected_components, 1);
        }
    }

    #[test]
    fn test_ids_follow_sorted_endpoints_and_costs_in_range() {
        let graph = generate_instance(8, 15, 3).unwrap();
        let mut previous = None;
        for (index, edge) in graph.edges().enumerate() {
            assert_eq!(edge.id.value(), index);
            assert!(edge.source < edge.target);
            let key = (edge.source, edge.target);
            assert!(previous.map_or(true, |p| p < key));
            previous = Some(key);
            assert!(COST_RANGE.contains(&edge.cost));
        }
    }

    #[test]
    fn test_same_seed_same_instance() {
        let a = generate_instance(10, 18, 99).unwrap();
        let b = generate_instance(10, 18, 99).unwrap();
        assert_eq!(a.edges().collect::<Vec<_>>(), b.edges().collect::<Vec<_>>());
    }

    #[test]
    fn test_complete_graph_and_tree_extremes() {
        assert_eq!(generate_instance(6, 15, 0).unwrap().edge_count(), 15);
        let tree = generate_instance(6, 5, 0).unwrap();
        assert_eq!(instance_stats(&tree).connected_components, 1);
        assert_eq!(generate_instance(1, 0, 0).unwrap().node_count(), 1);
        assert_eq!(generate_instance(0, 0, 0).unwrap().node_count(), 0);
    }

    #[test]
    fn test_edge_count_bounds() {
        assert!(matches!(
            generate_instance(5, 11, 0),
            Err(GeneratorError::TooManyEdges { max: 10, .. })
        ));
        assert!(matches!(
            generate_instance(5, 3, 0),
            Err(GeneratorError::TooFewEdges { .. })
        ));
    }
}
