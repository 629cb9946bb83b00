//! Cycle-elimination cut separation.

use super::require_coverage;
use crate::formulation::KmstVars;
use crate::EPSILON;
use kmst_core::{GraphInstance, KmstResult};
use kmst_solver_common::{LinearConstraint, LinearExpr, Snapshot};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::trace;

/// Find the first cycle of the support graph and cut it off if violated.
///
/// The support graph holds every edge whose larger direction value exceeds
/// [`EPSILON`]. The first cycle found by a depth-first search in node index
/// order yields `sum_{e in C} (y_ij + y_ji) <= |C| - 1` when its value
/// exceeds `|C| - 1 + EPSILON`; otherwise no cut is returned.
pub fn separate_cycle(
    graph: &GraphInstance,
    vars: &KmstVars,
    snapshot: &Snapshot,
) -> KmstResult<Option<LinearConstraint>> {
    require_coverage(snapshot, vars.num_vars)?;

    let support = support_graph(graph, vars, snapshot);
    let Some(cycle) = first_cycle(&support) else {
        return Ok(None);
    };

    let value: f64 = cycle
        .iter()
        .map(|&e| snapshot.value(vars.forward(e)) + snapshot.value(vars.reverse(e)))
        .sum();
    let bound = (cycle.len() - 1) as f64;
    if value <= bound + EPSILON {
        trace!(length = cycle.len(), value, "first cycle not violated");
        return Ok(None);
    }

    let mut expr = LinearExpr::new();
    for &e in &cycle {
        expr.add_term(vars.forward(e), 1.0);
        expr.add_term(vars.reverse(e), 1.0);
    }
    Ok(Some(LinearConstraint::le(expr, bound)))
}

/// Undirected support graph; edge weights are instance edge indices.
fn support_graph(graph: &GraphInstance, vars: &KmstVars, snapshot: &Snapshot) -> UnGraph<(), usize> {
    let mut support = UnGraph::<(), usize>::with_capacity(graph.node_count(), graph.edge_count());
    for _ in 0..graph.node_count() {
        support.add_node(());
    }
    for e in 0..graph.edge_count() {
        let value = snapshot
            .value(vars.forward(e))
            .max(snapshot.value(vars.reverse(e)));
        if value > EPSILON {
            let (i, j) = graph.endpoints(e);
            support.add_edge(NodeIndex::new(i), NodeIndex::new(j), e);
        }
    }
    support
}

/// Edge indices of the first cycle closed by a DFS back edge.
fn first_cycle(support: &UnGraph<(), usize>) -> Option<Vec<usize>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        White,
        Gray,
        Black,
    }

    let n = support.node_count();
    let mut color = vec![Color::White; n];
    // (parent node, support edge used to reach the node)
    let mut parent: Vec<Option<(usize, petgraph::graph::EdgeIndex)>> = vec![None; n];

    for start in 0..n {
        if color[start] != Color::White {
            continue;
        }
        color[start] = Color::Gray;
        let mut stack = vec![(start, support.edges(NodeIndex::new(start)).collect::<Vec<_>>(), 0)];

        while let Some((v, edges, cursor)) = stack.last_mut() {
            let v = *v;
            let Some(edge) = edges.get(*cursor).copied() else {
                color[v] = Color::Black;
                stack.pop();
                continue;
            };
            *cursor += 1;

            if parent[v].is_some_and(|(_, via)| via == edge.id()) {
                continue;
            }
            let w = if edge.source().index() == v {
                edge.target().index()
            } else {
                edge.source().index()
            };
            match color[w] {
                Color::White => {
                    color[w] = Color::Gray;
                    parent[w] = Some((v, edge.id()));
                    stack.push((w, support.edges(NodeIndex::new(w)).collect(), 0));
                }
                Color::Gray => {
                    // back edge v -> w closes the tree path w ~> v
                    let mut cycle = vec![*edge.weight()];
                    let mut node = v;
                    while node != w {
                        let (up, via) = parent[node]?;
                        cycle.push(support[via]);
                        node = up;
                    }
                    return Some(cycle);
                }
                Color::Black => {}
            }
        }
    }
    None
}
