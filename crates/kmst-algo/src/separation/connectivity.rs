//! Directed connectivity cut separation.

use super::dinic::FlowNetwork;
use super::require_coverage;
use crate::formulation::KmstVars;
use crate::EPSILON;
use kmst_core::{GraphInstance, KmstError, KmstResult};
use kmst_solver_common::{LinearConstraint, LinearExpr, Snapshot};
use tracing::trace;

/// Find a selected node that the root cannot reach with enough capacity.
///
/// Arc `(i, j)` has capacity `select_arc[i,j]` and a super-source feeds every
/// node `i` with capacity `is_root[i]`. The designated root is the node with
/// the largest `is_root` value (first on ties). For each other node `t` with
/// `select_node[t] > EPSILON`, in index order, a min cut below
/// `select_node[t] - EPSILON` yields
///
/// `sum_{u in A, v in B} select_arc[u,v] + sum_{v in B} is_root[v] >= select_node[t]`
///
/// where `A` is the source side of the cut and `B` the rest. Stops at the
/// first violated node.
pub fn separate_connectivity(
    graph: &GraphInstance,
    vars: &KmstVars,
    snapshot: &Snapshot,
) -> KmstResult<Option<LinearConstraint>> {
    let is_root = vars
        .is_root
        .as_ref()
        .ok_or_else(|| KmstError::config("connectivity separation requires is_root variables"))?;
    require_coverage(snapshot, vars.num_vars)?;

    let n = graph.node_count();
    if n == 0 {
        return Ok(None);
    }
    let source = n;
    let mut network = FlowNetwork::new(n + 1);
    for (a, arc) in graph.arcs().iter().enumerate() {
        let cap = snapshot.value(vars.select_arc[a]);
        if cap > 0.0 {
            network.add_edge(arc.tail, arc.head, cap);
        }
    }
    for (node, &r) in is_root.iter().enumerate() {
        let cap = snapshot.value(r);
        if cap > 0.0 {
            network.add_edge(source, node, cap);
        }
    }

    let mut root = 0;
    for node in 1..n {
        if snapshot.value(is_root[node]) > snapshot.value(is_root[root]) {
            root = node;
        }
    }

    for target in (0..n).filter(|&t| t != root) {
        let demand = snapshot.value(vars.select_node[target]);
        if demand <= EPSILON {
            continue;
        }
        let cut = network.min_cut(source, target);
        if cut.value >= demand - EPSILON {
            continue;
        }

        let in_a = |node: usize| cut.source_side[node];
        let mut expr = LinearExpr::new();
        for (a, arc) in graph.arcs().iter().enumerate() {
            if in_a(arc.tail) && !in_a(arc.head) {
                expr.add_term(vars.select_arc[a], 1.0);
            }
        }
        for (node, &r) in is_root.iter().enumerate() {
            if !in_a(node) {
                expr.add_term(r, 1.0);
            }
        }
        expr.add_term(vars.select_node[target], -1.0);

        trace!(
            target = %graph.node_id(target),
            cut = cut.value,
            demand,
            "connectivity violated"
        );
        return Ok(Some(LinearConstraint::ge(expr, 0.0)));
    }
    Ok(None)
}
