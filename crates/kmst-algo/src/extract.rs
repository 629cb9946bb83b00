//! Selected edges from a terminal assignment.

use crate::formulation::KmstVars;
use crate::EPSILON;
use kmst_core::{EdgeId, GraphInstance};
use kmst_solver_common::Snapshot;

/// Edge ids whose arc value exceeds `1 - EPSILON` in either direction, in
/// graph edge order.
pub fn extract_edges(snapshot: &Snapshot, vars: &KmstVars, graph: &GraphInstance) -> Vec<EdgeId> {
    graph
        .edges()
        .enumerate()
        .filter(|(e, _)| {
            snapshot.value(vars.forward(*e)) > 1.0 - EPSILON
                || snapshot.value(vars.reverse(*e)) > 1.0 - EPSILON
        })
        .map(|(_, edge)| edge.id)
        .collect()
}
