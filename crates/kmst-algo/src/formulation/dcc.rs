//! Directed connectivity cut formulation.

use super::{add_root_selectors, Formulation, FormulationStrategy, KmstVars};
use kmst_core::{GraphInstance, KmstResult};
use kmst_solver_common::{LinearConstraint, LinearExpr, MipModel};

/// Base model plus a root selector and in-degree coupling. Connectivity from
/// the root is enforced lazily by
/// [`separate_connectivity`](crate::separation::separate_connectivity).
pub struct DccFormulation;

impl FormulationStrategy for DccFormulation {
    fn id(&self) -> Formulation {
        Formulation::Dcc
    }

    fn needs_separation(&self) -> bool {
        true
    }

    fn add_constraints(
        &self,
        graph: &GraphInstance,
        k: usize,
        model: &mut MipModel,
        vars: &mut KmstVars,
    ) -> KmstResult<()> {
        let is_root = add_root_selectors(graph, k, model, vars, "is_root");

        // select_node[j] - is_root[j] <= sum of entering arcs
        for node in 0..graph.node_count() {
            let mut expr = LinearExpr::new()
                .term(vars.select_node[node], 1.0)
                .term(is_root[node], -1.0);
            for &a in graph.incoming(node) {
                expr.add_term(vars.select_arc[a], -1.0);
            }
            model.add_constraint(LinearConstraint::le(expr, 0.0));
        }

        vars.is_root = Some(is_root);
        Ok(())
    }
}
