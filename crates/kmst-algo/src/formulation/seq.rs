//! Sequential (Miller-Tucker-Zemlin) formulation.

use super::{add_root_selectors, Formulation, FormulationStrategy, KmstVars};
use kmst_core::{GraphInstance, KmstResult};
use kmst_solver_common::{LinearConstraint, LinearExpr, MipModel, VarId};

/// Order potentials along the arcs of an arborescence hanging off an
/// artificial root. Every selected node has exactly one entering arc and
/// potentials strictly increase along selected arcs, which rules out cycles.
pub struct SeqFormulation;

impl FormulationStrategy for SeqFormulation {
    fn id(&self) -> Formulation {
        Formulation::Seq
    }

    fn add_constraints(
        &self,
        graph: &GraphInstance,
        k: usize,
        model: &mut MipModel,
        vars: &mut KmstVars,
    ) -> KmstResult<()> {
        let big_m = (k + 1) as f64;
        let root_arc = add_root_selectors(graph, k, model, vars, "root_arc");

        let root_order = model.add_continuous("order_root", 0.0, big_m);
        model.add_constraint(LinearConstraint::equals(root_order, 0.0));
        let order: Vec<VarId> = graph
            .nodes()
            .map(|id| model.add_continuous(format!("order_{id}"), 0.0, big_m))
            .collect();

        // one entering arc per selected node, from the root or a neighbour
        for node in 0..graph.node_count() {
            let mut entering = LinearExpr::new().term(root_arc[node], 1.0);
            for &a in graph.incoming(node) {
                entering.add_term(vars.select_arc[a], 1.0);
            }
            entering.add_term(vars.select_node[node], -1.0);
            model.add_constraint(LinearConstraint::equals(entering, 0.0));
        }

        // order[j] - order[i] - M * y[i,j] >= 1 - M
        for (a, arc) in graph.arcs().iter().enumerate() {
            model.add_constraint(LinearConstraint::ge(
                LinearExpr::new()
                    .term(order[arc.head], 1.0)
                    .term(order[arc.tail], -1.0)
                    .term(vars.select_arc[a], -big_m),
                1.0 - big_m,
            ));
        }
        for node in 0..graph.node_count() {
            model.add_constraint(LinearConstraint::ge(
                LinearExpr::new()
                    .term(order[node], 1.0)
                    .term(root_order, -1.0)
                    .term(root_arc[node], -big_m),
                1.0 - big_m,
            ));
            model.add_constraint(LinearConstraint::le(
                LinearExpr::new()
                    .term(order[node], 1.0)
                    .term(vars.select_node[node], -big_m),
                0.0,
            ));
        }

        vars.root_arc = Some(root_arc);
        vars.order = Some(order);
        vars.root_order = Some(root_order);
        Ok(())
    }
}
