//! Single-commodity flow formulation.

use super::{add_root_selectors, Formulation, FormulationStrategy, KmstVars};
use kmst_core::{GraphInstance, KmstResult};
use kmst_solver_common::{LinearConstraint, LinearExpr, MipModel, VarId};

/// The artificial root ships `k` units of flow; every selected node consumes
/// one. Flow may only travel on selected arcs, so every selected node is
/// connected to the root.
pub struct ScfFormulation;

impl FormulationStrategy for ScfFormulation {
    fn id(&self) -> Formulation {
        Formulation::Scf
    }

    fn add_constraints(
        &self,
        graph: &GraphInstance,
        k: usize,
        model: &mut MipModel,
        vars: &mut KmstVars,
    ) -> KmstResult<()> {
        let capacity = k.max(1) as f64;
        // the root arc is the root selector
        let root_arc = add_root_selectors(graph, k, model, vars, "root_arc");

        let flow: Vec<VarId> = graph
            .arcs()
            .iter()
            .map(|arc| {
                model.add_continuous(
                    format!("flow_{}_{}", graph.node_id(arc.tail), graph.node_id(arc.head)),
                    0.0,
                    capacity,
                )
            })
            .collect();
        let root_flow: Vec<VarId> = graph
            .nodes()
            .map(|id| model.add_continuous(format!("flow_root_{id}"), 0.0, capacity))
            .collect();

        for node in 0..graph.node_count() {
            let mut balance = LinearExpr::new().term(root_flow[node], 1.0);
            for &a in graph.incoming(node) {
                balance.add_term(flow[a], 1.0);
            }
            for &a in graph.outgoing(node) {
                balance.add_term(flow[a], -1.0);
            }
            balance.add_term(vars.select_node[node], -1.0);
            model.add_constraint(LinearConstraint::equals(balance, 0.0));
        }

        model.add_constraint(LinearConstraint::equals(
            root_flow.iter().map(|&f| (f, 1.0)).collect::<LinearExpr>(),
            k as f64,
        ));

        for (a, &f) in flow.iter().enumerate() {
            model.add_constraint(LinearConstraint::le(
                LinearExpr::new()
                    .term(f, 1.0)
                    .term(vars.select_arc[a], -capacity),
                0.0,
            ));
        }
        for (node, &f) in root_flow.iter().enumerate() {
            model.add_constraint(LinearConstraint::le(
                LinearExpr::new()
                    .term(f, 1.0)
                    .term(root_arc[node], -capacity),
                0.0,
            ));
        }

        vars.is_root = Some(root_arc.clone());
        vars.root_arc = Some(root_arc);
        vars.flow = Some(flow);
        vars.root_flow = Some(root_flow);
        Ok(())
    }
}
