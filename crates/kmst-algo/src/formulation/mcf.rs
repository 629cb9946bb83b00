//! Multi-commodity flow formulation.

use super::{add_root_selectors, Formulation, FormulationStrategy, KmstVars};
use kmst_core::{GraphInstance, KmstResult};
use kmst_solver_common::{LinearConstraint, LinearExpr, MipModel, VarId};

/// One commodity per destination node `c`: the root sends
/// `select_node[c] - is_root[c]` units to `c` along selected arcs.
///
/// Flows are continuous in `[0, 1]`; with integral arcs an integral flow
/// always exists.
pub struct McfFormulation;

impl FormulationStrategy for McfFormulation {
    fn id(&self) -> Formulation {
        Formulation::Mcf
    }

    fn add_constraints(
        &self,
        graph: &GraphInstance,
        k: usize,
        model: &mut MipModel,
        vars: &mut KmstVars,
    ) -> KmstResult<()> {
        let is_root = add_root_selectors(graph, k, model, vars, "is_root");

        let mut commodity_flow = Vec::with_capacity(graph.node_count());
        for c in 0..graph.node_count() {
            let dest = graph.node_id(c);
            let flow: Vec<VarId> = graph
                .arcs()
                .iter()
                .map(|arc| {
                    model.add_continuous(
                        format!(
                            "flow_{}_{}_to_{dest}",
                            graph.node_id(arc.tail),
                            graph.node_id(arc.head)
                        ),
                        0.0,
                        1.0,
                    )
                })
                .collect();

            for node in 0..graph.node_count() {
                // out_c(node) - in_c(node)
                let mut net_out = LinearExpr::new();
                for &a in graph.outgoing(node) {
                    net_out.add_term(flow[a], 1.0);
                }
                for &a in graph.incoming(node) {
                    net_out.add_term(flow[a], -1.0);
                }

                if node == c {
                    // in - out = select_node[c] - is_root[c]
                    let mut demand = net_out;
                    demand.add_term(vars.select_node[c], 1.0);
                    demand.add_term(is_root[c], -1.0);
                    model.add_constraint(LinearConstraint::equals(demand, 0.0));
                } else {
                    model.add_constraint(LinearConstraint::ge(net_out.clone(), 0.0));
                    let mut supply = net_out;
                    supply.add_term(is_root[node], -1.0);
                    model.add_constraint(LinearConstraint::le(supply, 0.0));
                }
            }

            for (a, &f) in flow.iter().enumerate() {
                model.add_constraint(LinearConstraint::le(
                    LinearExpr::new().term(f, 1.0).term(vars.select_arc[a], -1.0),
                    0.0,
                ));
            }
            commodity_flow.push(flow);
        }

        vars.is_root = Some(is_root);
        vars.commodity_flow = Some(commodity_flow);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::build;
    use crate::formulation::test_support::{square, zeros};
    use crate::EPSILON;

    /// Path 1 -> 2 -> 3 rooted at node 1 with one unit per commodity.
    fn rooted_path(built: &crate::KmstFormulation) -> Vec<f64> {
        let vars = &built.vars;
        let is_root = vars.is_root.as_ref().unwrap();
        let flow = vars.commodity_flow.as_ref().unwrap();
        let a12 = GraphInstance::forward_arc(0);
        let a23 = GraphInstance::forward_arc(1);

        let mut values = zeros(built.model.num_vars());
        for node in 0..3 {
            values[vars.select_node[node].index()] = 1.0;
        }
        values[is_root[0].index()] = 1.0;
        values[vars.select_arc[a12].index()] = 1.0;
        values[vars.select_arc[a23].index()] = 1.0;
        values[flow[1][a12].index()] = 1.0;
        values[flow[2][a12].index()] = 1.0;
        values[flow[2][a23].index()] = 1.0;
        values
    }

    #[test]
    fn test_mcf_formulation_id() {
        assert_eq!(McfFormulation.id(), Formulation::Mcf);
        assert!(!McfFormulation.needs_separation());
    }

    #[test]
    fn test_mcf_declares_one_commodity_per_node() {
        let graph = square();
        let built = build(&graph, 3, Formulation::Mcf).unwrap();
        let flow = built.vars.commodity_flow.as_ref().unwrap();
        assert_eq!(flow.len(), graph.node_count());
        assert!(flow.iter().all(|c| c.len() == graph.arcs().len()));
    }

    #[test]
    fn test_mcf_accepts_rooted_path() {
        let built = build(&square(), 3, Formulation::Mcf).unwrap();
        let values = rooted_path(&built);
        assert!(built.model.is_feasible(&values, EPSILON));
    }

    #[test]
    fn test_mcf_rejects_undelivered_commodity() {
        let built = build(&square(), 3, Formulation::Mcf).unwrap();
        let flow = built.vars.commodity_flow.as_ref().unwrap();
        let mut values = rooted_path(&built);
        values[flow[2][GraphInstance::forward_arc(1)].index()] = 0.0;
        assert!(!built.model.is_feasible(&values, EPSILON));
    }

    #[test]
    fn test_mcf_rejects_flow_from_non_root() {
        let built = build(&square(), 3, Formulation::Mcf).unwrap();
        let vars = &built.vars;
        let is_root = vars.is_root.as_ref().unwrap();
        let mut values = rooted_path(&built);
        // commodities still leave node 1 but the root moved to node 3
        values[is_root[0].index()] = 0.0;
        values[is_root[2].index()] = 1.0;
        assert!(!built.model.is_feasible(&values, EPSILON));
    }
}
