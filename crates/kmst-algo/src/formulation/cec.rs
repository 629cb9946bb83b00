//! Cycle-elimination formulation.

use super::{Formulation, FormulationStrategy, KmstVars};
use kmst_core::{GraphInstance, KmstResult};
use kmst_solver_common::MipModel;

/// Base model only. Cycles in the selected edge set are cut off lazily by
/// [`separate_cycle`](crate::separation::separate_cycle).
pub struct CecFormulation;

impl FormulationStrategy for CecFormulation {
    fn id(&self) -> Formulation {
        Formulation::Cec
    }

    fn needs_separation(&self) -> bool {
        true
    }

    fn add_constraints(
        &self,
        _graph: &GraphInstance,
        _k: usize,
        _model: &mut MipModel,
        _vars: &mut KmstVars,
    ) -> KmstResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::build;
    use crate::formulation::test_support::zeros;
    use crate::EPSILON;
    use kmst_core::GraphBuilder;

    #[test]
    fn test_cec_formulation_id() {
        assert_eq!(CecFormulation.id(), Formulation::Cec);
        assert!(CecFormulation.needs_separation());
    }

    #[test]
    fn test_cec_base_model_admits_cycles_until_cut() {
        // square plus chord 1-3
        let graph = GraphBuilder::new()
            .nodes(1..=4)
            .edge(0, 1, 2, 1)
            .edge(1, 2, 3, 1)
            .edge(2, 3, 4, 1)
            .edge(3, 4, 1, 1)
            .edge(4, 1, 3, 1)
            .build()
            .unwrap();
        let built = build(&graph, 4, Formulation::Cec).unwrap();
        let vars = &built.vars;
        assert!(vars.is_root.is_none());
        assert!(vars.root_arc.is_none());

        // triangle 1-2-3 with node 4 selected but isolated
        let mut values = zeros(built.model.num_vars());
        for node in 0..4 {
            values[vars.select_node[node].index()] = 1.0;
        }
        values[vars.forward(0).index()] = 1.0;
        values[vars.forward(1).index()] = 1.0;
        values[vars.reverse(4).index()] = 1.0;
        assert!(built.model.is_feasible(&values, EPSILON));
    }
}
