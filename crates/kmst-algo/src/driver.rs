//! Branch-and-cut callback dispatcher.

use crate::formulation::{Formulation, KmstVars};
use crate::separation::{separate_connectivity, separate_cycle};
use kmst_core::{GraphInstance, KmstError, KmstResult};
use kmst_solver_common::{LazyCallback, LinearConstraint, SearchEvent, Snapshot, SolverError, SolverResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, trace};

/// Routes search events to the separation routine of the formulation.
///
/// [`separate`](Self::separate) is a pure function of the event and snapshot.
/// Cuts returned through the [`LazyCallback`] impl are counted atomically, so
/// the driver can be shared across solver threads.
pub struct BranchAndCutDriver<'a> {
    formulation: Formulation,
    vars: &'a KmstVars,
    graph: &'a GraphInstance,
    cuts_added: AtomicUsize,
}

impl<'a> BranchAndCutDriver<'a> {
    /// Fails if the formulation's separation needs a variable family the
    /// model does not declare.
    pub fn new(formulation: Formulation, vars: &'a KmstVars, graph: &'a GraphInstance) -> KmstResult<Self> {
        if formulation == Formulation::Dcc && vars.is_root.is_none() {
            return Err(KmstError::config(
                "dcc separation requires is_root variables",
            ));
        }
        if vars.select_arc.len() != graph.arcs().len() || vars.select_node.len() != graph.node_count() {
            return Err(KmstError::config(
                "variable map does not match the graph instance",
            ));
        }
        Ok(Self {
            formulation,
            vars,
            graph,
            cuts_added: AtomicUsize::new(0),
        })
    }

    pub fn formulation(&self) -> Formulation {
        self.formulation
    }

    /// Violated inequality for the snapshot, if any. Inert for formulations
    /// without separation.
    pub fn separate(&self, event: SearchEvent, snapshot: &Snapshot) -> KmstResult<Option<LinearConstraint>> {
        let cut = match self.formulation {
            Formulation::Cec => separate_cycle(self.graph, self.vars, snapshot)?,
            Formulation::Dcc => separate_connectivity(self.graph, self.vars, snapshot)?,
            Formulation::Seq | Formulation::Scf | Formulation::Mcf => None,
        };
        match &cut {
            Some(c) => debug!(
                %event,
                kind = self.formulation.as_str(),
                size = c.len(),
                rhs = c.rhs,
                "lazy cut"
            ),
            None => trace!(%event, "no violated cut"),
        }
        Ok(cut)
    }

    /// Number of cuts handed to the solver so far.
    pub fn cuts_added(&self) -> usize {
        self.cuts_added.load(Ordering::Relaxed)
    }
}

impl LazyCallback for BranchAndCutDriver<'_> {
    fn on_event(&self, event: SearchEvent, snapshot: &Snapshot) -> SolverResult<Option<LinearConstraint>> {
        let cut = self
            .separate(event, snapshot)
            .map_err(|e| SolverError::Callback(e.to_string()))?;
        if cut.is_some() {
            self.cuts_added.fetch_add(1, Ordering::Relaxed);
        }
        Ok(cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::build;
    use crate::formulation::test_support::square;

    #[test]
    fn test_driver_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BranchAndCutDriver<'static>>();
    }

    #[test]
    fn test_dcc_without_root_family_fails_fast() {
        let graph = square();
        let built = build(&graph, 3, Formulation::Cec).unwrap();
        let result = BranchAndCutDriver::new(Formulation::Dcc, &built.vars, &graph);
        assert!(matches!(result, Err(KmstError::Configuration(_))));
    }

    #[test]
    fn test_polynomial_formulations_are_inert() {
        let graph = square();
        for formulation in [Formulation::Seq, Formulation::Scf, Formulation::Mcf] {
            let built = build(&graph, 4, formulation).unwrap();
            let driver = BranchAndCutDriver::new(formulation, &built.vars, &graph).unwrap();
            // every arc at 1: full of cycles
            let mut values = vec![0.0; built.model.num_vars()];
            for y in &built.vars.select_arc {
                values[y.index()] = 1.0;
            }
            let snapshot = Snapshot::new(values);
            assert!(driver.separate(SearchEvent::Candidate, &snapshot).unwrap().is_none());
            assert!(driver.on_event(SearchEvent::Candidate, &snapshot).unwrap().is_none());
            assert_eq!(driver.cuts_added(), 0);
        }
    }

    #[test]
    fn test_callback_counts_cuts_but_separate_does_not() {
        let graph = square();
        let built = build(&graph, 4, Formulation::Cec).unwrap();
        let driver = BranchAndCutDriver::new(Formulation::Cec, &built.vars, &graph).unwrap();
        let mut values = vec![0.0; built.model.num_vars()];
        for e in 0..4 {
            values[built.vars.forward(e).index()] = 1.0;
        }
        let snapshot = Snapshot::new(values);

        assert!(driver.separate(SearchEvent::Candidate, &snapshot).unwrap().is_some());
        assert_eq!(driver.cuts_added(), 0);
        assert!(driver.on_event(SearchEvent::Candidate, &snapshot).unwrap().is_some());
        assert!(driver
            .on_event(SearchEvent::RelaxationOptimal, &snapshot)
            .unwrap()
            .is_some());
        assert_eq!(driver.cuts_added(), 2);
    }

    #[test]
    fn test_callback_errors_surface_as_solver_errors() {
        let graph = square();
        let built = build(&graph, 3, Formulation::Cec).unwrap();
        let driver = BranchAndCutDriver::new(Formulation::Cec, &built.vars, &graph).unwrap();
        let err = driver
            .on_event(SearchEvent::Candidate, &Snapshot::new(vec![]))
            .unwrap_err();
        assert!(matches!(err, SolverError::Callback(_)));
    }
}
