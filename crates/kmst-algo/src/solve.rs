//! Solve orchestration: build, validate, optimize, extract.

use crate::driver::BranchAndCutDriver;
use crate::extract::extract_edges;
use crate::formulation::{build, Formulation, KmstFormulation, KmstVars};
use crate::solver_error;
use kmst_core::{validate_tree, EdgeId, GraphInstance, KmstResult};
use kmst_solver_common::{LazyCallback, MipSolver, SolveStatus, SolverParams};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Solve configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SolveConfig {
    /// Solver threads
    pub threads: usize,
    /// Wall-clock limit for the search
    pub time_limit: Duration,
    /// Soft memory limit (GB)
    pub memory_limit_gb: f64,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            time_limit: Duration::from_secs(3600),
            memory_limit_gb: 8.0,
        }
    }
}

impl SolveConfig {
    fn solver_params(&self, formulation: Formulation) -> SolverParams {
        SolverParams {
            threads: self.threads,
            time_limit: self.time_limit,
            memory_limit_gb: self.memory_limit_gb,
            lazy_constraints: formulation.needs_separation(),
        }
    }
}

/// Outcome of one k-MST solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KmstRun {
    pub formulation: Formulation,
    pub k: usize,
    pub status: SolveStatus,
    pub objective_value: Option<f64>,
    pub best_bound: Option<f64>,
    pub gap: Option<f64>,
    /// Wall-clock seconds spent in the solver
    pub runtime: f64,
    pub n_nodes: usize,
    pub n_lazy_constraints: usize,
    /// Selected edge ids in graph edge order
    pub edges: Vec<EdgeId>,
    /// Whether `edges` forms a tree on exactly `k` nodes
    pub valid_tree: bool,
}

/// Per-solve state shared by the components, owned by [`solve_kmst`].
pub struct SolveContext<'a> {
    pub graph: &'a GraphInstance,
    pub k: usize,
    pub formulation: Formulation,
    pub vars: &'a KmstVars,
    pub driver: BranchAndCutDriver<'a>,
}

impl<'a> SolveContext<'a> {
    pub fn new(graph: &'a GraphInstance, built: &'a KmstFormulation) -> KmstResult<Self> {
        Ok(Self {
            graph,
            k: built.k,
            formulation: built.formulation,
            vars: &built.vars,
            driver: BranchAndCutDriver::new(built.formulation, &built.vars, graph)?,
        })
    }

    /// The driver as a solver callback, only for formulations that separate.
    pub fn callback(&self) -> Option<&dyn LazyCallback> {
        if self.formulation.needs_separation() {
            Some(&self.driver)
        } else {
            None
        }
    }
}

/// Select a minimum-cost `k`-tree of `graph` with the given formulation.
///
/// Configuration and model-shape errors abort before the solver runs. An
/// incumbent that is not a valid tree is logged and reported through
/// [`KmstRun::valid_tree`], never as an error.
pub fn solve_kmst(
    graph: &GraphInstance,
    k: usize,
    formulation: Formulation,
    solver: &dyn MipSolver,
    config: &SolveConfig,
) -> KmstResult<KmstRun> {
    info!(
        formulation = %formulation,
        k,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        backend = solver.name(),
        "building model"
    );
    let built = build(graph, k, formulation)?;
    built.model.validate().map_err(solver_error)?;

    let ctx = SolveContext::new(graph, &built)?;
    let params = config.solver_params(formulation);
    info!(
        variables = built.model.num_vars(),
        constraints = built.model.constraints().len(),
        lazy = params.lazy_constraints,
        "optimizing"
    );
    let outcome = solver
        .optimize(&built.model, &params, ctx.callback())
        .map_err(solver_error)?;

    let edges = outcome
        .incumbent
        .as_ref()
        .map(|snapshot| extract_edges(snapshot, ctx.vars, ctx.graph))
        .unwrap_or_default();
    let valid_tree = match (&outcome.incumbent, validate_tree(ctx.graph, &edges, ctx.k)) {
        (None, _) => false,
        (Some(_), Ok(())) => true,
        (Some(_), Err(reason)) => {
            warn!(%reason, "incumbent is not a valid k-tree");
            false
        }
    };

    let run = KmstRun {
        formulation,
        k,
        status: outcome.status,
        objective_value: outcome.objective,
        best_bound: outcome.best_bound,
        gap: outcome.gap(),
        runtime: outcome.runtime.as_secs_f64(),
        n_nodes: outcome.node_count,
        n_lazy_constraints: ctx.driver.cuts_added(),
        edges,
        valid_tree,
    };
    info!(
        status = %run.status,
        objective = ?run.objective_value,
        cuts = run.n_lazy_constraints,
        runtime = run.runtime,
        "solve finished"
    );
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::test_support::square;

    #[test]
    fn test_default_config_matches_cli_defaults() {
        let config = SolveConfig::default();
        assert_eq!(config.threads, 1);
        assert_eq!(config.time_limit, Duration::from_secs(3600));
        assert_eq!(config.memory_limit_gb, 8.0);
    }

    #[test]
    fn test_lazy_mode_follows_formulation() {
        let config = SolveConfig::default();
        assert!(config.solver_params(Formulation::Cec).lazy_constraints);
        assert!(config.solver_params(Formulation::Dcc).lazy_constraints);
        assert!(!config.solver_params(Formulation::Mcf).lazy_constraints);
    }

    #[test]
    fn test_context_exposes_callback_only_for_cut_formulations() {
        let graph = square();
        for formulation in Formulation::all() {
            let built = build(&graph, 3, *formulation).unwrap();
            let ctx = SolveContext::new(&graph, &built).unwrap();
            assert_eq!(ctx.callback().is_some(), formulation.needs_separation());
        }
    }
}
