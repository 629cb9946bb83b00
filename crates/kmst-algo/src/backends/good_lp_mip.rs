//! good_lp backend (microlp by default, HiGHS with `solver-highs`).
//!
//! good_lp has no solver callbacks, so the lazy-constraint contract is
//! honoured by re-solving:
//!
//! 1. relaxation rounds: integrality dropped, each LP optimum is a
//!    [`SearchEvent::RelaxationOptimal`], cuts are added until none is
//!    returned or the round cap is hit;
//! 2. MIP rounds: each integral optimum is a [`SearchEvent::Candidate`]; a
//!    returned cut is added globally and the MIP re-solved, a candidate
//!    without a cut is optimal.
//!
//! Every round counts as one explored node. Since cuts only tighten the
//! model, the objective of the last proven MIP round is a valid lower bound.
//!
//! The time still left is handed to the backend for every round (HiGHS also
//! gets the thread count), so a single long round stops at the deadline.

use good_lp::{
    constraint, variable, Constraint, Expression, ProblemVariables, ResolutionError, Solution,
    SolutionStatus, SolverModel, Variable, WithTimeLimit,
};
use kmst_solver_common::{
    LazyCallback, LinearConstraint, LinearExpr, MipModel, MipSolver, SearchEvent, Sense, Snapshot,
    SolveStatus, SolverError, SolverOutcome, SolverParams, SolverResult,
};
use std::time::Duration;
use tracing::{debug, info, warn};
use web_time::Instant;

/// good_lp backend configuration
#[derive(Debug, Clone)]
pub struct GoodLpConfig {
    /// Maximum LP relaxation rounds before switching to MIP rounds
    pub max_relaxation_rounds: usize,
    /// Maximum total rounds (relaxation + MIP)
    pub max_rounds: usize,
    /// Feasibility tolerance for checking that a cut separates its candidate
    pub tolerance: f64,
}

impl Default for GoodLpConfig {
    fn default() -> Self {
        Self {
            max_relaxation_rounds: 50,
            max_rounds: 10_000,
            tolerance: 1e-6,
        }
    }
}

/// [`MipSolver`] built on the good_lp modelling layer.
#[derive(Debug, Clone, Default)]
pub struct GoodLpSolver {
    config: GoodLpConfig,
}

impl GoodLpSolver {
    pub fn new(config: GoodLpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GoodLpConfig {
        &self.config
    }
}

impl MipSolver for GoodLpSolver {
    fn name(&self) -> &'static str {
        if cfg!(feature = "solver-highs") {
            "highs"
        } else {
            "microlp"
        }
    }

    fn optimize(
        &self,
        model: &MipModel,
        params: &SolverParams,
        callback: Option<&dyn LazyCallback>,
    ) -> SolverResult<SolverOutcome> {
        if callback.is_some() && !params.lazy_constraints {
            return Err(SolverError::LazyModeRequired(
                "a separation callback was supplied but lazy constraints are disabled".to_string(),
            ));
        }
        model.validate()?;
        #[cfg(not(feature = "solver-highs"))]
        if params.threads > 1 {
            warn!(
                threads = params.threads,
                backend = self.name(),
                "thread count is advisory for this backend"
            );
        }
        debug!(
            memory_limit_gb = params.memory_limit_gb,
            time_limit_secs = params.time_limit.as_secs_f64(),
            "solver limits"
        );

        let start = Instant::now();
        let mut cuts: Vec<LinearConstraint> = Vec::new();
        let mut rounds = 0usize;

        if let Some(callback) = callback {
            while rounds < self.config.max_relaxation_rounds && start.elapsed() < params.time_limit {
                rounds += 1;
                let round = match solve_round(model, &cuts, true, remaining(params, start), params.threads) {
                    Ok(round) if round.proven => round,
                    Ok(_) | Err(ResolutionError::Infeasible) | Err(ResolutionError::Unbounded) => break,
                    Err(_) if start.elapsed() >= params.time_limit => break,
                    Err(e) => return Err(SolverError::Backend(e.to_string())),
                };
                let snapshot = Snapshot::new(round.values);
                match callback.on_event(SearchEvent::RelaxationOptimal, &snapshot)? {
                    Some(cut) if !cut.is_satisfied(snapshot.values(), self.config.tolerance) => {
                        cuts.push(cut)
                    }
                    _ => break,
                }
            }
            debug!(rounds, cuts = cuts.len(), "relaxation rounds finished");
        }

        let mut best_bound = None;
        loop {
            let stop = if start.elapsed() >= params.time_limit {
                Some(SolveStatus::TimeLimit)
            } else if rounds >= self.config.max_rounds {
                Some(SolveStatus::IterationLimit)
            } else {
                None
            };
            if let Some(status) = stop {
                info!(%status, rounds, "search stopped without a proven optimum");
                return Ok(terminal(status, best_bound, rounds, start));
            }

            rounds += 1;
            let round = match solve_round(model, &cuts, false, remaining(params, start), params.threads) {
                Ok(round) => round,
                Err(ResolutionError::Infeasible) => {
                    return Ok(terminal(SolveStatus::Infeasible, best_bound, rounds, start))
                }
                Err(ResolutionError::Unbounded) => {
                    return Ok(terminal(SolveStatus::Unbounded, best_bound, rounds, start))
                }
                // the backend gives up without values once its deadline passes
                Err(e) if start.elapsed() >= params.time_limit => {
                    info!(rounds, error = %e, "time limit reached inside a round");
                    return Ok(terminal(SolveStatus::TimeLimit, best_bound, rounds, start));
                }
                Err(e) => return Err(SolverError::Backend(e.to_string())),
            };
            let snapshot = Snapshot::new(round.values);
            let objective = model.objective_value(snapshot.values());
            if round.proven {
                best_bound = Some(objective);
            }

            let cut = match callback {
                Some(callback) => callback.on_event(SearchEvent::Candidate, &snapshot)?,
                None => None,
            };
            match cut {
                Some(cut) if !cut.is_satisfied(snapshot.values(), self.config.tolerance) => {
                    debug!(round = rounds, objective, "candidate rejected by lazy cut");
                    cuts.push(cut);
                    continue;
                }
                Some(_) => {
                    warn!(round = rounds, "lazy cut does not separate its candidate; accepting candidate")
                }
                None => {}
            }

            if round.proven {
                return Ok(optimal(snapshot, objective, rounds, start));
            }
            info!(rounds, objective, "time limit reached with an unproven incumbent");
            return Ok(SolverOutcome {
                status: SolveStatus::TimeLimit,
                objective: Some(objective),
                best_bound,
                incumbent: Some(snapshot),
                node_count: rounds,
                runtime: start.elapsed(),
            });
        }
    }
}

fn remaining(params: &SolverParams, start: Instant) -> Duration {
    params.time_limit.saturating_sub(start.elapsed())
}

fn optimal(snapshot: Snapshot, objective: f64, rounds: usize, start: Instant) -> SolverOutcome {
    SolverOutcome {
        status: SolveStatus::Optimal,
        objective: Some(objective),
        best_bound: Some(objective),
        incumbent: Some(snapshot),
        node_count: rounds,
        runtime: start.elapsed(),
    }
}

fn terminal(status: SolveStatus, best_bound: Option<f64>, rounds: usize, start: Instant) -> SolverOutcome {
    SolverOutcome {
        status,
        objective: None,
        best_bound,
        incumbent: None,
        node_count: rounds,
        runtime: start.elapsed(),
    }
}

/// Values of one solved round; `proven` is false when the backend stopped
/// on its time limit before closing the search.
struct Round {
    values: Vec<f64>,
    proven: bool,
}

/// Build and solve one good_lp problem from the model plus the cuts so far.
fn solve_round(
    model: &MipModel,
    cuts: &[LinearConstraint],
    relax: bool,
    time_limit: Duration,
    threads: usize,
) -> Result<Round, ResolutionError> {
    let mut problem = ProblemVariables::new();
    let vars: Vec<Variable> = model
        .variables()
        .iter()
        .map(|def| {
            let mut definition = variable().min(def.lower).max(def.upper);
            if def.kind.is_integral() && !relax {
                definition = definition.integer();
            }
            problem.add(definition)
        })
        .collect();

    let objective = to_expression(model.objective(), &vars);
    let constraints: Vec<Constraint> = model
        .constraints()
        .iter()
        .chain(cuts)
        .map(|c| to_constraint(c, &vars))
        .collect();

    #[cfg(feature = "solver-highs")]
    let solution = problem
        .minimise(objective)
        .using(good_lp::highs)
        .with_all(constraints)
        .set_threads(u32::try_from(threads).unwrap_or(u32::MAX))
        .with_time_limit(time_limit.as_secs_f64())
        .solve()?;
    #[cfg(not(feature = "solver-highs"))]
    let solution = {
        let _ = threads;
        problem
            .minimise(objective)
            .using(good_lp::microlp)
            .with_all(constraints)
            .with_time_limit(time_limit.as_secs_f64())
            .solve()?
    };

    Ok(Round {
        proven: matches!(solution.status(), SolutionStatus::Optimal | SolutionStatus::GapLimit),
        values: vars.iter().map(|&v| solution.value(v)).collect(),
    })
}

fn to_expression(expr: &LinearExpr, vars: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant());
    for (var, coef) in expr.terms() {
        out.add_mul(*coef, vars[var.index()]);
    }
    out
}

fn to_constraint(c: &LinearConstraint, vars: &[Variable]) -> Constraint {
    let lhs = to_expression(&c.expr, vars);
    match c.sense {
        Sense::Le => constraint::leq(lhs, c.rhs),
        Sense::Ge => constraint::geq(lhs, c.rhs),
        Sense::Eq => constraint::eq(lhs, c.rhs),
    }
}
