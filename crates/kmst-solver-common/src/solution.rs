//! Solver outcomes and value snapshots.

use crate::problem::VarId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Terminal status of a solve, passed through verbatim to results records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Problem is infeasible.
    Infeasible,
    /// Problem is unbounded.
    Unbounded,
    /// Time limit reached; an incumbent may exist.
    TimeLimit,
    /// Round limit of the backend reached.
    IterationLimit,
}

impl SolveStatus {
    /// Check if this status represents a proven optimum.
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::TimeLimit => "time_limit",
            SolveStatus::IterationLimit => "iteration_limit",
        }
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read-only dense vector of variable values, owned per search event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    values: Vec<f64>,
}

impl Snapshot {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Value of a variable, `None` if the snapshot does not cover it.
    #[inline]
    pub fn get(&self, var: VarId) -> Option<f64> {
        self.values.get(var.index()).copied()
    }

    /// Value of a variable, 0 if the snapshot does not cover it.
    #[inline]
    pub fn value(&self, var: VarId) -> f64 {
        self.get(var).unwrap_or(0.0)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<f64>> for Snapshot {
    fn from(values: Vec<f64>) -> Self {
        Snapshot::new(values)
    }
}

/// Everything a [`MipSolver`](crate::MipSolver) reports after optimizing.
#[derive(Debug, Clone)]
pub struct SolverOutcome {
    pub status: SolveStatus,
    /// Objective of the incumbent, if any.
    pub objective: Option<f64>,
    /// Best proven lower bound.
    pub best_bound: Option<f64>,
    /// Final assignment of the incumbent.
    pub incumbent: Option<Snapshot>,
    /// Explored nodes (or re-solve rounds for adapters without a tree).
    pub node_count: usize,
    pub runtime: Duration,
}

impl SolverOutcome {
    /// Relative gap `|obj - bound| / |obj|`, 0 when both coincide.
    pub fn gap(&self) -> Option<f64> {
        let (objective, bound) = (self.objective?, self.best_bound?);
        let diff = (objective - bound).abs();
        if diff <= f64::EPSILON {
            Some(0.0)
        } else if objective.abs() <= f64::EPSILON {
            Some(f64::INFINITY)
        } else {
            Some(diff / objective.abs())
        }
    }
}
