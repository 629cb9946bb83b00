//! Search events, lazy-constraint callbacks and the solver trait.
//!
//! A solver calls [`LazyCallback::on_event`] whenever it holds a candidate
//! integral solution or an optimal node relaxation. A returned constraint is
//! added as a globally valid lazy constraint for the rest of the search.

use crate::error::SolverResult;
use crate::problem::{LinearConstraint, MipModel};
use crate::solution::{SolverOutcome, Snapshot};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Point in the search at which the callback fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchEvent {
    /// A new integral candidate solution.
    Candidate,
    /// The LP relaxation of a node was solved to optimality.
    RelaxationOptimal,
}

impl std::fmt::Display for SearchEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchEvent::Candidate => write!(f, "candidate"),
            SearchEvent::RelaxationOptimal => write!(f, "relaxation"),
        }
    }
}

/// Separation hook invoked by the solver during search.
///
/// Implementations must be callable from several solver threads at once.
pub trait LazyCallback: Send + Sync {
    /// Return a violated constraint for the snapshot, or `None`.
    fn on_event(&self, event: SearchEvent, snapshot: &Snapshot) -> SolverResult<Option<LinearConstraint>>;
}

/// Parameters every solver adapter accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    pub threads: usize,
    pub time_limit: Duration,
    /// Soft memory limit in gigabytes.
    pub memory_limit_gb: f64,
    /// Lazy constraints may be added from the callback.
    pub lazy_constraints: bool,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            threads: 1,
            time_limit: Duration::from_secs(3600),
            memory_limit_gb: 8.0,
            lazy_constraints: false,
        }
    }
}

/// Minimal capability set the k-MST engine needs from a MIP solver.
pub trait MipSolver: Send + Sync {
    /// Short name used in logs and results.
    fn name(&self) -> &'static str;

    /// Minimize the model, invoking `callback` on search events when given.
    fn optimize(
        &self,
        model: &MipModel,
        params: &SolverParams,
        callback: Option<&dyn LazyCallback>,
    ) -> SolverResult<SolverOutcome>;
}
