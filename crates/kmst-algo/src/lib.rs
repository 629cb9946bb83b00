//! # kmst-algo: k-MST formulations and branch-and-cut separation
//!
//! Builds one of five MIP formulations of the k-minimum-spanning-tree problem
//! and supplies the lazy-constraint separation routines the cut-based
//! variants need during search.
//!
//! | Formulation | Connectivity / acyclicity by          | Needs separation |
//! |-------------|---------------------------------------|------------------|
//! | `seq`       | Miller-Tucker-Zemlin order potentials | no               |
//! | `scf`       | single-commodity flow from the root   | no               |
//! | `mcf`       | one flow commodity per node           | no               |
//! | `cec`       | cycle-elimination cuts                | yes              |
//! | `dcc`       | directed connectivity cuts            | yes              |
//!
//! ```text
//! GraphInstance ──build──> KmstFormulation ──optimize──> MipSolver
//!                                                          │ (event, snapshot)
//!                                                          v
//!                              separation <── BranchAndCutDriver
//! ```
//!
//! [`solve_kmst`] wires the pieces together and returns a [`KmstRun`].

pub mod backends;
pub mod driver;
pub mod extract;
pub mod formulation;
pub mod separation;
pub mod solve;

pub use backends::{GoodLpConfig, GoodLpSolver};
pub use driver::BranchAndCutDriver;
pub use extract::extract_edges;
pub use formulation::{build, Formulation, FormulationStrategy, KmstFormulation, KmstVars};
pub use separation::{separate_connectivity, separate_cycle};
pub use solve::{solve_kmst, KmstRun, SolveConfig, SolveContext};

use kmst_core::KmstError;
use kmst_solver_common::SolverError;

/// Numerical tolerance for selection, violation and support tests.
pub const EPSILON: f64 = 1e-5;

/// Fold a solver-interface error into the workspace error type.
pub fn solver_error(err: SolverError) -> KmstError {
    match err {
        SolverError::ModelShape(msg) => KmstError::ModelShape(msg),
        SolverError::LazyModeRequired(msg) | SolverError::Callback(msg) => {
            KmstError::Configuration(msg)
        }
        SolverError::Backend(msg) => KmstError::Solver(msg),
    }
}
