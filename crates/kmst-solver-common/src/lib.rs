//! Solver-agnostic MIP interface for the k-MST engine.
//!
//! Formulations are written against [`MipModel`]; solver adapters implement
//! [`MipSolver`] and call back into a [`LazyCallback`] with a
//! [`SearchEvent`] and a value [`Snapshot`] whenever lazy constraints may be
//! separated.
//!
//! ```text
//! MipModel ──optimize──> MipSolver
//!                           │ (event, snapshot)
//!                           v
//!                       LazyCallback ──Option<LinearConstraint>──> MipSolver
//! ```

pub mod callback;
pub mod error;
pub mod problem;
pub mod solution;

pub use callback::{LazyCallback, MipSolver, SearchEvent, SolverParams};
pub use error::{SolverError, SolverResult};
pub use problem::{LinearConstraint, LinearExpr, MipModel, Sense, VarId, VarKind, VariableDef};
pub use solution::{SolveStatus, SolverOutcome, Snapshot};
