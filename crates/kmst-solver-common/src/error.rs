//! Error types for the solver interface.

use thiserror::Error;

/// Errors that can occur while validating or solving a [`MipModel`](crate::MipModel).
#[derive(Debug, Error)]
pub enum SolverError {
    /// The model is not a mixed-integer linear program the interface accepts.
    #[error("Model shape error: {0}")]
    ModelShape(String),

    /// A lazy-constraint model was handed to a solver without lazy mode enabled.
    #[error("Lazy constraints required but not enabled: {0}")]
    LazyModeRequired(String),

    /// The callback refused to continue the search.
    #[error("Callback failed: {0}")]
    Callback(String),

    /// Failure inside the backing solver library.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type alias for solver operations.
pub type SolverResult<T> = Result<T, SolverError>;
