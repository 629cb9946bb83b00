//! Unified error types for the k-MST workspace
//!
//! [`KmstError`] covers every fatal condition raised by the library crates.
//! Solver adapters report their own errors which are folded into
//! [`KmstError::Solver`] at the API boundary.
//!
//! # Example
//!
//! ```ignore
//! use kmst_core::{KmstError, KmstResult};
//!
//! fn run(path: &str) -> KmstResult<()> {
//!     let graph = read_instance(path)?;
//!     solve_kmst(&graph, 3, Formulation::Cec, &solver, &config)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all k-MST operations.
#[derive(Error, Debug)]
pub enum KmstError {
    /// I/O errors (instance files, result files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed instance data
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid `k`, unknown formulation, reserved node id, or a separation
    /// routine invoked without the variables it needs. Always fatal.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The model handed to the solver is not a mixed-integer linear program.
    #[error("Model shape error: {0}")]
    ModelShape(String),

    /// Graph invariants violated (self-loops, parallel edges, dangling endpoints).
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    /// Failure reported by the external MIP solver adapter
    #[error("Solver error: {0}")]
    Solver(String),
}

/// Convenience type alias for Results using KmstError.
pub type KmstResult<T> = Result<T, KmstError>;

impl KmstError {
    /// Shorthand used throughout the formulation and separation code.
    pub fn config(message: impl Into<String>) -> Self {
        KmstError::Configuration(message.into())
    }

    /// Whether this error means the run must not reach the solver.
    pub fn is_fatal_before_solve(&self) -> bool {
        matches!(
            self,
            KmstError::Configuration(_) | KmstError::ModelShape(_) | KmstError::InvalidGraph(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KmstError::config("k = 7 exceeds |V| = 4");
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("k = 7"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: KmstError = io_err.into();
        assert!(matches!(err, KmstError::Io(_)));
        assert!(!err.is_fatal_before_solve());
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> KmstResult<()> {
            Err(KmstError::ModelShape("no integer variables".into()))
        }

        fn outer() -> KmstResult<()> {
            inner()?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert!(err.is_fatal_before_solve());
    }
}
