//! Lazy-constraint separation.
//!
//! Both routines read a [`Snapshot`] and return at most one violated
//! inequality. They never mutate their inputs and build their own scratch
//! structures on every call.

mod connectivity;
mod cycle;
mod dinic;

pub use connectivity::separate_connectivity;
pub use cycle::separate_cycle;
pub use dinic::FlowNetwork;

use kmst_core::{KmstError, KmstResult};
use kmst_solver_common::Snapshot;

/// Fail fast when the snapshot does not cover the model's variables.
pub(crate) fn require_coverage(snapshot: &Snapshot, num_vars: usize) -> KmstResult<()> {
    if snapshot.len() < num_vars {
        return Err(KmstError::config(format!(
            "snapshot holds {} values but the model has {num_vars} variables",
            snapshot.len()
        )));
    }
    Ok(())
}
