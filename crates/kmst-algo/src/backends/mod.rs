//! Built-in MIP solver backends.
//!
//! Each backend exposes an external solver library through the
//! [`MipSolver`](kmst_solver_common::MipSolver) trait.

mod good_lp_mip;

pub use good_lp_mip::{GoodLpConfig, GoodLpSolver};
