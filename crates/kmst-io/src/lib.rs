//! # kmst-io: file formats for k-MST instances and experiments
//!
//! - [`instance`] - whitespace instance files (read and write)
//! - [`generator`] - seeded random connected instances
//! - [`results`] - solution files, JSON results records and benchmark CSV
//!
//! Library errors for malformed instance text are [`kmst_core::KmstError::Parse`];
//! everything touching the filesystem returns `anyhow::Result` with the
//! offending path in its context.

pub mod generator;
pub mod instance;
pub mod results;

pub use generator::{generate_instance, GeneratorError, DEFAULT_SEED};
pub use instance::{format_instance, parse_instance_file, parse_instance_string, write_instance};
pub use results::{read_results_csv, write_solution, ResultsCsvWriter, ResultsRecord};
