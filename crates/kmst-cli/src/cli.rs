use clap::{Parser, Subcommand};
use kmst_algo::Formulation;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kmst", author, version, about = "k-minimum spanning tree formulations", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve one instance for one k with one formulation
    Solve {
        /// Path to the instance file
        #[arg(long)]
        instance: PathBuf,
        /// Number of nodes in the tree
        #[arg(long)]
        k: usize,
        /// Formulation: seq, scf, mcf, cec or dcc
        #[arg(long)]
        formulation: Formulation,
        /// Write the results record (JSON) here
        #[arg(long)]
        results_file: Option<PathBuf>,
        /// Write the selected edge ids here, one per line
        #[arg(long)]
        solution_file: Option<PathBuf>,
        #[command(flatten)]
        limits: LimitArgs,
    },
    /// Generate a random connected instance
    Generate {
        /// Number of nodes
        #[arg(long)]
        nodes: usize,
        /// Number of edges (at least nodes - 1)
        #[arg(long)]
        edges: usize,
        #[arg(long, default_value_t = kmst_io::DEFAULT_SEED)]
        seed: u64,
        /// Output instance file
        #[arg(long)]
        out: PathBuf,
    },
    /// Run every formulation on every instance of a directory
    Bench {
        /// Directory holding *.dat instances
        #[arg(long)]
        data_dir: PathBuf,
        #[arg(long, default_value = "benchmark_results.csv")]
        output_csv: PathBuf,
        /// Comma-separated formulations to run
        #[arg(long, value_delimiter = ',', default_value = "seq,scf,mcf,cec,dcc")]
        formulations: Vec<Formulation>,
        /// Concurrent solves
        #[arg(long, default_value_t = 1)]
        jobs: usize,
        #[command(flatten)]
        limits: LimitArgs,
    },
    /// Print instance statistics
    Stats {
        /// Path to the instance file
        #[arg(long)]
        instance: PathBuf,
    },
}

/// Solver limits shared by `solve` and `bench`.
#[derive(clap::Args, Debug, Clone)]
pub struct LimitArgs {
    /// Maximum number of solver threads
    #[arg(long, default_value_t = 1)]
    pub threads: usize,
    /// Time limit in seconds
    #[arg(long, default_value_t = 3600)]
    pub timelimit: u64,
    /// Memory limit in GB
    #[arg(long, default_value_t = 8.0)]
    pub memorylimit: f64,
}
