use anyhow::{Context, Result};
use kmst_algo::{solve_kmst, Formulation, GoodLpSolver};
use kmst_cli::cli::LimitArgs;
use kmst_io::{parse_instance_file, write_solution};
use std::path::Path;
use tracing::{info, warn};

use super::util::{results_record, solve_config};

pub fn handle(
    instance: &Path,
    k: usize,
    formulation: Formulation,
    results_file: Option<&Path>,
    solution_file: Option<&Path>,
    limits: &LimitArgs,
) -> Result<()> {
    let graph = parse_instance_file(instance)?;
    let solver = GoodLpSolver::default();
    let run = solve_kmst(&graph, k, formulation, &solver, &solve_config(limits))
        .with_context(|| format!("solving {} with k = {k} ({formulation})", instance.display()))?;

    if run.valid_tree {
        info!(edges = run.edges.len(), "k-MST is valid");
    } else if run.objective_value.is_some() {
        warn!("the provided solution is not a tree");
    }

    let record = results_record(instance, &run);
    println!(
        "{}",
        serde_json::to_string(&record).context("serializing results record")?
    );

    if let Some(path) = results_file {
        record.to_json(path)?;
        info!(path = %path.display(), "results written");
    }
    if let Some(path) = solution_file {
        write_solution(&run.edges, path)?;
        info!(path = %path.display(), "solution written");
    }
    Ok(())
}
