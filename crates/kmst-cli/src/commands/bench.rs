use anyhow::{anyhow, Context, Result};
use kmst_algo::{solve_kmst, Formulation, GoodLpSolver, SolveConfig};
use kmst_cli::cli::LimitArgs;
use kmst_core::GraphInstance;
use kmst_io::{parse_instance_file, ResultsCsvWriter, ResultsRecord};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info};

use super::util::{bench_k_values, results_record, solve_config};

/// One (instance, k, formulation) solve.
struct BenchTask<'a> {
    path: &'a Path,
    graph: &'a GraphInstance,
    k: usize,
    formulation: Formulation,
}

pub fn handle(
    data_dir: &Path,
    output_csv: &Path,
    formulations: &[Formulation],
    jobs: usize,
    limits: &LimitArgs,
) -> Result<()> {
    if !data_dir.is_dir() {
        return Err(anyhow!("data directory not found: {}", data_dir.display()));
    }
    let files = discover_instances(data_dir)?;
    if files.is_empty() {
        return Err(anyhow!("no .dat instance files found in {}", data_dir.display()));
    }
    info!(
        instances = files.len(),
        formulations = ?formulations.iter().map(Formulation::as_str).collect::<Vec<_>>(),
        threads = limits.threads,
        timelimit = limits.timelimit,
        memorylimit = limits.memorylimit,
        output = %output_csv.display(),
        "starting benchmark"
    );

    let mut instances = Vec::new();
    for path in files {
        match parse_instance_file(&path) {
            Ok(graph) => instances.push((path, graph)),
            Err(e) => error!("skipping {}: {:#}", path.display(), e),
        }
    }

    let tasks: Vec<BenchTask> = instances
        .iter()
        .flat_map(|(path, graph)| {
            bench_k_values(graph.node_count())
                .into_iter()
                .flat_map(move |k| {
                    formulations.iter().map(move |&formulation| BenchTask {
                        path,
                        graph,
                        k,
                        formulation,
                    })
                })
        })
        .collect();

    let config = solve_config(limits);
    let writer = Mutex::new(ResultsCsvWriter::create(output_csv)?);
    let record_task = |task: &BenchTask| -> bool {
        let Some(record) = run_task(task, &config) else {
            return false;
        };
        let mut writer = match writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match writer.write(&record) {
            Ok(()) => true,
            Err(e) => {
                error!("writing result row: {:#}", e);
                false
            }
        }
    };

    let written = if jobs <= 1 {
        tasks.iter().filter(|task| record_task(task)).count()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("building benchmark thread pool")?;
        pool.install(|| tasks.par_iter().filter(|task| record_task(task)).count())
    };

    info!(
        runs = tasks.len(),
        written,
        failed = tasks.len() - written,
        output = %output_csv.display(),
        "benchmark finished"
    );
    Ok(())
}

fn run_task(task: &BenchTask, config: &SolveConfig) -> Option<ResultsRecord> {
    let name = ResultsRecord::instance_name(task.path);
    info!(instance = %name, k = task.k, formulation = %task.formulation, "running");
    let solver = GoodLpSolver::default();
    match solve_kmst(task.graph, task.k, task.formulation, &solver, config) {
        Ok(run) => Some(results_record(task.path, &run)),
        Err(e) => {
            error!(
                instance = %name,
                k = task.k,
                formulation = %task.formulation,
                "run failed: {}",
                e
            );
            None
        }
    }
}

/// `*.dat` files of a directory, sorted by path.
fn discover_instances(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("reading directory: {}", dir.display()))?
    {
        let path = entry
            .with_context(|| format!("reading directory entry in {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "dat") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
