use kmst_algo::{KmstRun, SolveConfig};
use kmst_cli::cli::LimitArgs;
use kmst_io::ResultsRecord;
use std::path::Path;
use std::time::Duration;

pub fn solve_config(limits: &LimitArgs) -> SolveConfig {
    SolveConfig {
        threads: limits.threads.max(1),
        time_limit: Duration::from_secs(limits.timelimit),
        memory_limit_gb: limits.memorylimit,
    }
}

/// Results row for a finished run on the instance at `path`.
pub fn results_record(path: &Path, run: &KmstRun) -> ResultsRecord {
    ResultsRecord {
        instance: ResultsRecord::instance_name(path),
        k: run.k,
        formulation: run.formulation.as_str().to_string(),
        status: run.status,
        objective_value: run.objective_value,
        best_bound: run.best_bound,
        gap: run.gap,
        runtime: run.runtime,
        n_nodes: run.n_nodes,
        n_lazy_constraints: run.n_lazy_constraints,
    }
    .rounded()
}

/// `floor(n/2)` and `ceil(2n/3)`, clamped to `0..=n`, deduplicated.
pub fn bench_k_values(n_nodes: usize) -> Vec<usize> {
    if n_nodes == 0 {
        return Vec::new();
    }
    let mut ks = vec![n_nodes / 2, (2 * n_nodes).div_ceil(3)];
    ks.iter_mut().for_each(|k| *k = (*k).min(n_nodes));
    ks.dedup();
    ks
}
