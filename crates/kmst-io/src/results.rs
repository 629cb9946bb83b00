//! Solution files, results records and benchmark CSV output.

use anyhow::{Context, Result};
use kmst_core::EdgeId;
use kmst_solver_common::SolveStatus;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Write one edge id per line.
pub fn write_solution(edges: &[EdgeId], path: &Path) -> Result<()> {
    let mut out = String::new();
    for edge in edges {
        out.push_str(&edge.to_string());
        out.push('\n');
    }
    std::fs::write(path, out)
        .with_context(|| format!("writing solution file: {}", path.display()))
}

/// One experiment row, shared by the JSON results file and the benchmark CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsRecord {
    /// Instance file stem
    pub instance: String,
    pub k: usize,
    pub formulation: String,
    pub status: SolveStatus,
    pub objective_value: Option<f64>,
    pub best_bound: Option<f64>,
    pub gap: Option<f64>,
    /// Seconds
    pub runtime: f64,
    pub n_nodes: usize,
    pub n_lazy_constraints: usize,
}

impl ResultsRecord {
    /// Round `gap` to 4 and `runtime` to 3 decimals, as written to disk.
    pub fn rounded(mut self) -> Self {
        self.gap = self.gap.map(|g| round_to(g, 4));
        self.runtime = round_to(self.runtime, 3);
        self
    }

    /// Instance name for a path: the file stem, or the whole path if it has none.
    pub fn instance_name(path: &Path) -> String {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }

    /// Write the record as a pretty JSON object.
    pub fn to_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing results record")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing results file: {}", path.display()))
    }

    pub fn from_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading results file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing results file: {}", path.display()))
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Benchmark CSV sink, flushed after every row so partial runs keep their
/// results.
pub struct ResultsCsvWriter {
    writer: csv::Writer<File>,
}

impl ResultsCsvWriter {
    /// Create (truncate) the file and write the header row.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if parent != Path::new("") {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating directory: {}", parent.display()))?;
            }
        }
        let file = File::create(path)
            .with_context(|| format!("creating results CSV: {}", path.display()))?;
        Ok(Self {
            writer: csv::Writer::from_writer(file),
        })
    }

    /// Open an existing file for appending; the header is written only if the
    /// file is empty.
    pub fn append(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening results CSV: {}", path.display()))?;
        let empty = file
            .metadata()
            .with_context(|| format!("reading metadata: {}", path.display()))?
            .len()
            == 0;
        let writer = csv::WriterBuilder::new().has_headers(empty).from_writer(file);
        Ok(Self { writer })
    }

    pub fn write(&mut self, record: &ResultsRecord) -> Result<()> {
        self.writer
            .serialize(record)
            .context("writing results row")?;
        self.writer.flush().context("flushing results CSV")
    }
}

/// Read every row of a results CSV.
pub fn read_results_csv(path: &Path) -> Result<Vec<ResultsRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening results CSV: {}", path.display()))?;
    reader
        .deserialize()
        .collect::<Result<Vec<ResultsRecord>, _>>()
        .with_context(|| format!("reading results CSV: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding() {
        let record = ResultsRecord {
            instance: "g01".into(),
            k: 5,
            formulation: "cec".into(),
            status: SolveStatus::TimeLimit,
            objective_value: Some(120.0),
            best_bound: Some(117.0),
            gap: Some(0.025_049_9),
            runtime: 1.234_56,
            n_nodes: 3,
            n_lazy_constraints: 11,
        }
        .rounded();
        assert_eq!(record.gap, Some(0.025));
        assert_eq!(record.runtime, 1.235);
    }

    #[test]
    fn test_instance_name_is_file_stem() {
        assert_eq!(ResultsRecord::instance_name(Path::new("data/g07.dat")), "g07");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_value(SolveStatus::TimeLimit).unwrap();
        assert_eq!(json, "time_limit");
    }
}
