use anyhow::{Context, Result};
use kmst_io::{generate_instance, write_instance};
use std::path::Path;
use tracing::info;

pub fn handle(nodes: usize, edges: usize, seed: u64, out: &Path) -> Result<()> {
    let graph = generate_instance(nodes, edges, seed)
        .with_context(|| format!("generating instance with {nodes} nodes and {edges} edges"))?;
    write_instance(&graph, out)?;
    info!(
        nodes,
        edges,
        seed,
        total_cost = graph.total_cost(),
        path = %out.display(),
        "instance written"
    );
    Ok(())
}
