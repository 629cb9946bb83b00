use anyhow::Result;
use kmst_core::instance_stats;
use kmst_io::parse_instance_file;
use std::path::Path;

pub fn handle(instance: &Path) -> Result<()> {
    let graph = parse_instance_file(instance)?;
    let stats = instance_stats(&graph);
    println!("Instance statistics for {}:", instance.display());
    println!("  Nodes         : {}", stats.node_count);
    println!("  Edges         : {}", stats.edge_count);
    println!("  Components    : {}", stats.connected_components);
    println!("  Degree [min/max]: {}/{}", stats.min_degree, stats.max_degree);
    println!("  Density       : {:.4}", stats.density);
    println!("  Total cost    : {}", stats.total_cost);
    Ok(())
}
