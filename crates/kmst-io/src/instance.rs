//! Instance file format.
//!
//! ```text
//! 4            <- number of nodes, ids 1..=n
//! 4            <- number of edges
//! comment line
//! 0 1 2 3      <- edge_id node_i node_j cost
//! 1 2 3 4
//! ...
//! ```
//!
//! Data lines that do not hold exactly four integers are skipped.

use anyhow::{Context, Result};
use kmst_core::{Edge, GraphInstance, KmstError, KmstResult, NodeId};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Parse an instance file.
pub fn parse_instance_file(path: &Path) -> Result<GraphInstance> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading instance file: {}", path.display()))?;
    parse_instance_string(&content)
        .with_context(|| format!("parsing instance file: {}", path.display()))
}

/// Parse instance content from a string.
pub fn parse_instance_string(content: &str) -> KmstResult<GraphInstance> {
    let mut lines = content.lines();
    let n_nodes = parse_header(lines.next(), "node count")?;
    let n_edges = parse_header(lines.next(), "edge count")?;

    let mut edges = Vec::with_capacity(n_edges);
    for (offset, line) in lines.enumerate() {
        let values: Vec<u64> = match line
            .split_whitespace()
            .map(str::parse::<u64>)
            .collect::<Result<_, _>>()
        {
            Ok(values) => values,
            Err(_) => continue,
        };
        let [id, source, target, cost] = values[..] else {
            if !values.is_empty() {
                debug!(line = offset + 3, fields = values.len(), "skipping line");
            }
            continue;
        };
        edges.push(Edge::new(id as usize, source as usize, target as usize, cost));
    }

    if edges.len() != n_edges {
        warn!(
            declared = n_edges,
            found = edges.len(),
            "edge count in header does not match edge lines"
        );
    }

    GraphInstance::new((1..=n_nodes).map(NodeId::new), edges)
}

fn parse_header(line: Option<&str>, what: &str) -> KmstResult<usize> {
    let line = line.ok_or_else(|| KmstError::Parse(format!("missing {what}")))?;
    line.trim()
        .parse()
        .map_err(|_| KmstError::Parse(format!("invalid {what}: {:?}", line.trim())))
}

/// Render an instance in the file format, edges in graph order.
pub fn format_instance(graph: &GraphInstance) -> String {
    let mut out = format!("{}\n{}\n", graph.node_count(), graph.edge_count());
    out.push_str("edge_id node_i node_j cost\n");
    for edge in graph.edges() {
        let _ = writeln!(out, "{} {} {} {}", edge.id, edge.source, edge.target, edge.cost);
    }
    out
}

/// Write an instance file.
pub fn write_instance(graph: &GraphInstance, path: &Path) -> Result<()> {
    fs::write(path, format_instance(graph))
        .with_context(|| format!("writing instance file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmst_core::EdgeId;

    const SQUARE: &str = "4\n4\nsquare with unit costs\n0 1 2 1\n1 2 3 1\n2 3 4 1\n3 4 1 1\n";

    #[test]
    fn test_parse_square() {
        let graph = parse_instance_string(SQUARE).unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.node_id(0), NodeId::new(1));
        let last = graph.edge(3);
        assert_eq!(last.id, EdgeId::new(3));
        assert_eq!((last.source, last.target), (NodeId::new(4), NodeId::new(1)));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "3\n2\n\n0 1 2 5\n# trailing note\n1 2 3\n1 2 3 7 9\n2 2 3 4\n\n";
        let graph = parse_instance_string(text).unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edge(1).id, EdgeId::new(2));
    }

    #[test]
    fn test_count_mismatch_is_not_an_error() {
        let graph = parse_instance_string("3\n5\nc\n0 1 2 1\n").unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_bad_header_is_parse_error() {
        let err = parse_instance_string("four\n4\n").unwrap_err();
        assert!(matches!(err, KmstError::Parse(_)));
        let err = parse_instance_string("4\n").unwrap_err();
        assert!(err.to_string().contains("edge count"));
    }

    #[test]
    fn test_edge_to_unknown_node_is_invalid_graph() {
        let err = parse_instance_string("2\n1\nc\n0 1 3 1\n").unwrap_err();
        assert!(matches!(err, KmstError::InvalidGraph(_)));
    }

    #[test]
    fn test_format_matches_reader() {
        let graph = parse_instance_string(SQUARE).unwrap();
        let text = format_instance(&graph);
        assert!(text.starts_with("4\n4\n"));
        assert!(text.ends_with("3 4 1 1\n"));
        let again = parse_instance_string(&text).unwrap();
        assert_eq!(again.edges().collect::<Vec<_>>(), graph.edges().collect::<Vec<_>>());
    }
}
