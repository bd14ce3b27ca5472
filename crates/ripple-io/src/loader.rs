//! Edge-list dataset loading.

use std::path::Path;

use ripple_core::{EngineError, Graph, NodeId, Result, TrialStream};

/// Parse a whitespace-separated edge list, one `u v` pair per line.
///
/// An unreadable or malformed file is fatal to the operation.
pub fn read_edge_list(path: &Path) -> Result<Vec<(NodeId, NodeId)>> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        EngineError::InputMissing(format!(
            "failed to open graph file {}: {err}",
            path.display()
        ))
    })?;

    let mut tokens = content.split_whitespace();
    let mut edges = Vec::new();
    while let Some(first) = tokens.next() {
        let Some(second) = tokens.next() else {
            return Err(EngineError::InputMissing(format!(
                "dangling node id at the end of {}",
                path.display()
            )));
        };
        let u = parse_node(first, path)?;
        let v = parse_node(second, path)?;
        edges.push((u, v));
    }
    Ok(edges)
}

/// Load a dataset into a graph snapshot. The TR probabilities are drawn
/// from `seed`, so reloading with the same seed reproduces the snapshot.
pub fn load_graph(path: &Path, seed: u64) -> Result<Graph> {
    let edges = read_edge_list(path)?;
    let mut stream = TrialStream::new(seed);
    Graph::from_edges(&edges, &mut stream)
}

fn parse_node(token: &str, path: &Path) -> Result<NodeId> {
    token.parse::<NodeId>().map_err(|_| {
        EngineError::InputMissing(format!(
            "invalid node id {token:?} in {}",
            path.display()
        ))
    })
}
