use std::fs::File;
use std::io;

use crate::graph::LabeledGraph;

/// Serializes `graph` to `path` as JSON, overwriting any existing file.
/// serde_json errors are packed into an `io::Error` for the caller.
pub fn write_graph(graph: &LabeledGraph, path: &str) -> io::Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer(file, graph).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

/// Deserializes a graph previously written by [`write_graph`].
pub fn read_graph(path: &str) -> io::Result<LabeledGraph> {
    let file = File::open(path)?;
    serde_json::from_reader(file).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}
