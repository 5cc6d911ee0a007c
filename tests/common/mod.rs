//! Shared fixtures for the integration tests. This crate's patterns are
//! concrete labeled graphs, so the fixtures here build [`LabeledGraph`]
//! values directly.

use graphzip::graph::LabeledGraph;

/// A directed-or-undirected triangle on three vertices all carrying
/// `vertex_label`, edges all carrying `edge_label`.
pub fn triangle(directed: bool, vertex_label: u32, edge_label: u32) -> LabeledGraph {
    let mut g = LabeledGraph::new(directed);
    let a = g.add_vertex(vertex_label);
    let b = g.add_vertex(vertex_label);
    let c = g.add_vertex(vertex_label);
    g.add_edge(a, b, edge_label);
    g.add_edge(b, c, edge_label);
    g.add_edge(a, c, edge_label);
    g
}

/// A 3-vertex path `a - b - c` with distinct per-vertex labels (no
/// automorphism), all edges carrying `edge_label`.
pub fn distinct_path(edge_label: u32) -> LabeledGraph {
    let mut g = LabeledGraph::new(false);
    let a = g.add_vertex(1);
    let b = g.add_vertex(2);
    let c = g.add_vertex(3);
    g.add_edge(a, b, edge_label);
    g.add_edge(b, c, edge_label);
    g
}

/// Writes `contents` to `name` inside `dir`, returning the path as a
/// string.
pub fn write_graph_file(dir: &test_dir::TestDir, name: &str, contents: &str) -> String {
    let path = dir.path(name);
    std::fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}
