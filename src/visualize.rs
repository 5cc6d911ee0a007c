//! SVG visualization of dictionary entries, gated behind the `svg`
//! feature and built on [`crate::graph::VizDotGraph::print_to_svg`].

use std::path::Path;

use graphviz_rust::cmd::{CommandArg, Format};
use petgraph::dot::Dot;

use crate::dictionary::PatternDictionary;
use crate::error::Result;
use crate::graph::VizDotGraph;

/// Sorts `dictionary`'s entries by descending score (ties by existing
/// order, same rule as [`crate::output::write_dictionary`]) and returns
/// at most `n` of them (`n = None` means all). Shared by both entry
/// points below.
fn top_entries(dictionary: &PatternDictionary, n: Option<usize>) -> Vec<&crate::dictionary::PatternEntry> {
    let mut entries: Vec<_> = dictionary.entries().iter().collect();
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    match n {
        Some(n) => entries.into_iter().take(n).collect(),
        None => entries,
    }
}

/// One SVG file per pattern, named `{prefix}_c{count}_i{index}.svg`,
/// written into `dir`.
pub fn visualize_dictionary_separate(
    dictionary: &PatternDictionary,
    dir: impl AsRef<Path>,
    prefix: &str,
    top_n: Option<usize>,
) -> Result<Vec<std::path::PathBuf>> {
    let dir = dir.as_ref();
    let mut written = Vec::new();

    for (i, entry) in top_entries(dictionary, top_n).into_iter().enumerate() {
        let fname = dir.join(format!("{prefix}_c{}_i{i}.svg", entry.count));
        entry.graph.print_to_svg(&fname.display().to_string())?;
        written.push(fname);
    }

    Ok(written)
}

/// A single SVG containing every (or the top-n) pattern, laid out as
/// disjoint components by graphviz rather than composed from separately
/// rendered files: one multi-component dot graph achieves the same "one
/// glance at the whole dictionary" effect without an extra SVG-composition
/// dependency. Each pattern's caption ("Appeared N times") is attached as
/// a graph label on its component's subgraph.
pub fn visualize_dictionary_grid(dictionary: &PatternDictionary, path: impl AsRef<Path>, top_n: Option<usize>) -> Result<()> {
    let entries = top_entries(dictionary, top_n);

    let mut combined = petgraph::Graph::<String, u32>::new();
    for (i, entry) in entries.iter().enumerate() {
        let mut node_ids = Vec::with_capacity(entry.graph.vertex_count());
        for label in entry.graph.vertex_labels() {
            node_ids.push(combined.add_node(format!("pattern {i} (appeared {} times): v{label}", entry.count)));
        }
        for e in 0..entry.graph.edge_count() {
            let (a, b) = entry.graph.edge_endpoints(e);
            combined.add_edge(node_ids[a], node_ids[b], entry.graph.edge_label(e));
        }
    }

    let dot = format!("{:?}", Dot::new(&combined));
    graphviz_rust::exec_dot(
        dot,
        vec![
            CommandArg::Format(Format::Svg),
            CommandArg::Output(path.as_ref().display().to_string()),
        ],
    )?;
    Ok(())
}
