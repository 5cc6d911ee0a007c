//! The dictionary dump writer.

use std::io::{self, Write};

use crate::dictionary::PatternDictionary;

/// Writes every entry of `dictionary` in descending score order, in this
/// text format:
///
/// ```text
/// % Pattern <i>
/// % Score:  <s>
/// % Count:  <c>
/// v 0 <label_0>
/// v 1 <label_1>
/// ...
/// e <src_idx> <dst_idx> <label>
/// ...
/// ```
///
/// Ties are broken by the dictionary's existing entry order (stable
/// sort), matching trim's own tie-break rule.
pub fn write_dictionary<W: Write>(dictionary: &PatternDictionary, mut out: W) -> io::Result<()> {
    let mut ordered: Vec<_> = dictionary.entries().iter().enumerate().collect();
    ordered.sort_by(|(_, a), (_, b)| b.score.cmp(&a.score));

    for (i, (_, entry)) in ordered.into_iter().enumerate() {
        writeln!(out, "% Pattern {i}")?;
        writeln!(out, "% Score:  {}", entry.score)?;
        writeln!(out, "% Count:  {}", entry.count)?;
        for (v, label) in entry.graph.vertex_labels().into_iter().enumerate() {
            writeln!(out, "v {v} {label}")?;
        }
        for e in 0..entry.graph.edge_count() {
            let (src, dst) = entry.graph.edge_endpoints(e);
            writeln!(out, "e {src} {dst} {}", entry.graph.edge_label(e))?;
        }
    }

    Ok(())
}
