//! The batch iterator: Match, Extend, Install, Cover. The central algorithm
//! of this crate, built on [`crate::isomorphism::enumerate_subisomorphisms`]
//! and the [`LabeledGraph`] primitive.

use std::collections::{HashMap, HashSet};

use crate::dictionary::PatternDictionary;
use crate::graph::{EdgeId, LabeledGraph, VertexId};
use crate::isomorphism;

/// Runs Match/Extend/Install/Cover for one batch against `dictionary`,
/// mutating it via repeated calls to [`PatternDictionary::update`].
/// `match_strict` selects label-aware vs. structure-only matching.
pub fn process_batch(dictionary: &mut PatternDictionary, batch: &LabeledGraph, match_strict: bool) {
    if batch.edge_count() == 0 {
        return;
    }

    let mut taken: HashSet<EdgeId> = HashSet::new();
    let mut new_patterns: Vec<LabeledGraph> = Vec::new();

    // Step 1 (Match): a fixed snapshot of P taken at entry. Patterns
    // installed during this round (Step 3) must not be revisited.
    let snapshot: Vec<LabeledGraph> = dictionary.entries().iter().map(|e| e.graph.clone()).collect();

    for pattern in &snapshot {
        if pattern.edge_count() >= batch.edge_count() {
            // A pattern with at least as many edges as the batch cannot be
            // strictly extended, so no embedding is worth enumerating.
            continue;
        }

        let embeddings = if match_strict {
            isomorphism::enumerate_subisomorphisms(batch, pattern)
        } else {
            isomorphism::enumerate_subisomorphisms_loose(batch, pattern)
        };

        // Step 2 (Extend): one p_new per embedding, accumulated across all
        // vertex positions of that embedding before being installed.
        for embedding in &embeddings {
            if let Some(extended) = extend_pattern(pattern, batch, embedding, &mut taken) {
                new_patterns.push(extended);
            }
        }
    }

    // Step 3 (Install): P is not touched until matching has fully
    // completed.
    for pattern in new_patterns {
        dictionary.update(pattern);
    }

    // Step 4 (Cover the residue): every edge not claimed by an extension
    // gets a baseline single-edge pattern, so it contributes to some
    // pattern's count.
    for e in 0..batch.edge_count() {
        if taken.contains(&e) {
            continue;
        }
        let (u, v) = batch.edge_endpoints(e);
        let mut residue = LabeledGraph::new(batch.is_directed());
        let a = residue.add_vertex(batch.vertex_label(u));
        let b = residue.add_vertex(batch.vertex_label(v));
        residue.add_edge(a, b, batch.edge_label(e));
        dictionary.update(residue);
    }
}

/// Extends `pattern` by one layer drawn from `batch` around a single
/// embedding `embedding` (pattern vertex position -> batch vertex
/// position). Returns `None` if nothing was added. Marks every batch edge
/// examined as `taken`, including edges already covered by `pattern`.
fn extend_pattern(
    pattern: &LabeledGraph,
    batch: &LabeledGraph,
    embedding: &[VertexId],
    taken: &mut HashSet<EdgeId>,
) -> Option<LabeledGraph> {
    debug_assert_eq!(
        embedding.len(),
        pattern.vertex_count(),
        "embedding must map every pattern vertex"
    );
    debug_assert!(
        embedding.iter().all(|&b_v| b_v < batch.vertex_count()),
        "embedding references a vertex position outside the batch graph"
    );

    let mut psi: HashMap<VertexId, VertexId> = HashMap::new();
    for (p_v, &b_v) in embedding.iter().enumerate() {
        psi.insert(b_v, p_v);
    }

    let mut extended: Option<LabeledGraph> = None;

    for (p_v, &b_v) in embedding.iter().enumerate() {
        // Fast pre-filter: an extension at i is only possible if B has
        // strictly more edges incident to phi(i) than p has incident to
        // i, checked against the unmodified parent pattern.
        if batch.incident_edges(b_v).count() <= pattern.incident_edges(p_v).count() {
            continue;
        }

        for e in batch.incident_edges(b_v) {
            let (src, dst) = batch.edge_endpoints(e);
            let label = batch.edge_label(e);
            let src_mapped = psi.get(&src).copied();
            let dst_mapped = psi.get(&dst).copied();

            match (src_mapped, dst_mapped) {
                (Some(ps), Some(pd)) => {
                    // (b) cycle-closing, or (c) already covered.
                    let already = extended.as_ref().unwrap_or(pattern).are_connected(ps, pd);
                    if !already {
                        extended.get_or_insert_with(|| pattern.clone()).add_edge(ps, pd, label);
                    }
                }
                (Some(ps), None) => {
                    // (a) new target vertex on the `dst` side.
                    let g = extended.get_or_insert_with(|| pattern.clone());
                    let new_v = g.add_vertex(batch.vertex_label(dst));
                    g.add_edge(ps, new_v, label);
                }
                (None, Some(pd)) => {
                    // (a) new target vertex on the `src` side.
                    let g = extended.get_or_insert_with(|| pattern.clone());
                    let new_v = g.add_vertex(batch.vertex_label(src));
                    g.add_edge(new_v, pd, label);
                }
                (None, None) => unreachable!("e is incident to b_v, which is always mapped"),
            }

            taken.insert(e);
        }
    }

    extended
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(label: u32, edge_label: u32) -> LabeledGraph {
        let mut g = LabeledGraph::new(false);
        let a = g.add_vertex(label);
        let b = g.add_vertex(label);
        let c = g.add_vertex(label);
        g.add_edge(a, b, edge_label);
        g.add_edge(b, c, edge_label);
        g.add_edge(a, c, edge_label);
        g
    }

    #[test]
    fn single_triangle_batch_against_empty_dict_is_covered_as_residue() {
        // With P empty, Match/Extend/Install have nothing to work with;
        // all three edges fall through to residue coverage and, being
        // structurally identical (same vertex-label pair, same edge
        // label), merge into a single entry.
        let mut dict = PatternDictionary::new(None);
        process_batch(&mut dict, &triangle(1, 9), true);

        assert_eq!(dict.len(), 1);
        assert_eq!(dict.entries()[0].count, 3);
        assert_eq!(dict.entries()[0].graph.edge_count(), 1);
        assert_eq!(dict.entries()[0].score, 0);
    }

    #[test]
    fn two_disjoint_triangles_with_distinct_labels_stay_separate() {
        let mut dict = PatternDictionary::new(None);
        process_batch(&mut dict, &triangle(1, 9), true);
        process_batch(&mut dict, &triangle(2, 9), true);

        assert_eq!(dict.len(), 2);
        for entry in dict.entries() {
            assert_eq!(entry.count, 3);
            assert_eq!(entry.graph.edge_count(), 1);
        }
    }

    #[test]
    fn edge_repetition_scores_zero() {
        let mut dict = PatternDictionary::new(None);
        for _ in 0..5 {
            let mut g = LabeledGraph::new(false);
            let a = g.add_vertex(1);
            let b = g.add_vertex(2);
            g.add_edge(a, b, 7);
            process_batch(&mut dict, &g, true);
        }

        assert_eq!(dict.len(), 1);
        assert_eq!(dict.entries()[0].count, 5);
        assert_eq!(dict.entries()[0].score, 0);
    }

    #[test]
    fn cycle_closure_extends_path_into_triangle() {
        // Distinct per-vertex labels pin the embedding uniquely (no
        // automorphism), so the traced outcome is exact: matching a
        // pattern does not itself bump its count (only `update` calls do,
        // and the parent pattern is never re-submitted), so the path
        // entry is untouched; the newly installed triangle gets count 1
        // and therefore score 0, per the score formula.
        let mut dict = PatternDictionary::new(None);
        let mut path = LabeledGraph::new(false);
        let a = path.add_vertex(1);
        let b = path.add_vertex(2);
        let c = path.add_vertex(3);
        path.add_edge(a, b, 9);
        path.add_edge(b, c, 9);
        dict.update(path);

        let mut batch = LabeledGraph::new(false);
        let x = batch.add_vertex(1);
        let y = batch.add_vertex(2);
        let z = batch.add_vertex(3);
        batch.add_edge(x, y, 9);
        batch.add_edge(y, z, 9);
        batch.add_edge(x, z, 9);

        process_batch(&mut dict, &batch, true);

        assert_eq!(dict.len(), 2);
        let path_entry = dict
            .entries()
            .iter()
            .find(|e| e.graph.edge_count() == 2)
            .expect("path entry still present");
        assert_eq!(path_entry.count, 1);

        let triangle_entry = dict
            .entries()
            .iter()
            .find(|e| e.graph.edge_count() == 3)
            .expect("triangle entry installed");
        assert_eq!(triangle_entry.count, 1);
        assert_eq!(triangle_entry.score, 0);
    }

    #[test]
    fn label_discrimination_keeps_entries_distinct() {
        let mut dict = PatternDictionary::new(None);
        let mut g = LabeledGraph::new(false);
        let a = g.add_vertex(1);
        let b = g.add_vertex(1);
        let c1 = g.add_vertex(1);
        g.add_edge(a, b, 9);
        g.add_edge(b, c1, 9);
        g.add_edge(a, c1, 9);
        let d = g.add_vertex(1);
        let e = g.add_vertex(1);
        let f = g.add_vertex(2);
        g.add_edge(d, e, 9);
        g.add_edge(e, f, 9);
        g.add_edge(d, f, 9);

        process_batch(&mut dict, &g, true);

        assert_eq!(dict.len(), 2);
    }
}
