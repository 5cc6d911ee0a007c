//! A bounded dictionary of recurring labeled subgraph patterns, each scored
//! by how much replacing its occurrences would compress the stream.

use log::debug;

use crate::graph::LabeledGraph;
use crate::isomorphism;

/// A `(graph, count, score)` triple. `graph` is immutable once an entry
/// exists; extensions always clone before modifying.
#[derive(Debug, Clone)]
pub struct PatternEntry {
    pub graph: LabeledGraph,
    pub count: usize,
    pub score: i64,
}

impl PatternEntry {
    fn new(graph: LabeledGraph, count: usize) -> Self {
        let score = score(&graph, count);
        Self { graph, count, score }
    }
}

/// `(|E(g)| - 1) * (count - 1)`. Single-edge patterns and singletons score
/// zero; scores grow with both pattern size and recurrence.
pub fn score(graph: &LabeledGraph, count: usize) -> i64 {
    (graph.edge_count() as i64 - 1) * (count as i64 - 1)
}

/// A bounded, unordered multiset of pattern entries. Ordering of
/// `entries()` carries no semantic meaning; only the set of
/// `(graph, count)` content does.
#[derive(Debug, Clone)]
pub struct PatternDictionary {
    entries: Vec<PatternEntry>,
    dict_size: Option<usize>,
    trim_count: usize,
}

impl PatternDictionary {
    /// `dict_size` is θ; `None` means +∞.
    pub fn new(dict_size: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            dict_size,
            trim_count: 0,
        }
    }

    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of times [`PatternDictionary::trim`] has actually truncated
    /// the dictionary, exposed for telemetry.
    pub fn trim_count(&self) -> usize {
        self.trim_count
    }

    /// Compares `pattern` against every existing entry in order; on an
    /// isomorphic match, increments that entry's count and recomputes its
    /// score. Otherwise trims (see below) and appends a fresh entry with
    /// count 1.
    pub fn update(&mut self, pattern: LabeledGraph) {
        for entry in self.entries.iter_mut() {
            if entry.graph.vertex_count() == pattern.vertex_count()
                && entry.graph.edge_count() == pattern.edge_count()
                && isomorphism::is_isomorphic(&entry.graph, &pattern)
            {
                entry.count += 1;
                entry.score = score(&entry.graph, entry.count);
                return;
            }
        }

        self.trim();
        self.entries.push(PatternEntry::new(pattern, 1));
        debug_assert!(
            !self.has_duplicate_isomorphic_entries(),
            "pattern dictionary invariant violated: two entries are label-preserving isomorphic"
        );
    }

    /// §7's "internal invariant violation" check: no two entries should
    /// ever be label-preserving isomorphic. Only ever consulted from a
    /// `debug_assert!`, since a violation indicates a bug in `update`
    /// itself, not a recoverable condition.
    fn has_duplicate_isomorphic_entries(&self) -> bool {
        for (i, a) in self.entries.iter().enumerate() {
            for b in &self.entries[i + 1..] {
                if a.graph.vertex_count() == b.graph.vertex_count()
                    && a.graph.edge_count() == b.graph.edge_count()
                    && isomorphism::is_isomorphic(&a.graph, &b.graph)
                {
                    return true;
                }
            }
        }
        false
    }

    /// Appends an entry with a pre-existing `count` verbatim, bypassing
    /// the isomorphism scan and trimming that [`PatternDictionary::update`]
    /// performs. Used only to rebuild a dictionary from persisted state,
    /// where entries are already known to be pairwise non-isomorphic.
    pub(crate) fn restore_entry(&mut self, graph: LabeledGraph, count: usize) {
        self.entries.push(PatternEntry::new(graph, count));
    }

    /// If `|P| > 2*theta`, sorts by score descending and truncates to
    /// theta, breaking ties by the existing (stable) insertion order. A
    /// no-op when θ is +∞.
    fn trim(&mut self) {
        let Some(theta) = self.dict_size else { return };
        if self.entries.len() > 2 * theta {
            self.entries.sort_by(|a, b| b.score.cmp(&a.score));
            self.entries.truncate(theta);
            self.trim_count += 1;
            debug!(
                "pattern dictionary trimmed to {theta} entries (trim #{})",
                self.trim_count
            );
        }
    }
}
