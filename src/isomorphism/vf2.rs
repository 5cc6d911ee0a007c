use std::collections::{HashMap, HashSet};

use bimap::BiHashMap;

use crate::graph::{Label, LabeledGraph, VertexId};

/// True iff there is a label-and-structure-preserving bijection between
/// `g1` and `g2`. Re-checks `|V|`/`|E|` equality even though callers are
/// expected to pre-filter on it.
pub fn is_isomorphic(g1: &LabeledGraph, g2: &LabeledGraph) -> bool {
    if g1.vertex_count() != g2.vertex_count()
        || g1.edge_count() != g2.edge_count()
        || g1.is_directed() != g2.is_directed()
    {
        return false;
    }
    !enumerate_subisomorphisms(g1, g2).is_empty()
}

/// Every injective, label-and-structure-preserving mapping of `pattern`'s
/// vertices into `host`'s vertices. Returned as a sequence of maps, each
/// indexed by vertex position of `pattern`. Empty if no embedding exists.
/// `host` and `pattern` must agree on directedness.
pub fn enumerate_subisomorphisms(host: &LabeledGraph, pattern: &LabeledGraph) -> Vec<Vec<VertexId>> {
    search(host, pattern, true)
}

/// Like [`enumerate_subisomorphisms`], but ignores vertex and edge labels
/// entirely: structure-only matching, used when `match_strict` is
/// disabled.
pub fn enumerate_subisomorphisms_loose(host: &LabeledGraph, pattern: &LabeledGraph) -> Vec<Vec<VertexId>> {
    search(host, pattern, false)
}

fn search(host: &LabeledGraph, pattern: &LabeledGraph, label_sensitive: bool) -> Vec<Vec<VertexId>> {
    assert_eq!(
        host.is_directed(),
        pattern.is_directed(),
        "cannot match graphs with different directedness"
    );
    let mut matcher = Matcher::new(pattern, host, label_sensitive);
    matcher.run();
    matcher.results
}

/// Successor vertices of `v` in `g`: neighbors via an edge with `v` as
/// source (directed), or any incident neighbor (undirected, no direction
/// to speak of).
fn successors(g: &LabeledGraph, v: VertexId) -> Vec<VertexId> {
    let edges: Vec<_> = if g.is_directed() {
        g.outgoing_edges(v).collect()
    } else {
        g.incident_edges(v).collect()
    };
    edges
        .into_iter()
        .map(|e| {
            let (a, b) = g.edge_endpoints(e);
            if a == v {
                b
            } else {
                a
            }
        })
        .collect()
}

/// Predecessor vertices of `v` in `g`. See [`successors`].
fn predecessors(g: &LabeledGraph, v: VertexId) -> Vec<VertexId> {
    let edges: Vec<_> = if g.is_directed() {
        g.incoming_edges(v).collect()
    } else {
        g.incident_edges(v).collect()
    };
    edges
        .into_iter()
        .map(|e| {
            let (a, b) = g.edge_endpoints(e);
            if b == v {
                a
            } else {
                b
            }
        })
        .collect()
}

/// Every label on edges directed `u -> v` (directed graphs) or between `u`
/// and `v` in either order (undirected graphs).
fn edge_labels_between(g: &LabeledGraph, u: VertexId, v: VertexId) -> Vec<Label> {
    if g.is_directed() {
        g.outgoing_edges(u)
            .filter_map(|e| {
                let (a, b) = g.edge_endpoints(e);
                (a == u && b == v).then(|| g.edge_label(e))
            })
            .collect()
    } else {
        g.incident_edges(u)
            .filter_map(|e| {
                let (a, b) = g.edge_endpoints(e);
                ((a == u && b == v) || (a == v && b == u)).then(|| g.edge_label(e))
            })
            .collect()
    }
}

/// VF2 state: a partial mapping `core` (pattern vertex -> host vertex) plus
/// the four frontier depth-maps used to pick the next candidate pair and
/// prune infeasible ones.
struct Matcher<'a> {
    pattern: &'a LabeledGraph,
    host: &'a LabeledGraph,
    label_sensitive: bool,
    core: BiHashMap<VertexId, VertexId>,
    out1: HashMap<VertexId, usize>,
    out2: HashMap<VertexId, usize>,
    in1: HashMap<VertexId, usize>,
    in2: HashMap<VertexId, usize>,
    results: Vec<Vec<VertexId>>,
}

impl<'a> Matcher<'a> {
    fn new(pattern: &'a LabeledGraph, host: &'a LabeledGraph, label_sensitive: bool) -> Self {
        Self {
            pattern,
            host,
            label_sensitive,
            core: BiHashMap::new(),
            out1: HashMap::new(),
            out2: HashMap::new(),
            in1: HashMap::new(),
            in2: HashMap::new(),
            results: Vec::new(),
        }
    }

    fn run(&mut self) {
        if self.pattern.vertex_count() == 0
            || self.pattern.vertex_count() > self.host.vertex_count()
            || self.pattern.edge_count() > self.host.edge_count()
        {
            return;
        }
        self.search(0);
    }

    fn search(&mut self, depth: usize) {
        if depth == self.pattern.vertex_count() {
            self.record_result();
            return;
        }
        let (n, hosts) = self.candidates();
        let Some(n) = n else { return };
        for m in hosts {
            self.assign(n, m, depth);
            if self.is_valid(n, m) {
                self.search(depth + 1);
            }
            self.unassign(n, m, depth);
        }
    }

    /// Picks the next pattern vertex to extend the mapping with, preferring
    /// the out-frontier, then the in-frontier, then any unmatched vertex as
    /// a fallback.
    fn candidates(&self) -> (Option<VertexId>, Vec<VertexId>) {
        let frontier = self.frontier(&self.out1, &self.out2);
        if frontier.0.is_some() && !frontier.1.is_empty() {
            return frontier;
        }
        let frontier = self.frontier(&self.in1, &self.in2);
        if frontier.0.is_some() && !frontier.1.is_empty() {
            return frontier;
        }
        self.unconnected()
    }

    fn frontier(
        &self,
        p_map: &HashMap<VertexId, usize>,
        h_map: &HashMap<VertexId, usize>,
    ) -> (Option<VertexId>, Vec<VertexId>) {
        let n = p_map
            .keys()
            .filter(|v| !self.core.contains_left(v))
            .min()
            .copied();
        let hosts = h_map
            .keys()
            .filter(|v| !self.core.contains_right(v))
            .copied()
            .collect();
        (n, hosts)
    }

    fn unconnected(&self) -> (Option<VertexId>, Vec<VertexId>) {
        let n = (0..self.pattern.vertex_count()).find(|v| !self.core.contains_left(v));
        let hosts = (0..self.host.vertex_count())
            .filter(|v| !self.core.contains_right(v))
            .collect();
        (n, hosts)
    }

    fn assign(&mut self, n: VertexId, m: VertexId, depth: usize) {
        self.core.insert(n, m);
        self.out1.entry(n).or_insert(depth);
        self.out2.entry(m).or_insert(depth);
        self.in1.entry(n).or_insert(depth);
        self.in2.entry(m).or_insert(depth);

        for n2 in successors(self.pattern, n) {
            self.out1.entry(n2).or_insert(depth);
        }
        for m2 in successors(self.host, m) {
            self.out2.entry(m2).or_insert(depth);
        }
        for n2 in predecessors(self.pattern, n) {
            self.in1.entry(n2).or_insert(depth);
        }
        for m2 in predecessors(self.host, m) {
            self.in2.entry(m2).or_insert(depth);
        }
    }

    fn unassign(&mut self, n: VertexId, m: VertexId, depth: usize) {
        self.core.remove_by_left(&n);
        Self::remove_at_depth(n, depth, &mut self.out1);
        Self::remove_at_depth(m, depth, &mut self.out2);
        Self::remove_at_depth(n, depth, &mut self.in1);
        Self::remove_at_depth(m, depth, &mut self.in2);
        for n2 in successors(self.pattern, n) {
            Self::remove_at_depth(n2, depth, &mut self.out1);
        }
        for m2 in successors(self.host, m) {
            Self::remove_at_depth(m2, depth, &mut self.out2);
        }
        for n2 in predecessors(self.pattern, n) {
            Self::remove_at_depth(n2, depth, &mut self.in1);
        }
        for m2 in predecessors(self.host, m) {
            Self::remove_at_depth(m2, depth, &mut self.in2);
        }
    }

    fn remove_at_depth(v: VertexId, depth: usize, map: &mut HashMap<VertexId, usize>) {
        if map.get(&v) == Some(&depth) {
            map.remove(&v);
        }
    }

    fn is_valid(&self, n: VertexId, m: VertexId) -> bool {
        (!self.label_sensitive || self.pattern.vertex_label(n) == self.host.vertex_label(m))
            && self.check_predecessor_relation(n, m)
            && self.check_successor_relation(n, m)
            && self.check_edge_semantics(n, m)
    }

    fn check_predecessor_relation(&self, n: VertexId, m: VertexId) -> bool {
        let n_preds: HashSet<_> = predecessors(self.pattern, n)
            .into_iter()
            .filter(|p| self.core.contains_left(p))
            .collect();
        let m_preds: HashSet<_> = predecessors(self.host, m)
            .into_iter()
            .filter(|p| self.core.contains_right(p))
            .collect();
        n_preds
            .iter()
            .all(|p| matches!(self.core.get_by_left(p), Some(q) if m_preds.contains(q)))
    }

    fn check_successor_relation(&self, n: VertexId, m: VertexId) -> bool {
        let n_succs: HashSet<_> = successors(self.pattern, n)
            .into_iter()
            .filter(|s| self.core.contains_left(s))
            .collect();
        let m_succs: HashSet<_> = successors(self.host, m)
            .into_iter()
            .filter(|s| self.core.contains_right(s))
            .collect();
        n_succs
            .iter()
            .all(|s| matches!(self.core.get_by_left(s), Some(t) if m_succs.contains(t)))
    }

    /// Every pattern edge touching `n` whose other endpoint is already
    /// mapped must have a same-labeled counterpart between `m` and that
    /// endpoint's image in `host`. Subgraph isomorphism only requires
    /// pattern edges to be present in the host, never the reverse; that
    /// asymmetry is what distinguishes it from full isomorphism, where
    /// equal `|E|` after an otherwise-successful search forces a bijection.
    fn check_edge_semantics(&self, n: VertexId, m: VertexId) -> bool {
        for n2 in successors(self.pattern, n) {
            if let Some(&m2) = self.core.get_by_left(&n2) {
                if !self.has_matching_edges(n, n2, m, m2) {
                    return false;
                }
            }
        }
        for n2 in predecessors(self.pattern, n) {
            if let Some(&m2) = self.core.get_by_left(&n2) {
                if !self.has_matching_edges(n2, n, m2, m) {
                    return false;
                }
            }
        }
        true
    }

    /// Compares label *multisets*, not just label sets: two parallel
    /// pattern edges of the same label between `pu`/`pv` require two (or
    /// more) host edges of that label between `hu`/`hv`, not merely one.
    fn has_matching_edges(&self, pu: VertexId, pv: VertexId, hu: VertexId, hv: VertexId) -> bool {
        let pattern_labels = edge_labels_between(self.pattern, pu, pv);
        if pattern_labels.is_empty() {
            return true;
        }
        if !self.label_sensitive {
            return !edge_labels_between(self.host, hu, hv).is_empty();
        }
        let mut host_counts: HashMap<Label, usize> = HashMap::new();
        for l in edge_labels_between(self.host, hu, hv) {
            *host_counts.entry(l).or_insert(0) += 1;
        }
        let mut pattern_counts: HashMap<Label, usize> = HashMap::new();
        for l in pattern_labels {
            *pattern_counts.entry(l).or_insert(0) += 1;
        }
        pattern_counts
            .iter()
            .all(|(label, count)| host_counts.get(label).copied().unwrap_or(0) >= *count)
    }

    fn record_result(&mut self) {
        let map = (0..self.pattern.vertex_count())
            .map(|i| *self.core.get_by_left(&i).expect("pattern vertex unmapped at full depth"))
            .collect();
        self.results.push(map);
    }
}
