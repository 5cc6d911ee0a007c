use petgraph::graph::{EdgeIndex, Graph as PetGraph, NodeIndex};
use petgraph::Direction::{Incoming, Outgoing};
use serde::{Deserialize, Serialize};

/// A non-negative integer label. Vertex labels and edge labels share this
/// representation but live in distinct namespaces.
pub type Label = u32;

/// Zero-based vertex position, stable as long as no vertex is removed.
pub type VertexId = usize;

/// Zero-based edge position, stable as long as no edge is removed.
pub type EdgeId = usize;

/// A labeled (multi-)graph value, directed or undirected as fixed at
/// construction.
///
/// Internally this always stores edges as a directed petgraph `Graph`; the
/// `directed` flag only changes how [`LabeledGraph::are_connected`] and the
/// isomorphism engine interpret that storage, so undirected graphs never pay
/// for a second representation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LabeledGraph {
    directed: bool,
    inner: PetGraph<Label, Label>,
}

impl LabeledGraph {
    /// Creates an empty graph. `directed` is immutable for the life of the
    /// value.
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            inner: PetGraph::new(),
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn vertex_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Adds a vertex carrying `label`, returning its position.
    pub fn add_vertex(&mut self, label: Label) -> VertexId {
        self.inner.add_node(label).index()
    }

    /// Adds an edge `source -> target` carrying `label`, returning its
    /// position. Callers wanting to suppress parallel edges must check
    /// [`LabeledGraph::are_connected`] first; this method always inserts.
    pub fn add_edge(&mut self, source: VertexId, target: VertexId, label: Label) -> EdgeId {
        self.inner
            .add_edge(NodeIndex::new(source), NodeIndex::new(target), label)
            .index()
    }

    pub fn vertex_label(&self, v: VertexId) -> Label {
        self.inner[NodeIndex::new(v)]
    }

    pub fn edge_label(&self, e: EdgeId) -> Label {
        self.inner[EdgeIndex::new(e)]
    }

    /// `(source, target)` positions of edge `e`, in insertion order.
    pub fn edge_endpoints(&self, e: EdgeId) -> (VertexId, VertexId) {
        let (a, b) = self
            .inner
            .edge_endpoints(EdgeIndex::new(e))
            .expect("edge id out of range");
        (a.index(), b.index())
    }

    /// Vertex labels in position order.
    pub fn vertex_labels(&self) -> Vec<Label> {
        self.inner.node_weights().copied().collect()
    }

    /// Edge labels in position order.
    pub fn edge_labels(&self) -> Vec<Label> {
        self.inner.edge_weights().copied().collect()
    }

    /// All edges incident to `v`, "ALL" semantics regardless of direction:
    /// chains incoming and outgoing edges unconditionally, because the
    /// extension algorithm needs every candidate edge adjacent to a mapped
    /// vertex, in directed graphs too. This is the one place this crate
    /// deliberately departs from a naive "outgoing-only" default a
    /// petgraph-backed graph would otherwise hand you.
    pub fn incident_edges(&self, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.inner
            .edges_directed(NodeIndex::new(v), Incoming)
            .map(|e| e.id())
            .chain(
                self.inner
                    .edges_directed(NodeIndex::new(v), Outgoing)
                    .map(|e| e.id()),
            )
            .map(|id| id.index())
    }

    /// Edges with `v` as source. Used by the isomorphism engine to tell
    /// predecessors from successors in directed graphs; undirected graphs
    /// have no such distinction, so callers fall back to
    /// [`LabeledGraph::incident_edges`] in that case.
    pub(crate) fn outgoing_edges(&self, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.inner
            .edges_directed(NodeIndex::new(v), Outgoing)
            .map(|e| e.id().index())
    }

    /// Edges with `v` as target. See [`LabeledGraph::outgoing_edges`].
    pub(crate) fn incoming_edges(&self, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.inner
            .edges_directed(NodeIndex::new(v), Incoming)
            .map(|e| e.id().index())
    }

    /// True iff there is an edge between `u` and `v`. For directed graphs
    /// only `u -> v` counts; for undirected graphs either direction counts.
    pub fn are_connected(&self, u: VertexId, v: VertexId) -> bool {
        let has_directed_edge = |a: VertexId, b: VertexId| {
            self.inner
                .edges_directed(NodeIndex::new(a), Outgoing)
                .any(|e| e.target().index() == b)
        };
        if has_directed_edge(u, v) {
            return true;
        }
        !self.directed && has_directed_edge(v, u)
    }
}
