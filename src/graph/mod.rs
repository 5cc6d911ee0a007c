//! The labeled (multi-)graph value type used everywhere in this crate: as
//! the batch graph, as a pattern, and as the unit the isomorphism engine
//! operates over.
//!
//! This crate only ever needs one concrete graph representation, so
//! [`LabeledGraph`] is a plain struct wrapping `petgraph::Graph` rather than
//! a trait object over swappable backends.

mod labeled_graph;
pub use labeled_graph::{EdgeId, Label, LabeledGraph, VertexId};

/// Serializing graphs to JSON files.
mod file_io;
pub use file_io::{read_graph, write_graph};

/// Printing graph visualizations in graphviz dot format.
mod print;
pub use print::VizDotGraph;
