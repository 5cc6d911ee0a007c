#[cfg(feature = "svg")]
use graphviz_rust::cmd::{CommandArg, Format};
use petgraph::dot::Dot;

use crate::graph::LabeledGraph;

/// Renders a [`LabeledGraph`] to graphviz dot notation, and, behind the
/// `svg` feature, to an `.svg` file via an installed graphviz engine.
pub trait VizDotGraph {
    /// Prints the given graph. This function returns a String.
    fn print(&self) -> String;

    /// Displays the given graph as a picture (.svg file).
    /// "path" specifies the file path to save the picture into.
    ///
    /// Requires a graphviz engine to be installed on the host machine, and
    /// the `svg` feature of this crate to be enabled.
    #[cfg(feature = "svg")]
    fn print_to_svg(&self, path: &str) -> Result<String, std::io::Error>;
}

impl VizDotGraph for LabeledGraph {
    fn print(&self) -> String {
        let mut repr = petgraph::Graph::<_, _>::new();
        let mut node_ids = Vec::with_capacity(self.vertex_count());
        for label in self.vertex_labels() {
            node_ids.push(repr.add_node(label));
        }
        for e in 0..self.edge_count() {
            let (a, b) = self.edge_endpoints(e);
            repr.add_edge(node_ids[a], node_ids[b], self.edge_label(e));
        }
        format!("{:?}", Dot::new(&repr))
    }

    #[cfg(feature = "svg")]
    fn print_to_svg(&self, path: &str) -> Result<String, std::io::Error> {
        graphviz_rust::exec_dot(
            self.print(),
            vec![
                CommandArg::Format(Format::Svg),
                CommandArg::Output(path.to_string()),
            ],
        )
    }
}
