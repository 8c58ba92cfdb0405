use super::TraceGraph;
use crate::model::StepKind;

impl TraceGraph<'_> {
    /// Renders the graph as a Graphviz DOT string, one node per name group.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        out.push_str("digraph trace {\n");
        out.push_str("  rankdir=LR;\n");
        out.push_str("  node [fontname=\"Helvetica\", fontsize=10];\n");
        out.push_str("  edge [fontname=\"Helvetica\", fontsize=8];\n\n");

        for (idx, node) in self.nodes.iter().enumerate() {
            let name = if node.name.is_empty() {
                "(unnamed)"
            } else {
                node.name
            };
            out.push_str(&format!(
                "  g{} [label=\"{}\\n{} x{}\" shape={} pos=\"{},{}\"];\n",
                idx,
                escape_dot(name),
                node.kind,
                node.invocations(),
                dot_shape(node.kind),
                node.position.0,
                node.position.1,
            ));
        }

        out.push('\n');
        for edge in &self.edges {
            let (Some(from), Some(to)) = (self.index_of(edge.source), self.index_of(edge.target))
            else {
                continue;
            };
            let label_attr = edge
                .label
                .as_ref()
                .map(|l| format!(" [label=\"{}\"]", escape_dot(l)))
                .unwrap_or_default();
            out.push_str(&format!("  g{} -> g{}{};\n", from, to, label_attr));
        }

        out.push_str("}\n");
        out
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }
}

fn dot_shape(kind: StepKind) -> &'static str {
    match kind {
        StepKind::Agent => "doubleoctagon",
        StepKind::Llm => "box",
        StepKind::Tool => "ellipse",
        StepKind::Generic => "plaintext",
    }
}

fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
