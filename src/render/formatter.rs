use crate::hierarchy::{NodeId, SpanTree, SpanTreeNode};

/// Nesting levels drawn with indentation; deeper nodes keep the last indent and
/// show their depth instead.
pub const MAX_INDENT_LEVELS: usize = 64;

/// Formats span trees into human-readable, indented text.
pub struct TreeFormatter;

struct Pending {
    id: NodeId,
    prefix: String,
    is_last: bool,
    depth: usize,
}

impl TreeFormatter {
    /// Renders every node reachable from the synthetic root, one line per step.
    ///
    /// Uses an explicit stack; indentation stops growing after [`MAX_INDENT_LEVELS`].
    pub fn format(tree: &SpanTree<'_>) -> String {
        let mut out = String::from("trace\n");
        let mut stack: Vec<Pending> = Vec::new();
        Self::push_children(&mut stack, &tree.root().children, "", 1);

        while let Some(Pending {
            id,
            prefix,
            is_last,
            depth,
        }) = stack.pop()
        {
            let Some(node) = tree.get(id) else {
                continue;
            };
            let connector = if is_last { "└── " } else { "├── " };
            out.push_str(&prefix);
            out.push_str(connector);
            if depth > MAX_INDENT_LEVELS {
                out.push_str(&format!("[depth {}] ", depth));
            }
            out.push_str(&Self::format_node(node));
            out.push('\n');

            let child_prefix = if depth >= MAX_INDENT_LEVELS {
                prefix
            } else {
                format!("{}{}", prefix, if is_last { "    " } else { "│   " })
            };
            Self::push_children(&mut stack, &node.children, &child_prefix, depth + 1);
        }
        out
    }

    /// Pushes children in reverse so they pop in display order.
    fn push_children(stack: &mut Vec<Pending>, children: &[NodeId], prefix: &str, depth: usize) {
        let last = children.len().saturating_sub(1);
        for (i, &child) in children.iter().enumerate().rev() {
            stack.push(Pending {
                id: child,
                prefix: prefix.to_string(),
                is_last: i == last,
                depth,
            });
        }
    }

    /// `name [kind] duration`, falling back to the id for unnamed steps.
    fn format_node(node: &SpanTreeNode<'_>) -> String {
        let Some(step) = node.step else {
            return node.id.to_string();
        };
        let label = step.name.as_deref().unwrap_or(node.id);
        match step.duration_ns {
            Some(ns) => format!("{} [{}] {}", label, step.kind(), Self::format_duration(ns)),
            None => format!("{} [{}]", label, step.kind()),
        }
    }

    /// Formats a nanosecond duration with a unit suited to its magnitude.
    pub fn format_duration(ns: i64) -> String {
        let abs = ns.unsigned_abs();
        if abs >= 1_000_000_000 {
            format!("{:.2}s", ns as f64 / 1e9)
        } else if abs >= 1_000_000 {
            format!("{:.2}ms", ns as f64 / 1e6)
        } else if abs >= 1_000 {
            format!("{:.2}µs", ns as f64 / 1e3)
        } else {
            format!("{}ns", ns)
        }
    }
}
