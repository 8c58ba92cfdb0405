use super::{NodeId, ROOT_ID, SpanTree, SpanTreeNode};
use crate::model::Step;
use ahash::{AHashMap, AHashSet};

/// Responsible for turning a flat step slice into the arena of a [`SpanTree`].
pub(super) struct TreeBuilder<'a> {
    nodes: Vec<SpanTreeNode<'a>>,
    index: AHashMap<&'a str, NodeId>,
    interaction_ids: AHashSet<&'a str>,
}

impl<'a> TreeBuilder<'a> {
    pub(super) fn new(steps: &'a [Step]) -> Self {
        let mut sorted: Vec<&'a Step> = steps.iter().collect();
        // Stable, so ties keep input order.
        sorted.sort_by_key(|s| s.start_or_zero());

        let mut nodes = Vec::with_capacity(sorted.len() + 1);
        nodes.push(SpanTreeNode::root());
        let mut index = AHashMap::with_capacity(sorted.len());
        for step in &sorted {
            let id = nodes.len();
            nodes.push(SpanTreeNode::for_step(step));
            // A repeated id keeps pointing at its first occurrence.
            index.entry(step.id.as_str()).or_insert(id);
        }

        let interaction_ids = sorted
            .iter()
            .filter_map(|s| s.interaction_id.as_deref())
            .collect();

        Self {
            nodes,
            index,
            interaction_ids,
        }
    }

    pub(super) fn build(mut self) -> SpanTree<'a> {
        for id in 1..self.nodes.len() {
            let parent = self.resolve_parent(id).unwrap_or(SpanTree::ROOT);
            self.nodes[id].parent = Some(parent);
            self.nodes[parent].children.push(id);
        }

        self.sort_children();
        self.assign_depths();

        let detached = self.nodes.iter().filter(|n| n.depth.is_none()).count();
        tracing::debug!(
            steps = self.nodes.len() - 1,
            roots = self.nodes[SpanTree::ROOT].children.len(),
            detached,
            "built span tree"
        );

        SpanTree {
            nodes: self.nodes,
            index: self.index,
        }
    }

    /// Picks the single parent of a step node; `None` means forest root.
    fn resolve_parent(&self, id: NodeId) -> Option<NodeId> {
        let step = self.nodes[id].step?;

        if let Some(parent_id) = step.parent_step_id.as_deref() {
            if parent_id == step.id {
                // A self-parented step is always a root.
                return None;
            }
            if let Some(&parent) = self.index.get(parent_id) {
                return Some(parent);
            }
        }

        match step.interaction_id.as_deref() {
            Some(interaction_id)
                if self.interaction_ids.contains(interaction_id) && interaction_id != step.id =>
            {
                // Without a node of that id, the interaction id is just a grouping label.
                self.index.get(interaction_id).copied()
            }
            _ => None,
        }
    }

    fn sort_children(&mut self) {
        for id in 0..self.nodes.len() {
            let mut children = std::mem::take(&mut self.nodes[id].children);
            children.sort_by_key(|&child| self.nodes[child].start_or_zero());
            self.nodes[id].children = children;
        }
    }

    /// Marks every node reachable from the synthetic root with its depth.
    fn assign_depths(&mut self) {
        let mut stack = vec![(SpanTree::ROOT, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            self.nodes[id].depth = Some(depth);
            for &child in &self.nodes[id].children {
                stack.push((child, depth + 1));
            }
        }
    }
}

impl<'a> SpanTreeNode<'a> {
    fn root() -> Self {
        Self {
            id: ROOT_ID,
            step: None,
            parent: None,
            children: Vec::new(),
            depth: None,
        }
    }

    fn for_step(step: &'a Step) -> Self {
        Self {
            id: &step.id,
            step: Some(step),
            parent: None,
            children: Vec::new(),
            depth: None,
        }
    }
}
