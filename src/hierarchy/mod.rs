//! Reconstruction of a navigable span tree from a flat step collection.
//!
//! Steps are attached to exactly one parent each, using the first rule that applies:
//!
//! 1. `parent_step_id`, when it names another step in the collection.
//! 2. `interaction_id`, when it differs from the step's own id and a step with that id
//!    exists. A step whose id *is* its interaction id is the interaction's root.
//! 3. Otherwise the step becomes a forest root.
//!
//! A step whose `parent_step_id` is its own id is always a forest root. Every forest
//! root hangs off one synthetic node with the id [`ROOT_ID`], so navigation always has a
//! single entry point. Children are ordered by `start_ns`, missing timestamps as zero.

use crate::model::Step;
use ahash::AHashMap;

mod builder;

use builder::TreeBuilder;

/// Id of the synthetic root node. It is never a step id.
pub const ROOT_ID: &str = "__root__";

/// Position of a node in the tree's arena.
pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct SpanTreeNode<'a> {
    pub id: &'a str,
    /// `None` only for the synthetic root.
    pub step: Option<&'a Step>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Distance from the synthetic root; `None` when the node is not reachable from it.
    pub depth: Option<usize>,
}

impl SpanTreeNode<'_> {
    pub fn is_root(&self) -> bool {
        self.step.is_none()
    }

    pub fn start_or_zero(&self) -> i64 {
        self.step.map_or(0, Step::start_or_zero)
    }
}

/// A rooted forest of steps plus an index from step id to node.
///
/// The tree borrows the step slice it was built from; it is rebuilt, never patched,
/// when the input changes.
#[derive(Debug, Clone)]
pub struct SpanTree<'a> {
    nodes: Vec<SpanTreeNode<'a>>,
    index: AHashMap<&'a str, NodeId>,
}

/// Builds the span tree for `steps`. Never fails; an empty input yields a lone root.
pub fn build_tree(steps: &[Step]) -> SpanTree<'_> {
    SpanTree::build(steps)
}

impl<'a> SpanTree<'a> {
    pub const ROOT: NodeId = 0;

    pub fn build(steps: &'a [Step]) -> Self {
        TreeBuilder::new(steps).build()
    }

    pub fn root(&self) -> &SpanTreeNode<'a> {
        &self.nodes[Self::ROOT]
    }

    pub fn get(&self, id: NodeId) -> Option<&SpanTreeNode<'a>> {
        self.nodes.get(id)
    }

    /// Looks up the node of a step by its id.
    pub fn node(&self, step_id: &str) -> Option<&SpanTreeNode<'a>> {
        self.index.get(step_id).map(|&id| &self.nodes[id])
    }

    pub fn node_id(&self, step_id: &str) -> Option<NodeId> {
        self.index.get(step_id).copied()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &SpanTreeNode<'a>> {
        self.nodes
            .get(id)
            .into_iter()
            .flat_map(|n| n.children.iter().map(|&c| &self.nodes[c]))
    }

    pub fn parent(&self, id: NodeId) -> Option<&SpanTreeNode<'a>> {
        self.nodes.get(id)?.parent.map(|p| &self.nodes[p])
    }

    pub fn depth(&self, id: NodeId) -> Option<usize> {
        self.nodes.get(id)?.depth
    }

    /// Number of step nodes, excluding the synthetic root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Depth-first, pre-order walk over the step nodes reachable from the root.
    pub fn walk(&self) -> Walk<'_, 'a> {
        let stack = self.root().children.iter().rev().copied().collect();
        Walk { tree: self, stack }
    }

    /// `(child, parent)` id pairs for every reachable node attached below another step.
    pub fn parent_pairs(&self) -> Vec<(&'a str, &'a str)> {
        self.walk()
            .filter_map(|node| {
                let parent = &self.nodes[node.parent?];
                (!parent.is_root()).then_some((node.id, parent.id))
            })
            .collect()
    }

    /// Step ids from the top-level ancestor down to `step_id`.
    ///
    /// Returns `None` for unknown ids and for steps not reachable from the root.
    pub fn path_to(&self, step_id: &str) -> Option<Vec<&'a str>> {
        let mut current = self.node_id(step_id)?;
        let depth = self.nodes[current].depth?;
        let mut path = Vec::with_capacity(depth);
        while current != Self::ROOT {
            let node = &self.nodes[current];
            path.push(node.id);
            current = node.parent?;
        }
        path.reverse();
        Some(path)
    }

    /// Ids of steps caught in a parent cycle, which no walk from the root reaches.
    pub fn detached_ids(&self) -> Vec<&'a str> {
        self.nodes
            .iter()
            .filter(|n| n.depth.is_none())
            .map(|n| n.id)
            .collect()
    }
}

/// Iterator returned by [`SpanTree::walk`].
pub struct Walk<'t, 'a> {
    tree: &'t SpanTree<'a>,
    stack: Vec<NodeId>,
}

impl<'t, 'a> Iterator for Walk<'t, 'a> {
    type Item = &'t SpanTreeNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id];
        self.stack.extend(node.children.iter().rev().copied());
        Some(node)
    }
}
