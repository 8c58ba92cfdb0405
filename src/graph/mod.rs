//! Name-grouped call graph of a step collection.
//!
//! Every distinct step name becomes one node ("all calls to span X"); every
//! parent/child relationship between steps becomes an edge between the two name
//! groups. Edges are deduplicated and carry how many steps contributed to them.

use crate::model::{Step, StepKind};
use ahash::{AHashMap, AHashSet};

mod dot;
mod layout;

pub use layout::LayoutConfig;

/// All steps sharing one name, rendered as a single node.
#[derive(Debug, Clone)]
pub struct NamedGroup<'a> {
    /// Group key; `""` for steps without a name.
    pub name: &'a str,
    /// Kind of the representative (first) step.
    pub kind: StepKind,
    pub steps: Vec<&'a Step>,
    /// Earliest known start among the steps, `0` if none has one.
    pub earliest_start_ns: i64,
    pub column: usize,
    pub row: usize,
    pub position: (f64, f64),
}

impl<'a> NamedGroup<'a> {
    /// First step in input order; `None` only for a hand-built empty group.
    pub fn representative(&self) -> Option<&'a Step> {
        self.steps.first().copied()
    }

    pub fn invocations(&self) -> usize {
        self.steps.len()
    }

    pub fn total_duration_ns(&self) -> i64 {
        self.steps.iter().filter_map(|s| s.duration_ns).sum()
    }
}

/// One deduplicated edge between two name groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedEdge<'a> {
    /// `"<source>-><target>"`.
    pub key: String,
    pub source: &'a str,
    pub target: &'a str,
    /// Number of steps whose parent lives in `source` and who live in `target`.
    pub count: usize,
    /// `"N invocations"` when more than one step contributed.
    pub label: Option<String>,
}

impl AggregatedEdge<'_> {
    pub fn is_self_edge(&self) -> bool {
        self.source == self.target
    }
}

#[derive(Debug, Clone, Default)]
pub struct TraceGraph<'a> {
    pub nodes: Vec<NamedGroup<'a>>,
    pub edges: Vec<AggregatedEdge<'a>>,
}

impl<'a> TraceGraph<'a> {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, name: &str) -> Option<&NamedGroup<'a>> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&AggregatedEdge<'a>> {
        self.edges
            .iter()
            .find(|e| e.source == source && e.target == target)
    }
}

/// Builds the call graph with the default layout.
pub fn build_graph(steps: &[Step]) -> TraceGraph<'_> {
    GraphBuilder::new().build(steps)
}

/// Configurable graph construction.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    layout: LayoutConfig,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn build<'a>(&self, steps: &'a [Step]) -> TraceGraph<'a> {
        let mut nodes = group_by_name(steps);
        if nodes.is_empty() {
            return TraceGraph::default();
        }

        nodes.sort_by_key(|g| (g.kind.rank(), g.earliest_start_ns, g.name));
        self.layout.place(&mut nodes);

        let edges = aggregate_edges(steps, &nodes);
        tracing::debug!(
            steps = steps.len(),
            groups = nodes.len(),
            edges = edges.len(),
            "built trace graph"
        );
        TraceGraph { nodes, edges }
    }
}

/// Partitions steps by name, keeping first-seen group order and input order within.
fn group_by_name(steps: &[Step]) -> Vec<NamedGroup<'_>> {
    let mut positions: AHashMap<&str, usize> = AHashMap::new();
    let mut groups: Vec<(&str, Vec<&Step>)> = Vec::new();
    for step in steps {
        let key = step.group_key();
        let pos = *positions.entry(key).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[pos].1.push(step);
    }

    groups
        .into_iter()
        .map(|(name, steps)| NamedGroup {
            name,
            kind: steps[0].kind(),
            earliest_start_ns: steps.iter().filter_map(|s| s.start_ns).min().unwrap_or(0),
            steps,
            column: 0,
            row: 0,
            position: (0.0, 0.0),
        })
        .collect()
}

fn aggregate_edges<'a>(steps: &'a [Step], groups: &[NamedGroup<'a>]) -> Vec<AggregatedEdge<'a>> {
    let mut by_id: AHashMap<&str, &Step> = AHashMap::with_capacity(steps.len());
    for step in steps {
        by_id.entry(step.id.as_str()).or_insert(step);
    }
    let known: AHashSet<&str> = groups.iter().map(|g| g.name).collect();

    let mut seen: AHashMap<(&str, &str), usize> = AHashMap::new();
    let mut edges: Vec<AggregatedEdge<'a>> = Vec::new();
    for step in steps {
        let Some(parent) = step.parent_step_id.as_deref().and_then(|p| by_id.get(p).copied()) else {
            continue;
        };
        let (source, target) = (parent.group_key(), step.group_key());
        if !known.contains(source) || !known.contains(target) {
            continue;
        }
        match seen.get(&(source, target)) {
            Some(&pos) => edges[pos].count += 1,
            None => {
                seen.insert((source, target), edges.len());
                edges.push(AggregatedEdge {
                    key: format!("{}->{}", source, target),
                    source,
                    target,
                    count: 1,
                    label: None,
                });
            }
        }
    }

    for edge in &mut edges {
        if edge.count > 1 {
            edge.label = Some(format!("{} invocations", edge.count));
        }
    }
    edges
}
