//! Span tree reconstruction tests.
mod common;
use annotrace::hierarchy::{ROOT_ID, SpanTree};
use annotrace::render::formatter::MAX_INDENT_LEVELS;
use annotrace::prelude::*;
use common::*;

fn child_ids<'a>(tree: &SpanTree<'a>, step_id: &str) -> Vec<&'a str> {
    let id = tree.node_id(step_id).expect("step should be in the tree");
    tree.children(id).map(|n| n.id).collect()
}

fn root_ids<'a>(tree: &SpanTree<'a>) -> Vec<&'a str> {
    tree.children(SpanTree::ROOT).map(|n| n.id).collect()
}

#[test]
fn test_children_ordered_by_start_time() {
    let steps = vec![
        step("a", None, Some("agent"), Some(10)),
        step("b", Some("a"), Some("x"), Some(5)),
        step("c", Some("a"), Some("y"), Some(20)),
    ];
    let tree = build_tree(&steps);

    assert_eq!(root_ids(&tree), vec!["a"]);
    assert_eq!(child_ids(&tree, "a"), vec!["b", "c"]);
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.node("c").and_then(|n| n.depth), Some(2));
    assert_eq!(tree.depth(SpanTree::ROOT), Some(0));
}

#[test]
fn test_missing_start_time_sorts_as_zero() {
    let steps = vec![
        step("a", None, Some("agent"), Some(0)),
        step("late", Some("a"), None, Some(5)),
        step("untimed", Some("a"), None, None),
    ];
    let tree = build_tree(&steps);
    assert_eq!(child_ids(&tree, "a"), vec!["untimed", "late"]);
}

#[test]
fn test_self_parented_step_is_root() {
    let steps = vec![
        step("a", Some("a"), Some("loop"), Some(1)),
        step("b", Some("a"), Some("child"), Some(2)),
    ];
    let tree = build_tree(&steps);

    assert_eq!(root_ids(&tree), vec!["a"]);
    assert_eq!(child_ids(&tree, "a"), vec!["b"]);
    assert!(tree.detached_ids().is_empty());
}

#[test]
fn test_unknown_parent_falls_back_to_interaction() {
    let steps = vec![
        step_in("int-1", "int-1", None, "agent", Some(0)),
        step_in("s1", "int-1", Some("not-collected"), "search", Some(5)),
        step_in("s2", "int-1", None, "chat", Some(7)),
    ];
    let tree = build_tree(&steps);

    // The step whose id is the interaction id is the interaction's root.
    assert_eq!(root_ids(&tree), vec!["int-1"]);
    assert_eq!(child_ids(&tree, "int-1"), vec!["s1", "s2"]);
}

#[test]
fn test_interaction_without_its_own_node_leaves_roots() {
    let steps = vec![
        step_in("x", "int-9", Some("ghost"), "search", Some(2)),
        step_in("y", "int-9", None, "chat", Some(1)),
    ];
    let tree = build_tree(&steps);
    assert_eq!(root_ids(&tree), vec!["y", "x"]);
}

#[test]
fn test_parent_pointer_wins_over_interaction() {
    let steps = vec![
        step_in("int-1", "int-1", None, "agent", Some(0)),
        step_in("t", "int-1", None, "tool", Some(1)),
        step_in("leaf", "int-1", Some("t"), "leaf", Some(2)),
    ];
    let tree = build_tree(&steps);
    assert_eq!(child_ids(&tree, "t"), vec!["leaf"]);
    assert_eq!(tree.path_to("leaf"), Some(vec!["int-1", "t", "leaf"]));
}

#[test]
fn test_parent_cycle_is_detached_not_looped() {
    let steps = vec![
        step("a", Some("b"), Some("ping"), Some(1)),
        step("b", Some("a"), Some("pong"), Some(2)),
        step("c", None, Some("agent"), Some(3)),
    ];
    let tree = build_tree(&steps);

    assert_eq!(root_ids(&tree), vec!["c"]);
    let mut detached = tree.detached_ids();
    detached.sort();
    assert_eq!(detached, vec!["a", "b"]);
    assert_eq!(tree.walk().count(), 1);
    assert_eq!(tree.path_to("a"), None);
    // Cycle members are still indexed.
    assert!(tree.node("a").is_some());
}

#[test]
fn test_empty_input_yields_lone_root() {
    let tree = build_tree(&[]);
    assert!(tree.is_empty());
    assert_eq!(tree.root().id, ROOT_ID);
    assert!(tree.root().is_root());
    assert!(tree.root().children.is_empty());
    assert_eq!(tree.walk().count(), 0);
}

#[test]
fn test_walk_is_depth_first_preorder() {
    let steps = create_agent_trace();
    let tree = build_tree(&steps);
    let order: Vec<&str> = tree.walk().map(|n| n.id).collect();
    assert_eq!(order, vec!["a1", "l1", "t1", "g1", "t2"]);
    assert_eq!(tree.parent(tree.node_id("g1").unwrap()).map(|n| n.id), Some("t1"));
}

#[test]
fn test_parent_pairs_round_trip() {
    let steps = vec![
        step_in("int-1", "int-1", None, "agent", Some(0)),
        step_in("s1", "int-1", Some("missing"), "search", Some(5)),
        step_in("s2", "int-1", Some("s1"), "fetch", None),
        step_in("s3", "int-1", Some("s1"), "fetch", Some(9)),
        step("lonely", None, Some("other"), Some(3)),
    ];
    let tree = build_tree(&steps);
    let mut original = tree.parent_pairs();

    // Re-encode the resolved structure as explicit parent pointers and rebuild.
    let rebuilt_steps: Vec<Step> = tree
        .walk()
        .map(|node| {
            let parent = original
                .iter()
                .find(|(child, _)| *child == node.id)
                .map(|(_, parent)| *parent);
            step(node.id, parent, None, node.step.and_then(|s| s.start_ns))
        })
        .collect();
    let rebuilt = build_tree(&rebuilt_steps);
    let mut round_tripped = rebuilt.parent_pairs();

    original.sort();
    round_tripped.sort();
    assert_eq!(original, round_tripped);
    assert_eq!(root_ids(&tree), root_ids(&rebuilt));
}

#[test]
fn test_tree_formatter_renders_nesting() {
    let steps = create_agent_trace();
    let tree = build_tree(&steps);
    let rendered = TreeFormatter::format(&tree);

    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "trace");
    assert_eq!(lines[1], "└── agent [agent]");
    assert_eq!(lines[2], "    ├── chat [llm]");
    assert_eq!(lines[4], "    │   └── g1 [step]");
    assert_eq!(lines[5], "    └── search [tool]");
}

#[test]
fn test_format_duration_units() {
    assert_eq!(TreeFormatter::format_duration(999), "999ns");
    assert_eq!(TreeFormatter::format_duration(1_500), "1.50µs");
    assert_eq!(TreeFormatter::format_duration(2_500_000), "2.50ms");
    assert_eq!(TreeFormatter::format_duration(3_000_000_000), "3.00s");
}

fn parent_chain(len: usize) -> Vec<Step> {
    (0..len)
        .map(|i| {
            let id = format!("s{}", i);
            let parent = (i > 0).then(|| format!("s{}", i - 1));
            step(&id, parent.as_deref(), None, Some(i as i64))
        })
        .collect()
}

#[test]
fn test_deep_parent_chain_builds_and_formats() {
    let steps = parent_chain(10_000);
    let tree = build_tree(&steps);

    assert!(tree.detached_ids().is_empty());
    assert_eq!(tree.depth(tree.node_id("s9999").unwrap()), Some(10_000));
    assert_eq!(tree.walk().count(), 10_000);

    let rendered = TreeFormatter::format(&tree);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 10_001);
    assert_eq!(lines[1], "└── s0 [step]");
    assert!(lines[10_000].ends_with("[depth 10000] s9999 [step]"));
}

#[test]
fn test_indentation_stops_growing_past_cap() {
    let steps = parent_chain(MAX_INDENT_LEVELS + 3);
    let tree = build_tree(&steps);
    let rendered = TreeFormatter::format(&tree);
    let lines: Vec<&str> = rendered.lines().collect();

    let capped = lines[MAX_INDENT_LEVELS];
    let deeper = lines[MAX_INDENT_LEVELS + 2];
    assert!(!capped.contains("[depth"));
    assert!(deeper.contains(&format!("[depth {}]", MAX_INDENT_LEVELS + 2)));
    let indent = |line: &str| line.find("└── ").unwrap();
    assert_eq!(indent(lines[MAX_INDENT_LEVELS + 1]), indent(deeper));
    assert_eq!(indent(capped), indent(deeper));
}
