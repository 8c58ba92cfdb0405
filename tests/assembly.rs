//! Interaction and group assembly tests.
mod common;
use annotrace::assembly::{DEFAULT_GROUP_ID, build_groups, build_interactions};
use annotrace::prelude::*;
use common::*;

fn timed(id: &str, interaction: &str, start: Option<i64>, duration: Option<i64>) -> Step {
    Step {
        duration_ns: duration,
        ..step_in(id, interaction, None, "work", start)
    }
}

#[test]
fn test_interactions_keep_first_seen_order() {
    let steps = vec![
        timed("b1", "int-b", Some(50), None),
        timed("a1", "int-a", Some(10), None),
        timed("b2", "int-b", Some(40), None),
        step("loose", None, Some("no interaction"), Some(0)),
    ];
    let interactions = build_interactions(&steps);

    let ids: Vec<&str> = interactions.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["int-b", "int-a"]);
    let step_ids: Vec<&str> = interactions[0].steps.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(step_ids, vec!["b2", "b1"]);
}

#[test]
fn test_interaction_timing_summary() {
    let mut first = timed("s1", "int-1", None, Some(5));
    first.group_id = None;
    let mut second = timed("s2", "int-1", Some(30), Some(7));
    second.group_id = Some("session-1".to_string());
    let third = timed("s3", "int-1", Some(20), None);

    let interactions = build_interactions(&[first, second, third]);
    let interaction = &interactions[0];

    // Untimed steps sort last.
    let step_ids: Vec<&str> = interaction.steps.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(step_ids, vec!["s3", "s2", "s1"]);
    assert_eq!(interaction.start_ns, Some(20));
    assert_eq!(interaction.duration_ns, Some(12));
    assert_eq!(interaction.group_id.as_deref(), Some("session-1"));
}

#[test]
fn test_interaction_without_timing_has_none() {
    let interactions = build_interactions(&[timed("s1", "int-1", None, None)]);
    assert_eq!(interactions[0].start_ns, None);
    assert_eq!(interactions[0].duration_ns, None);
    assert_eq!(interactions[0].sorted_steps().len(), 1);
}

#[test]
fn test_groups_collect_interactions() {
    let mut steps = vec![
        timed("a", "int-1", Some(1), None),
        timed("b", "int-2", Some(2), None),
        timed("c", "int-3", Some(3), None),
    ];
    steps[0].group_id = Some("session-1".to_string());
    steps[2].group_id = Some("session-1".to_string());

    let groups = build_groups(&steps);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].id, "session-1");
    assert_eq!(groups[0].interactions.len(), 2);
    assert_eq!(groups[1].id, DEFAULT_GROUP_ID);
    assert_eq!(groups[0].steps().count(), 2);
}

#[test]
fn test_empty_input_assembles_nothing() {
    assert!(build_interactions(&[]).is_empty());
    assert!(build_groups(&[]).is_empty());
}

#[test]
fn test_stored_order_and_display_order_differ_on_untimed_steps() {
    let steps = vec![
        timed("late", "int-1", Some(30), None),
        timed("untimed-a", "int-1", None, None),
        timed("early", "int-1", Some(10), None),
        timed("untimed-b", "int-1", None, None),
    ];
    let interactions = build_interactions(&steps);
    let interaction = &interactions[0];

    let stored: Vec<&str> = interaction.steps.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(stored, vec!["early", "late", "untimed-a", "untimed-b"]);

    let display: Vec<&str> = interaction
        .sorted_steps()
        .into_iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(display, vec!["untimed-a", "untimed-b", "early", "late"]);
}
