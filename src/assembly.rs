//! Grouping of flat step collections into interactions and interaction groups.

use crate::model::{Interaction, InteractionGroup, Step};
use ahash::AHashMap;
use itertools::Itertools;

/// Group id used for interactions that do not belong to any group.
pub const DEFAULT_GROUP_ID: &str = "default_group";

/// Collects steps into interactions by `interaction_id`, in first-seen order.
///
/// Steps without an interaction id are left out. Within an interaction, steps are
/// ordered by start time with missing timestamps last.
pub fn build_interactions(steps: &[Step]) -> Vec<Interaction> {
    let mut positions: AHashMap<&str, usize> = AHashMap::new();
    let mut grouped: Vec<(&str, Vec<&Step>)> = Vec::new();
    for step in steps {
        let Some(interaction_id) = step.interaction_id.as_deref() else {
            continue;
        };
        let pos = *positions.entry(interaction_id).or_insert_with(|| {
            grouped.push((interaction_id, Vec::new()));
            grouped.len() - 1
        });
        grouped[pos].1.push(step);
    }

    grouped
        .into_iter()
        .map(|(id, members)| assemble_interaction(id, &members))
        .collect()
}

/// Stored step order: timed steps ascending, then untimed steps in input order.
///
/// Unlike [`Interaction::sorted_steps`], a missing `start_ns` sorts last here rather
/// than as `0`.
fn assemble_interaction(id: &str, members: &[&Step]) -> Interaction {
    let steps: Vec<Step> = members
        .iter()
        .sorted_by_key(|s| (s.start_ns.is_none(), s.start_ns))
        .map(|s| (*s).clone())
        .collect();

    let start_ns = steps.iter().filter_map(|s| s.start_ns).min();
    let durations: Vec<i64> = steps.iter().filter_map(|s| s.duration_ns).collect();
    let duration_ns = (!durations.is_empty()).then(|| durations.iter().sum());
    let group_id = members.iter().find_map(|s| s.group_id.clone());

    Interaction {
        id: id.to_string(),
        steps,
        group_id,
        start_ns,
        duration_ns,
        ..Default::default()
    }
}

/// Assembles interactions and then collects them by `group_id`, in first-seen order.
pub fn build_groups(steps: &[Step]) -> Vec<InteractionGroup> {
    let interactions = build_interactions(steps);
    tracing::debug!(interactions = interactions.len(), "assembled interactions");

    let mut groups: Vec<InteractionGroup> = Vec::new();
    let mut positions: AHashMap<String, usize> = AHashMap::new();
    for interaction in interactions {
        let key = interaction
            .group_id
            .clone()
            .unwrap_or_else(|| DEFAULT_GROUP_ID.to_string());
        let pos = *positions.entry(key.clone()).or_insert_with(|| {
            groups.push(InteractionGroup {
                id: key,
                interactions: Vec::new(),
            });
            groups.len() - 1
        });
        groups[pos].interactions.push(interaction);
    }
    groups
}
