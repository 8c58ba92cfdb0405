use super::Step;
use crate::error::ValidationError;
use ahash::AHashSet;
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary of a step collection that passed boundary validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepCollectionReport {
    pub total_steps: usize,
    /// Steps with no `parent_step_id`.
    pub root_steps: usize,
    pub llm_calls: usize,
    pub models_used: BTreeMap<String, usize>,
    pub interactions: usize,
    pub groups: usize,
    /// Steps whose parent pointer names a step that is not in the collection.
    pub dangling_parents: Vec<String>,
}

/// Validates a step collection before it is handed to the builders.
///
/// Duplicate ids are rejected. Dangling parent pointers are reported but accepted,
/// since both builders have a documented fallback for them.
pub fn validate_steps(steps: &[Step]) -> Result<StepCollectionReport, ValidationError> {
    let mut ids: AHashSet<&str> = AHashSet::with_capacity(steps.len());
    for step in steps {
        if !ids.insert(step.id.as_str()) {
            return Err(ValidationError::DuplicateStepId(step.id.clone()));
        }
    }

    let dangling_parents: Vec<String> = steps
        .iter()
        .filter(|s| {
            s.parent_step_id
                .as_deref()
                .is_some_and(|p| p != s.id && !ids.contains(p))
        })
        .map(|s| s.id.clone())
        .collect();
    for id in &dangling_parents {
        tracing::warn!(step_id = %id, "parent step not found in collection");
    }

    let models_used = steps
        .iter()
        .filter_map(|s| s.model.clone())
        .counts()
        .into_iter()
        .collect();

    Ok(StepCollectionReport {
        total_steps: steps.len(),
        root_steps: steps.iter().filter(|s| s.parent_step_id.is_none()).count(),
        llm_calls: steps.iter().filter(|s| s.model.is_some()).count(),
        models_used,
        interactions: steps.iter().filter_map(|s| s.interaction_id.as_deref()).unique().count(),
        groups: steps.iter().filter_map(|s| s.group_id.as_deref()).unique().count(),
        dangling_parents,
    })
}
