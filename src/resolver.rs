//! Decides which annotation references are worth navigating to, and checks that a
//! reference points at something inside the judged data.

use crate::error::ValidationError;
use crate::model::{Granularity, RawJudgeInput, Reference};
use ahash::AHashSet;

/// Whether jumping from an annotation at `granularity` to a reference of `kind` is useful.
///
/// Step references always are. Interaction and group references only when they are
/// strictly finer than what the annotator is already looking at.
pub fn is_navigable(granularity: Granularity, kind: Granularity) -> bool {
    kind == Granularity::Step || kind > granularity
}

/// String form of [`is_navigable`]. Unknown values are never navigable.
pub fn is_navigable_str(granularity: &str, kind: &str) -> bool {
    match (granularity.parse::<Granularity>(), kind.parse::<Granularity>()) {
        (Ok(granularity), Ok(kind)) => is_navigable(granularity, kind),
        _ => false,
    }
}

impl Reference {
    pub fn is_navigable_from(&self, granularity: Granularity) -> bool {
        is_navigable(granularity, self.kind)
    }
}

/// The ids a reference may legally point at for one raw judge input.
#[derive(Debug, Clone, Default)]
pub struct ReferenceScope<'a> {
    steps: AHashSet<&'a str>,
    interactions: AHashSet<&'a str>,
    groups: AHashSet<&'a str>,
}

impl<'a> ReferenceScope<'a> {
    pub fn from_raw(raw: &'a RawJudgeInput) -> Self {
        let mut scope = Self::default();
        match raw {
            RawJudgeInput::Step(step) => {
                scope.steps.insert(&step.id);
            }
            RawJudgeInput::Interaction(interaction) => {
                scope.interactions.insert(&interaction.id);
                scope.steps.extend(interaction.steps.iter().map(|s| s.id.as_str()));
            }
            RawJudgeInput::Group(group) => {
                scope.groups.insert(&group.id);
                for interaction in &group.interactions {
                    scope.interactions.insert(&interaction.id);
                    scope.steps.extend(interaction.steps.iter().map(|s| s.id.as_str()));
                }
            }
        }
        scope
    }

    pub fn contains(&self, reference: &Reference) -> bool {
        let ids = match reference.kind {
            Granularity::Step => &self.steps,
            Granularity::Interaction => &self.interactions,
            Granularity::Group => &self.groups,
        };
        ids.contains(reference.id.as_str())
    }

    pub fn check(&self, reference: &Reference) -> Result<(), ValidationError> {
        if self.contains(reference) {
            Ok(())
        } else {
            Err(ValidationError::UnknownReference {
                kind: reference.kind,
                id: reference.id.clone(),
            })
        }
    }
}
