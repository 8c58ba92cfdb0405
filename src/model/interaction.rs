use super::Step;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A complete interaction composed of multiple steps (e.g. one turn of a conversation).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub steps: Vec<Step>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub start_ns: Option<i64>,
    #[serde(default)]
    pub duration_ns: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: AHashMap<String, serde_json::Value>,
}

impl Interaction {
    /// Steps ordered by start time for display, with a missing `start_ns` read as `0`.
    ///
    /// The sort is stable, so untimed steps lead in their stored order. This is the
    /// same rule the span tree uses for siblings. Assembly stores steps the other way
    /// round (untimed last, see [`crate::assembly::build_interactions`]); callers that
    /// need the stored order should iterate `steps` directly.
    pub fn sorted_steps(&self) -> Vec<&Step> {
        let mut steps: Vec<&Step> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.start_or_zero());
        steps
    }
}

/// A group of related interactions (e.g. a session or a user).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionGroup {
    pub id: String,
    pub interactions: Vec<Interaction>,
}

impl InteractionGroup {
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.interactions.iter().flat_map(|i| i.steps.iter())
    }
}
