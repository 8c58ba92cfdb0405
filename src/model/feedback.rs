use super::{AttributeMatcher, Granularity};
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// What kind of feedback is collected for a test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FeedbackSpec {
    Ranking {
        #[serde(default = "default_comparison_items")]
        comparison_items: usize,
    },
    Categorical {
        #[serde(default = "default_categories")]
        categories: Vec<String>,
    },
    Continuous {
        #[serde(default = "default_score_range")]
        score_range: (f64, f64),
    },
}

fn default_comparison_items() -> usize {
    2
}

fn default_categories() -> Vec<String> {
    vec!["pass".to_string(), "fail".to_string()]
}

fn default_score_range() -> (f64, f64) {
    (0.0, 10.0)
}

impl Default for FeedbackSpec {
    fn default() -> Self {
        FeedbackSpec::Ranking {
            comparison_items: default_comparison_items(),
        }
    }
}

impl FeedbackSpec {
    pub fn type_name(&self) -> &'static str {
        match self {
            FeedbackSpec::Ranking { .. } => "ranking",
            FeedbackSpec::Categorical { .. } => "categorical",
            FeedbackSpec::Continuous { .. } => "continuous",
        }
    }

    pub fn is_pointwise(&self) -> bool {
        !matches!(self, FeedbackSpec::Ranking { .. })
    }
}

/// A variable the judge is asked to look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputItem {
    pub name: String,
    pub description: String,
}

/// Defines what to evaluate and how to present it, shared by human and AI annotators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackConfig {
    pub id: String,
    #[serde(default = "default_granularity")]
    pub granularity: Granularity,
    #[serde(default)]
    pub requires_context: Option<Granularity>,
    #[serde(default)]
    pub feedback_spec: FeedbackSpec,
    #[serde(default)]
    pub input_items: Vec<InputItem>,
    #[serde(default)]
    pub ai_rubric: String,
    #[serde(default)]
    pub natural_language_disqualifier: Option<String>,
    /// Pre-filter on raw inputs; an input is kept only if every matcher matches.
    #[serde(default)]
    pub attribute_matchers: Vec<AttributeMatcher>,
}

impl FeedbackConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.attribute_matchers
            .iter()
            .try_for_each(AttributeMatcher::validate)
    }
}

fn default_granularity() -> Granularity {
    Granularity::Step
}
