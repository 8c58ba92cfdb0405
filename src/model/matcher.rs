//! Attribute-based pre-filtering of raw judge inputs.
//!
//! A matcher reads one value out of the serialized input with a dotted path such as
//! `name`, `tags.env` or `steps[0].input_messages[1].content`, then tests it.

use super::{FeedbackConfig, RawJudgeInput};
use crate::error::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One filter criterion. Exactly one test applies, picked in the order
/// `contains_str`, `matches_regex`, `equals_value`; a matcher with none of them set
/// matches nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeMatcher {
    pub attribute_path: String,
    #[serde(default)]
    pub contains_str: Option<String>,
    #[serde(default)]
    pub matches_regex: Option<String>,
    #[serde(default)]
    pub equals_value: Option<Value>,
}

impl AttributeMatcher {
    pub fn new(attribute_path: impl Into<String>) -> Self {
        Self {
            attribute_path: attribute_path.into(),
            contains_str: None,
            matches_regex: None,
            equals_value: None,
        }
    }

    pub fn containing(mut self, needle: impl Into<String>) -> Self {
        self.contains_str = Some(needle.into());
        self
    }

    pub fn matching(mut self, pattern: impl Into<String>) -> Self {
        self.matches_regex = Some(pattern.into());
        self
    }

    pub fn equal_to(mut self, value: Value) -> Self {
        self.equals_value = Some(value);
        self
    }

    /// Rejects a `matches_regex` that does not compile.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(pattern) = &self.matches_regex {
            Regex::new(pattern).map_err(|e| ValidationError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Tests `input`. Unresolvable paths, null values and invalid patterns never match.
    pub fn matches(&self, input: &RawJudgeInput) -> bool {
        let Ok(document) = serde_json::to_value(input) else {
            return false;
        };
        let Some(value) = lookup(&document, &self.attribute_path) else {
            return false;
        };
        if value.is_null() {
            return false;
        }

        if let Some(needle) = &self.contains_str {
            render(value).contains(needle.as_str())
        } else if let Some(pattern) = &self.matches_regex {
            match Regex::new(pattern) {
                Ok(re) => re.is_match(&render(value)),
                Err(err) => {
                    tracing::warn!(pattern = %pattern, error = %err, "invalid matcher pattern");
                    false
                }
            }
        } else if let Some(expected) = &self.equals_value {
            values_equal(value, expected)
        } else {
            false
        }
    }
}

/// Inputs that satisfy every matcher of `config`; all inputs when it has none.
pub fn filter_raw_judge_inputs<'a>(
    inputs: &'a [RawJudgeInput],
    config: &FeedbackConfig,
) -> Vec<&'a RawJudgeInput> {
    let kept: Vec<&RawJudgeInput> = inputs
        .iter()
        .filter(|input| config.attribute_matchers.iter().all(|m| m.matches(input)))
        .collect();
    tracing::debug!(
        config = %config.id,
        total = inputs.len(),
        kept = kept.len(),
        "filtered raw judge inputs"
    );
    kept
}

/// Resolves a dotted path with optional `[i]` indexes on each segment.
fn lookup<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.').try_fold(root, |current, segment| {
        let (key, mut rest) = match segment.find('[') {
            Some(at) => segment.split_at(at),
            None => (segment, ""),
        };
        let mut current = if key.is_empty() {
            current
        } else {
            current.as_object()?.get(key)?
        };
        while !rest.is_empty() {
            let inner = rest.strip_prefix('[')?;
            let close = inner.find(']')?;
            let index: usize = inner[..close].trim().parse().ok()?;
            current = current.as_array()?.get(index)?;
            rest = &inner[close + 1..];
        }
        Some(current)
    })
}

/// Strings as their content, everything else as compact JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// JSON equality, except that numbers compare by numeric value (`1 == 1.0`).
fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => actual == expected,
    }
}
