use crate::error::LoadError;
use crate::model::{Message, Step, StepCollectionReport, TokenUsage, validate_steps};
use serde_json::json;
use std::fs;
use std::path::Path;

/// A flat collection of steps as loaded from disk, before any tree or graph is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepCollection {
    pub steps: Vec<Step>,
}

impl StepCollection {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Load steps from a file holding either a JSON array or one step per line.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse a JSON array of steps, falling back to JSONL when the content is not an array.
    pub fn parse(content: &str) -> Result<Self, LoadError> {
        let trimmed = content.trim_start();
        if trimmed.starts_with('[') {
            let steps: Vec<Step> = serde_json::from_str(trimmed).map_err(|e| {
                LoadError::InvalidLine {
                    line: e.line(),
                    message: e.to_string(),
                }
            })?;
            return Ok(Self::new(steps));
        }

        let mut steps = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let step: Step = serde_json::from_str(line).map_err(|e| LoadError::InvalidLine {
                line: idx + 1,
                message: e.to_string(),
            })?;
            steps.push(step);
        }
        tracing::debug!(steps = steps.len(), "parsed JSONL step collection");
        Ok(Self::new(steps))
    }

    /// Runs boundary validation over the loaded steps.
    pub fn validate(&self) -> Result<StepCollectionReport, LoadError> {
        Ok(validate_steps(&self.steps)?)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// A small built-in trace: one agent that calls an LLM, retries a search tool
    /// and finishes with a second LLM call.
    pub fn sample() -> Self {
        let step = |id: &str, parent: Option<&str>, name: Option<&str>, start: i64, dur: i64| {
            Step {
                parent_step_id: parent.map(str::to_string),
                interaction_id: Some("sample-interaction".to_string()),
                group_id: Some("sample-session".to_string()),
                name: name.map(str::to_string),
                start_ns: Some(start),
                duration_ns: Some(dur),
                ..Step::new(id)
            }
        };
        let llm = |mut s: Step, prompt: &str| {
            s.model = Some("gpt-4o-mini".to_string());
            s.provider = Some("openai".to_string());
            s.input_messages = Some(vec![Message {
                role: "user".to_string(),
                content: json!(prompt),
            }]);
            s.usage = Some(TokenUsage {
                input_tokens: Some(42),
                output_tokens: Some(17),
                total_tokens: Some(59),
            });
            s
        };

        Self::new(vec![
            step("agent-1", None, Some("planner"), 0, 9_000_000),
            llm(
                step("llm-1", Some("agent-1"), Some("chat"), 100_000, 2_500_000),
                "Which documents mention the refund policy?",
            ),
            step("tool-1", Some("agent-1"), Some("search"), 2_700_000, 1_200_000),
            step("tool-2", Some("agent-1"), Some("search"), 4_000_000, 900_000),
            step("step-1", Some("tool-2"), None, 4_100_000, 300_000),
            llm(
                step("llm-2", Some("agent-1"), Some("chat"), 5_000_000, 3_800_000),
                "Summarize the refund policy.",
            ),
        ])
    }
}
