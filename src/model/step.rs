use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimal representation of an LLM message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: serde_json::Value,
}

/// Token usage statistics for an LLM invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub input_tokens: Option<u64>,
    #[serde(default)]
    pub output_tokens: Option<u64>,
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

/// A single recorded execution unit (one span of a trace).
///
/// Every pointer field is optional and may dangle; the hierarchy and graph builders
/// decide how to interpret missing or inconsistent pointers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    #[serde(default)]
    pub parent_step_id: Option<String>,
    #[serde(default)]
    pub interaction_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Nanoseconds since epoch.
    #[serde(default)]
    pub start_ns: Option<i64>,
    #[serde(default)]
    pub duration_ns: Option<i64>,
    #[serde(default)]
    pub input_data: Option<serde_json::Value>,
    #[serde(default)]
    pub output_data: Option<serde_json::Value>,
    #[serde(default)]
    pub metadata: AHashMap<String, serde_json::Value>,
    /// The untouched original record.
    #[serde(default)]
    pub raw: AHashMap<String, serde_json::Value>,
    #[serde(default)]
    pub tags: Option<AHashMap<String, String>>,

    // LLM-specific fields, populated when the step is a model call.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub input_messages: Option<Vec<Message>>,
    #[serde(default)]
    pub output_messages: Option<Vec<Message>>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub response_id: Option<String>,
}

impl Step {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Start time with the null-as-zero rule every ordering in this crate relies on.
    pub fn start_or_zero(&self) -> i64 {
        self.start_ns.unwrap_or(0)
    }

    /// Name used as the grouping key; an absent name groups under `""`.
    pub fn group_key(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn is_llm_call(&self) -> bool {
        self.model.is_some()
            || self.input_messages.as_ref().is_some_and(|m| !m.is_empty())
            || self.output_messages.as_ref().is_some_and(|m| !m.is_empty())
    }

    /// Infers the structural kind of this step.
    pub fn kind(&self) -> StepKind {
        if self.is_llm_call() {
            StepKind::Llm
        } else if self.name.is_none() {
            StepKind::Generic
        } else if self.parent_step_id.is_some() {
            StepKind::Tool
        } else {
            StepKind::Agent
        }
    }
}

/// The four step kinds used for layout and labelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// A named top-level span, usually the agent entry point.
    Agent,
    Llm,
    /// A named span nested under another span.
    Tool,
    Generic,
}

impl StepKind {
    /// Fixed layout rank; also the graph column.
    pub fn rank(self) -> usize {
        match self {
            StepKind::Agent => 0,
            StepKind::Llm => 1,
            StepKind::Tool => 2,
            StepKind::Generic => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StepKind::Agent => "agent",
            StepKind::Llm => "llm",
            StepKind::Tool => "tool",
            StepKind::Generic => "step",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
