//! Common test utilities for building step collections and test-case documents.
use annotrace::prelude::*;
use serde_json::{Value, json};

/// A step with the fields the builders look at.
#[allow(dead_code)]
pub fn step(id: &str, parent: Option<&str>, name: Option<&str>, start_ns: Option<i64>) -> Step {
    Step {
        parent_step_id: parent.map(str::to_string),
        name: name.map(str::to_string),
        start_ns,
        ..Step::new(id)
    }
}

/// A named step placed in an interaction.
#[allow(dead_code)]
pub fn step_in(
    id: &str,
    interaction: &str,
    parent: Option<&str>,
    name: &str,
    start_ns: Option<i64>,
) -> Step {
    Step {
        interaction_id: Some(interaction.to_string()),
        ..step(id, parent, Some(name), start_ns)
    }
}

/// An LLM call: a named step carrying a model.
#[allow(dead_code)]
pub fn llm_step(id: &str, parent: Option<&str>, name: &str, start_ns: i64) -> Step {
    Step {
        model: Some("gpt-4o-mini".to_string()),
        ..step(id, parent, Some(name), Some(start_ns))
    }
}

/// A small agent trace:
///
/// ```text
/// agent (a1)
/// ├── chat (l1)
/// ├── search (t1)
/// │   └── <unnamed> (g1)
/// └── search (t2)
/// ```
#[allow(dead_code)]
pub fn create_agent_trace() -> Vec<Step> {
    vec![
        step("a1", None, Some("agent"), Some(0)),
        llm_step("l1", Some("a1"), "chat", 10),
        step("t1", Some("a1"), Some("search"), Some(20)),
        step("g1", Some("t1"), None, Some(25)),
        step("t2", Some("a1"), Some("search"), Some(30)),
    ]
}

// --- JSON documents ---

#[allow(dead_code)]
pub fn step_json(id: &str, interaction: &str, parent: Option<&str>) -> Value {
    json!({
        "id": id,
        "interaction_id": interaction,
        "parent_step_id": parent,
        "name": format!("{}-name", id),
        "start_ns": 100,
    })
}

/// An interaction whose first step is the parent of all the others.
#[allow(dead_code)]
pub fn interaction_json(id: &str, step_ids: &[&str]) -> Value {
    let steps: Vec<Value> = step_ids
        .iter()
        .enumerate()
        .map(|(i, s)| step_json(s, id, (i > 0).then_some(step_ids[0])))
        .collect();
    json!({ "id": id, "steps": steps })
}

#[allow(dead_code)]
pub fn categorical_spec() -> Value {
    json!({ "type": "categorical", "categories": ["pass", "fail"] })
}

#[allow(dead_code)]
pub fn continuous_spec() -> Value {
    json!({ "type": "continuous", "score_range": [0.0, 10.0] })
}

#[allow(dead_code)]
pub fn ranking_spec(comparison_items: usize) -> Value {
    json!({ "type": "ranking", "comparison_items": comparison_items })
}

#[allow(dead_code)]
pub fn feedback_config_json(granularity: &str, spec: Value) -> Value {
    json!({
        "id": "fc-1",
        "granularity": granularity,
        "feedback_spec": spec,
        "input_items": [{ "name": "answer", "description": "The final answer" }],
        "ai_rubric": "Is the final answer correct and grounded?",
    })
}

#[allow(dead_code)]
pub fn pointwise_case_json(id: &str, granularity: &str, spec: Value, raw: Value) -> Value {
    json!({
        "test_case_type": "pointwise",
        "test_case_id": id,
        "feedback_config": feedback_config_json(granularity, spec),
        "granularity": granularity,
        "raw_judge_input": raw,
    })
}

#[allow(dead_code)]
pub fn ranking_case_json(id: &str, granularity: &str, raws: Vec<Value>) -> Value {
    json!({
        "test_case_type": "ranking",
        "test_case_id": id,
        "feedback_config": feedback_config_json(granularity, ranking_spec(raws.len())),
        "granularity": granularity,
        "comparison_items": raws.len(),
        "raw_judge_inputs": raws,
    })
}

#[allow(dead_code)]
pub fn categorical_annotation(test_case: &str, annotator: &str, category: &str, timestamp: &str) -> Value {
    json!({
        "type": "categorical",
        "annotation_id": format!("{}-{}", test_case, annotator),
        "test_case_id": test_case,
        "annotator_id": annotator,
        "timestamp": timestamp,
        "categories": ["pass", "fail"],
        "category": category,
    })
}

#[allow(dead_code)]
pub fn continuous_annotation(test_case: &str, annotator: &str, score: f64) -> Value {
    json!({
        "type": "continuous",
        "annotation_id": format!("{}-{}", test_case, annotator),
        "test_case_id": test_case,
        "annotator_id": annotator,
        "timestamp": "2026-01-01T00:00:00Z",
        "score_range": [0.0, 10.0],
        "score": score,
    })
}

#[allow(dead_code)]
pub fn ranking_annotation(test_case: &str, annotator: &str, rankings: &[usize]) -> Value {
    json!({
        "type": "ranking",
        "annotation_id": format!("{}-{}", test_case, annotator),
        "test_case_id": test_case,
        "annotator_id": annotator,
        "timestamp": "2026-01-01T00:00:00Z",
        "comparison_items": rankings.len(),
        "rankings": rankings,
    })
}

/// Parses a JSON document into a validated test case, panicking with context on failure.
#[allow(dead_code)]
pub fn parse_case(doc: Value) -> TestCase {
    TestCase::from_json(&doc.to_string()).expect("fixture test case should be valid")
}

/// Attaches AI and human annotations and a status to a test-case document.
#[allow(dead_code)]
pub fn annotated(mut doc: Value, ai: Option<Value>, human: Option<Value>, status: &str) -> Value {
    doc["ai_annotation"] = ai.unwrap_or(Value::Null);
    doc["human_annotation"] = human.unwrap_or(Value::Null);
    doc["status"] = json!(status);
    doc
}
