//! AI-vs-human agreement statistics tests.
mod common;
use annotrace::prelude::*;
use annotrace::stats::{compute_stats, mean_absolute_error, pearson_correlation};
use common::*;
use serde_json::Value;

fn categorical_case(id: &str, ai: &str, human: &str, human_at: &str) -> TestCase {
    parse_case(annotated(
        pointwise_case_json(id, "step", categorical_spec(), step_json(id, "int-1", None)),
        Some(categorical_annotation(id, "judge", ai, "2026-01-01T00:00:00Z")),
        Some(categorical_annotation(id, "alice", human, human_at)),
        "human_annotated",
    ))
}

fn spec_of(test_case: &TestCase) -> FeedbackSpec {
    test_case.meta().feedback_config.feedback_spec.clone()
}

#[test]
fn test_categorical_agreement_and_confusion() {
    let cases = vec![
        categorical_case("tc-1", "pass", "pass", "2026-02-01T00:00:00Z"),
        categorical_case("tc-2", "pass", "fail", "2026-02-03T00:00:00Z"),
        categorical_case("tc-3", "fail", "pass", "2026-02-02T00:00:00Z"),
    ];
    let stats = compute_stats(&cases, &spec_of(&cases[0])).expect("stats");

    assert_eq!(stats.total_test_cases, 3);
    assert_eq!(stats.human_annotated, 3);
    assert_eq!(stats.agreement_rate, Some(1.0 / 3.0));
    assert_eq!(stats.disagreement_rate, Some(2.0 / 3.0));
    // Ordered by the human annotation's timestamp.
    assert_eq!(stats.disagreed_test_case_ids, vec!["tc-3", "tc-2"]);
    assert_eq!(stats.ai_category_distribution.get("pass"), Some(&2));
    assert_eq!(stats.human_category_distribution.get("fail"), Some(&1));
    assert_eq!(stats.confusion_matrix["pass"]["fail"], 1);
    assert_eq!(stats.confusion_matrix["fail"]["pass"], 1);
}

#[test]
fn test_single_sided_and_skipped_cases_are_excluded() {
    let mut skipped = categorical_annotation("tc-2", "alice", "fail", "2026-02-01T00:00:00Z");
    skipped["skip"] = Value::Bool(true);

    let cases = vec![
        parse_case(pointwise_case_json("tc-0", "step", categorical_spec(), step_json("s", "i", None))),
        parse_case(annotated(
            pointwise_case_json("tc-1", "step", categorical_spec(), step_json("s", "i", None)),
            Some(categorical_annotation("tc-1", "judge", "pass", "2026-01-01T00:00:00Z")),
            None,
            "ai_annotated",
        )),
        parse_case(annotated(
            pointwise_case_json("tc-2", "step", categorical_spec(), step_json("s", "i", None)),
            Some(categorical_annotation("tc-2", "judge", "pass", "2026-01-01T00:00:00Z")),
            Some(skipped),
            "human_annotated",
        )),
    ];
    let stats = compute_stats(&cases, &spec_of(&cases[0])).expect("stats");

    assert_eq!(stats.pending, 1);
    assert_eq!(stats.ai_annotated, 1);
    assert_eq!(stats.human_annotated, 1);
    assert_eq!(stats.agreement_rate, None);
    assert!(stats.confusion_matrix.is_empty());
}

#[test]
fn test_continuous_tolerance_and_error() {
    let case = |id: &str, ai: f64, human: f64| {
        parse_case(annotated(
            pointwise_case_json(id, "step", continuous_spec(), step_json(id, "int-1", None)),
            Some(continuous_annotation(id, "judge", ai)),
            Some(continuous_annotation(id, "alice", human)),
            "human_annotated",
        ))
    };
    let cases = vec![case("tc-1", 8.0, 8.5), case("tc-2", 2.0, 9.0)];
    let stats = compute_stats(&cases, &spec_of(&cases[0])).expect("stats");

    assert_eq!(stats.agreement_rate, Some(0.5));
    assert_eq!(stats.disagreed_test_case_ids, vec!["tc-2"]);
    assert_eq!(stats.mean_absolute_error, Some(3.75));
    let correlation = stats.correlation.expect("correlation");
    assert!((correlation + 1.0).abs() < 1e-9);
}

#[test]
fn test_ranking_agreement() {
    let case = |id: &str, ai: &[usize], human: &[usize]| {
        parse_case(annotated(
            ranking_case_json(
                id,
                "step",
                vec![step_json("a", "int-1", None), step_json("b", "int-2", None), step_json("c", "int-3", None)],
            ),
            Some(ranking_annotation(id, "judge", ai)),
            Some(ranking_annotation(id, "alice", human)),
            "human_annotated",
        ))
    };
    let cases = vec![case("tc-1", &[0, 1, 2], &[0, 1, 2]), case("tc-2", &[0, 1, 2], &[2, 1, 0])];
    let stats = compute_stats(&cases, &spec_of(&cases[0])).expect("stats");

    assert_eq!(stats.agreement_rate, Some(0.5));
    assert_eq!(stats.disagreed_test_case_ids, vec!["tc-2"]);
    // Mean of +1 and -1.
    assert_eq!(stats.correlation, Some(0.0));
}

#[test]
fn test_spec_mismatch_names_the_annotator() {
    let cases = vec![categorical_case("tc-1", "pass", "pass", "2026-02-01T00:00:00Z")];
    let err = compute_stats(&cases, &FeedbackSpec::Continuous { score_range: (0.0, 10.0) })
        .unwrap_err();
    assert_eq!(
        err,
        ValidationError::AnnotationMismatch {
            annotator: "AI",
            expected: "continuous",
            found: "categorical",
        }
    );
}

#[test]
fn test_statistics_helpers() {
    let perfect = pearson_correlation(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).expect("defined");
    assert!((perfect - 1.0).abs() < 1e-9);
    assert_eq!(pearson_correlation(&[1.0, 1.0], &[2.0, 3.0]), None);
    assert_eq!(pearson_correlation(&[], &[]), None);
    assert_eq!(pearson_correlation(&[1.0], &[1.0, 2.0]), None);
    assert_eq!(mean_absolute_error(&[1.0, 4.0], &[2.0, 2.0]), 1.5);
}
