//! Agreement statistics between AI and human annotations.

use crate::error::ValidationError;
use crate::model::{Annotation, FeedbackSpec, TestCase, TestCaseStatus};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;

/// Fraction of the score range within which two continuous scores count as agreeing.
pub const CONTINUOUS_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedbackConfigStats {
    pub total_test_cases: usize,
    pub pending: usize,
    pub summarized: usize,
    pub ai_annotated: usize,
    pub human_annotated: usize,
    pub invalid: usize,

    pub agreement_rate: Option<f64>,
    pub disagreement_rate: Option<f64>,
    /// Sorted by the human annotation's timestamp.
    pub disagreed_test_case_ids: Vec<String>,

    pub ai_category_distribution: BTreeMap<String, usize>,
    pub human_category_distribution: BTreeMap<String, usize>,
    /// `confusion_matrix[ai_category][human_category]`.
    pub confusion_matrix: BTreeMap<String, BTreeMap<String, usize>>,

    pub mean_absolute_error: Option<f64>,
    pub correlation: Option<f64>,
}

/// One test case that both an AI and a human judged without skipping.
struct DualAnnotated<'a> {
    test_case_id: &'a str,
    ai: &'a Annotation,
    human: &'a Annotation,
}

impl DualAnnotated<'_> {
    fn human_timestamp(&self) -> DateTime<Utc> {
        self.human.meta().timestamp
    }
}

#[derive(Default)]
struct Tally<'a> {
    agreements: usize,
    disagreements: usize,
    disagreed: Vec<(DateTime<Utc>, &'a str)>,
}

impl<'a> Tally<'a> {
    fn record(&mut self, case: &DualAnnotated<'a>, agrees: bool) {
        if agrees {
            self.agreements += 1;
        } else {
            self.disagreements += 1;
            self.disagreed.push((case.human_timestamp(), case.test_case_id));
        }
    }
}

/// Computes status counts and AI-vs-human agreement for a set of test cases.
pub fn compute_stats(
    test_cases: &[TestCase],
    spec: &FeedbackSpec,
) -> Result<FeedbackConfigStats, ValidationError> {
    let status_counts = test_cases.iter().map(|tc| tc.meta().status).counts();
    let count = |status: TestCaseStatus| status_counts.get(&status).copied().unwrap_or(0);

    let mut stats = FeedbackConfigStats {
        total_test_cases: test_cases.len(),
        pending: count(TestCaseStatus::Pending),
        summarized: count(TestCaseStatus::Summarized),
        ai_annotated: count(TestCaseStatus::AiAnnotated),
        human_annotated: count(TestCaseStatus::HumanAnnotated),
        invalid: count(TestCaseStatus::Invalid),
        ..Default::default()
    };

    let dual: Vec<DualAnnotated<'_>> = test_cases
        .iter()
        .filter_map(|tc| {
            let meta = tc.meta();
            match (&meta.ai_annotation, &meta.human_annotation) {
                (Some(ai), Some(human)) if !ai.is_skipped() && !human.is_skipped() => {
                    Some(DualAnnotated {
                        test_case_id: &meta.test_case_id,
                        ai,
                        human,
                    })
                }
                _ => None,
            }
        })
        .collect();
    if dual.is_empty() {
        return Ok(stats);
    }

    let mut tally = match spec {
        FeedbackSpec::Categorical { .. } => categorical_stats(&dual, &mut stats)?,
        FeedbackSpec::Continuous { .. } => continuous_stats(&dual, &mut stats)?,
        FeedbackSpec::Ranking { .. } => ranking_stats(&dual, &mut stats)?,
    };

    let compared = tally.agreements + tally.disagreements;
    if compared > 0 {
        stats.agreement_rate = Some(tally.agreements as f64 / compared as f64);
        stats.disagreement_rate = Some(tally.disagreements as f64 / compared as f64);
    }
    tally.disagreed.sort();
    stats.disagreed_test_case_ids = tally
        .disagreed
        .into_iter()
        .map(|(_, id)| id.to_string())
        .collect();

    tracing::debug!(
        total = stats.total_test_cases,
        compared,
        spec = spec.type_name(),
        "computed feedback stats"
    );
    Ok(stats)
}

fn mismatch(expected: &'static str, case: &DualAnnotated<'_>) -> ValidationError {
    let (annotator, annotation) = if case.ai.type_name() != expected {
        ("AI", case.ai)
    } else {
        ("Human", case.human)
    };
    ValidationError::AnnotationMismatch {
        annotator,
        expected,
        found: annotation.type_name(),
    }
}

fn categorical_stats<'a>(
    dual: &[DualAnnotated<'a>],
    stats: &mut FeedbackConfigStats,
) -> Result<Tally<'a>, ValidationError> {
    let mut tally = Tally::default();
    for case in dual {
        let (Annotation::Categorical(ai), Annotation::Categorical(human)) = (case.ai, case.human)
        else {
            return Err(mismatch("categorical", case));
        };
        tally.record(case, ai.category == human.category);

        *stats
            .ai_category_distribution
            .entry(ai.category.clone())
            .or_default() += 1;
        *stats
            .human_category_distribution
            .entry(human.category.clone())
            .or_default() += 1;
        *stats
            .confusion_matrix
            .entry(ai.category.clone())
            .or_default()
            .entry(human.category.clone())
            .or_default() += 1;
    }
    Ok(tally)
}

fn continuous_stats<'a>(
    dual: &[DualAnnotated<'a>],
    stats: &mut FeedbackConfigStats,
) -> Result<Tally<'a>, ValidationError> {
    let mut tally = Tally::default();
    let mut ai_scores = Vec::new();
    let mut human_scores = Vec::new();
    for case in dual {
        let (Annotation::Continuous(ai), Annotation::Continuous(human)) = (case.ai, case.human)
        else {
            return Err(mismatch("continuous", case));
        };
        let (Some(ai_score), Some(human_score)) = (ai.score, human.score) else {
            continue;
        };
        ai_scores.push(ai_score);
        human_scores.push(human_score);

        let (min, max) = ai.score_range;
        let tolerance = (max - min) * CONTINUOUS_TOLERANCE;
        tally.record(case, (ai_score - human_score).abs() <= tolerance);
    }

    if !ai_scores.is_empty() {
        stats.mean_absolute_error = Some(mean_absolute_error(&ai_scores, &human_scores));
        if ai_scores.len() > 1 {
            stats.correlation = pearson_correlation(&ai_scores, &human_scores);
        }
    }
    Ok(tally)
}

fn ranking_stats<'a>(
    dual: &[DualAnnotated<'a>],
    stats: &mut FeedbackConfigStats,
) -> Result<Tally<'a>, ValidationError> {
    let mut tally = Tally::default();
    let mut correlations = Vec::new();
    for case in dual {
        let (Annotation::Ranking(ai), Annotation::Ranking(human)) = (case.ai, case.human) else {
            return Err(mismatch("ranking", case));
        };
        if ai.rankings.is_empty() || ai.rankings.len() != human.rankings.len() {
            continue;
        }
        tally.record(case, ai.rankings == human.rankings);

        let as_f64 = |r: &[usize]| r.iter().map(|&i| i as f64).collect::<Vec<_>>();
        if let Some(corr) = pearson_correlation(&as_f64(&ai.rankings), &as_f64(&human.rankings)) {
            correlations.push(corr);
        }
    }

    if !correlations.is_empty() {
        stats.correlation = Some(correlations.iter().sum::<f64>() / correlations.len() as f64);
    }
    Ok(tally)
}

/// Pearson correlation coefficient; `None` for empty, unequal or zero-variance input.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let numerator: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum();
    let denom_a = a.iter().map(|x| (x - mean_a).powi(2)).sum::<f64>().sqrt();
    let denom_b = b.iter().map(|y| (y - mean_b).powi(2)).sum::<f64>().sqrt();

    if denom_a == 0.0 || denom_b == 0.0 {
        return None;
    }
    Some(numerator / (denom_a * denom_b))
}

/// Mean absolute error over paired values. Callers guarantee non-empty input.
pub fn mean_absolute_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum::<f64>() / a.len() as f64
}
