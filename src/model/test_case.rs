use super::{Annotation, FeedbackConfig, FeedbackSpec, Granularity, JudgeInput, RawJudgeInput};
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a test case sits in the annotation pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestCaseStatus {
    #[default]
    Pending,
    Summarized,
    AiAnnotated,
    HumanAnnotated,
    Invalid,
}

/// Fields shared by pointwise and ranking test cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseMeta {
    pub test_case_id: String,
    pub feedback_config: FeedbackConfig,
    pub granularity: Granularity,
    #[serde(default)]
    pub ai_annotation: Option<Annotation>,
    #[serde(default)]
    pub human_annotation: Option<Annotation>,
    #[serde(default)]
    pub status: TestCaseStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// A test case judging one item on its own (categorical or continuous feedback).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PointwiseRecord")]
pub struct PointwiseTestCase {
    #[serde(flatten)]
    pub meta: TestCaseMeta,
    pub raw_judge_input: RawJudgeInput,
    pub judge_input: Option<JudgeInput>,
}

/// A test case comparing several items against each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RankingRecord")]
pub struct RankingTestCase {
    #[serde(flatten)]
    pub meta: TestCaseMeta,
    pub comparison_items: usize,
    pub raw_judge_inputs: Vec<RawJudgeInput>,
    pub judge_inputs: Option<Vec<JudgeInput>>,
}

/// An annotation test case, discriminated by `test_case_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "test_case_type", rename_all = "lowercase")]
pub enum TestCase {
    Pointwise(PointwiseTestCase),
    Ranking(RankingTestCase),
}

#[derive(Deserialize)]
struct PointwiseRecord {
    #[serde(flatten)]
    meta: TestCaseMeta,
    raw_judge_input: serde_json::Value,
    #[serde(default)]
    judge_input: Option<JudgeInput>,
}

#[derive(Deserialize)]
struct RankingRecord {
    #[serde(flatten)]
    meta: TestCaseMeta,
    comparison_items: usize,
    raw_judge_inputs: Vec<serde_json::Value>,
    #[serde(default)]
    judge_inputs: Option<Vec<JudgeInput>>,
}

impl TryFrom<PointwiseRecord> for PointwiseTestCase {
    type Error = ValidationError;

    fn try_from(record: PointwiseRecord) -> Result<Self, Self::Error> {
        let granularity = record.meta.feedback_config.granularity;
        let test_case = Self {
            raw_judge_input: RawJudgeInput::from_value(granularity, record.raw_judge_input)?,
            judge_input: record.judge_input,
            meta: record.meta,
        };
        test_case.validate()?;
        Ok(test_case)
    }
}

impl TryFrom<RankingRecord> for RankingTestCase {
    type Error = ValidationError;

    fn try_from(record: RankingRecord) -> Result<Self, Self::Error> {
        let granularity = record.meta.feedback_config.granularity;
        let raw_judge_inputs = record
            .raw_judge_inputs
            .into_iter()
            .map(|value| RawJudgeInput::from_value(granularity, value))
            .collect::<Result<Vec<_>, _>>()?;
        let test_case = Self {
            meta: record.meta,
            comparison_items: record.comparison_items,
            raw_judge_inputs,
            judge_inputs: record.judge_inputs,
        };
        test_case.validate()?;
        Ok(test_case)
    }
}

impl TestCaseMeta {
    fn validate(&self) -> Result<(), ValidationError> {
        let config = self.feedback_config.granularity;
        if self.granularity != config {
            return Err(ValidationError::GranularityMismatch {
                test_case: self.granularity,
                config,
            });
        }
        self.feedback_config.validate()?;
        let spec = &self.feedback_config.feedback_spec;
        if let Some(annotation) = &self.ai_annotation {
            check_annotation(annotation, spec, "AI")?;
        }
        if let Some(annotation) = &self.human_annotation {
            check_annotation(annotation, spec, "Human")?;
        }
        Ok(())
    }

    fn check_raw_input(&self, raw: &RawJudgeInput) -> Result<(), ValidationError> {
        if raw.granularity() != self.granularity {
            return Err(ValidationError::SourceTypeMismatch {
                judge_input_id: raw.id().to_string(),
                expected: self.granularity,
                found: raw.granularity(),
            });
        }
        Ok(())
    }

    fn check_judge_input(&self, judge_input: &JudgeInput) -> Result<(), ValidationError> {
        if judge_input.source_type != self.granularity {
            return Err(ValidationError::SourceTypeMismatch {
                judge_input_id: judge_input.id.clone(),
                expected: self.granularity,
                found: judge_input.source_type,
            });
        }
        Ok(())
    }
}

fn check_annotation(
    annotation: &Annotation,
    spec: &FeedbackSpec,
    annotator: &'static str,
) -> Result<(), ValidationError> {
    // Skipped annotations carry no judgment, so their variant is not checked.
    if annotation.is_skipped() {
        return Ok(());
    }
    if annotation.type_name() != spec.type_name() {
        return Err(ValidationError::AnnotationMismatch {
            annotator,
            expected: spec.type_name(),
            found: annotation.type_name(),
        });
    }
    annotation.validate()
}

impl PointwiseTestCase {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.meta.validate()?;
        let spec = &self.meta.feedback_config.feedback_spec;
        if !spec.is_pointwise() {
            return Err(ValidationError::SpecMismatch {
                spec: spec.type_name(),
                test_case_type: "pointwise",
            });
        }
        self.meta.check_raw_input(&self.raw_judge_input)?;
        if let Some(judge_input) = &self.judge_input {
            self.meta.check_judge_input(judge_input)?;
        }
        Ok(())
    }
}

impl RankingTestCase {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.meta.validate()?;
        match self.meta.feedback_config.feedback_spec {
            FeedbackSpec::Ranking { comparison_items } => {
                if comparison_items != self.comparison_items {
                    return Err(ValidationError::ComparisonCountMismatch {
                        field: "feedback_spec.comparison_items",
                        expected: self.comparison_items,
                        found: comparison_items,
                    });
                }
            }
            ref spec => {
                return Err(ValidationError::SpecMismatch {
                    spec: spec.type_name(),
                    test_case_type: "ranking",
                });
            }
        }
        if self.raw_judge_inputs.len() != self.comparison_items {
            return Err(ValidationError::ComparisonCountMismatch {
                field: "raw_judge_inputs",
                expected: self.comparison_items,
                found: self.raw_judge_inputs.len(),
            });
        }
        for raw in &self.raw_judge_inputs {
            self.meta.check_raw_input(raw)?;
        }
        if let Some(judge_inputs) = &self.judge_inputs {
            if judge_inputs.len() != self.comparison_items {
                return Err(ValidationError::ComparisonCountMismatch {
                    field: "judge_inputs",
                    expected: self.comparison_items,
                    found: judge_inputs.len(),
                });
            }
            for judge_input in judge_inputs {
                self.meta.check_judge_input(judge_input)?;
            }
        }
        Ok(())
    }
}

impl TestCase {
    /// Parses and validates a test case from JSON.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn meta(&self) -> &TestCaseMeta {
        match self {
            TestCase::Pointwise(tc) => &tc.meta,
            TestCase::Ranking(tc) => &tc.meta,
        }
    }

    pub fn id(&self) -> &str {
        &self.meta().test_case_id
    }

    pub fn granularity(&self) -> Granularity {
        self.meta().granularity
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            TestCase::Pointwise(_) => "pointwise",
            TestCase::Ranking(_) => "ranking",
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            TestCase::Pointwise(tc) => tc.validate(),
            TestCase::Ranking(tc) => tc.validate(),
        }
    }
}
