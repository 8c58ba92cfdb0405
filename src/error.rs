use crate::model::Granularity;
use thiserror::Error;

/// Errors raised when data handed to the core does not satisfy the data model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Failed to parse JSON: {0}")]
    JsonParseError(String),

    #[error("Step id '{0}' appears more than once in the collection")]
    DuplicateStepId(String),

    #[error("Unknown granularity '{0}' (expected 'step', 'interaction' or 'group')")]
    UnknownGranularity(String),

    #[error(
        "Test case granularity '{test_case}' does not match feedback config granularity '{config}'"
    )]
    GranularityMismatch {
        test_case: Granularity,
        config: Granularity,
    },

    #[error("Judge input '{judge_input_id}' has source type '{found}', expected '{expected}'")]
    SourceTypeMismatch {
        judge_input_id: String,
        expected: Granularity,
        found: Granularity,
    },

    #[error("Expected {expected} compared items, but found {found} in '{field}'")]
    ComparisonCountMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{annotator} annotation is '{found}', but the feedback spec is '{expected}'")]
    AnnotationMismatch {
        annotator: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Feedback spec '{spec}' cannot be used for a {test_case_type} test case")]
    SpecMismatch {
        spec: &'static str,
        test_case_type: &'static str,
    },

    #[error("Category '{category}' is not one of {categories:?}")]
    UnknownCategory {
        category: String,
        categories: Vec<String>,
    },

    #[error("Score {score} is outside the range [{min}, {max}]")]
    ScoreOutOfRange { score: f64, min: f64, max: f64 },

    #[error("Rankings {rankings:?} are not a permutation of 0..{comparison_items}")]
    InvalidRankings {
        rankings: Vec<usize>,
        comparison_items: usize,
    },

    #[error("Invalid attribute matcher pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Reference to {kind} '{id}' not found in the raw judge input")]
    UnknownReference { kind: Granularity, id: String },
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError::JsonParseError(err.to_string())
    }
}

/// Errors raised when a caller navigates to something that does not exist.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Compared item {index} is out of range (test case has {len} items)")]
    OutOfRange { index: usize, len: usize },
}

/// An upstream fetch failure, carried through unchanged to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Fetch failed with status {status}: {message}")]
pub struct FetchError {
    pub status: u16,
    pub message: String,
}

impl FetchError {
    pub const NOT_FOUND: u16 = 404;

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: Self::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Self::NOT_FOUND
    }
}

/// Errors raised while loading a step collection from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid step on line {line}: {message}")]
    InvalidLine { line: usize, message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
