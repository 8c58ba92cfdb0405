use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata shared by every annotation variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationMeta {
    pub annotation_id: String,
    pub test_case_id: String,
    /// Username or model name.
    pub annotator_id: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalAnnotation {
    #[serde(flatten)]
    pub meta: AnnotationMeta,
    pub categories: Vec<String>,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousAnnotation {
    #[serde(flatten)]
    pub meta: AnnotationMeta,
    pub score_range: (f64, f64),
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingAnnotation {
    #[serde(flatten)]
    pub meta: AnnotationMeta,
    pub comparison_items: usize,
    /// Indices of the compared items, best first.
    pub rankings: Vec<usize>,
}

/// A human or AI judgment, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Annotation {
    Categorical(CategoricalAnnotation),
    Continuous(ContinuousAnnotation),
    Ranking(RankingAnnotation),
}

/// The result carried by a non-skipped annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Judgment<'a> {
    Category(&'a str),
    Score(Option<f64>),
    Ranking(&'a [usize]),
}

impl Annotation {
    pub fn meta(&self) -> &AnnotationMeta {
        match self {
            Annotation::Categorical(a) => &a.meta,
            Annotation::Continuous(a) => &a.meta,
            Annotation::Ranking(a) => &a.meta,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Annotation::Categorical(_) => "categorical",
            Annotation::Continuous(_) => "continuous",
            Annotation::Ranking(_) => "ranking",
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.meta().skip
    }

    pub fn comment(&self) -> Option<&str> {
        self.meta().comment.as_deref()
    }

    /// The judgment to display. Skipped annotations carry no judgment, only a comment.
    pub fn judgment(&self) -> Option<Judgment<'_>> {
        if self.is_skipped() {
            return None;
        }
        Some(match self {
            Annotation::Categorical(a) => Judgment::Category(&a.category),
            Annotation::Continuous(a) => Judgment::Score(a.score),
            Annotation::Ranking(a) => Judgment::Ranking(&a.rankings),
        })
    }

    /// Checks the result fields against the variant's own bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_skipped() {
            return Ok(());
        }
        match self {
            Annotation::Categorical(a) => {
                if !a.categories.contains(&a.category) {
                    return Err(ValidationError::UnknownCategory {
                        category: a.category.clone(),
                        categories: a.categories.clone(),
                    });
                }
            }
            Annotation::Continuous(a) => {
                let (min, max) = a.score_range;
                if let Some(score) = a.score {
                    if !(min..=max).contains(&score) {
                        return Err(ValidationError::ScoreOutOfRange { score, min, max });
                    }
                }
            }
            Annotation::Ranking(a) => {
                if !is_permutation(&a.rankings, a.comparison_items) {
                    return Err(ValidationError::InvalidRankings {
                        rankings: a.rankings.clone(),
                        comparison_items: a.comparison_items,
                    });
                }
            }
        }
        Ok(())
    }
}

fn is_permutation(rankings: &[usize], n: usize) -> bool {
    if rankings.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &idx in rankings {
        match seen.get_mut(idx) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}
