use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The level at which a judgment is made, ordered coarse to fine.
///
/// The derived ordering is `Group < Interaction < Step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Group,
    Interaction,
    Step,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Group => "group",
            Granularity::Interaction => "interaction",
            Granularity::Step => "step",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group" => Ok(Granularity::Group),
            "interaction" => Ok(Granularity::Interaction),
            "step" => Ok(Granularity::Step),
            other => Err(ValidationError::UnknownGranularity(other.to_string())),
        }
    }
}

/// Citation tracking where an extracted value came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "type")]
    pub kind: Granularity,
    pub id: String,
    /// Field path within the referenced entity, e.g. `output_data.answer`.
    #[serde(default)]
    pub field: Option<String>,
}

impl Reference {
    pub fn new(kind: Granularity, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}
