use super::{Granularity, InputItem, Interaction, InteractionGroup, Reference, Step};
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// The raw trace data a judgment is made on.
///
/// There is no structural guessing between the three shapes: the enclosing record's
/// declared granularity decides which variant is parsed (see [`RawJudgeInput::from_value`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawJudgeInput {
    Step(Step),
    Interaction(Interaction),
    Group(InteractionGroup),
}

impl RawJudgeInput {
    /// Parses `value` as the shape named by `granularity`.
    pub fn from_value(
        granularity: Granularity,
        value: serde_json::Value,
    ) -> Result<Self, ValidationError> {
        Ok(match granularity {
            Granularity::Step => RawJudgeInput::Step(serde_json::from_value(value)?),
            Granularity::Interaction => {
                RawJudgeInput::Interaction(serde_json::from_value(value)?)
            }
            Granularity::Group => RawJudgeInput::Group(serde_json::from_value(value)?),
        })
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            RawJudgeInput::Step(_) => Granularity::Step,
            RawJudgeInput::Interaction(_) => Granularity::Interaction,
            RawJudgeInput::Group(_) => Granularity::Group,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            RawJudgeInput::Step(s) => &s.id,
            RawJudgeInput::Interaction(i) => &i.id,
            RawJudgeInput::Group(g) => &g.id,
        }
    }

    pub fn as_step(&self) -> Option<&Step> {
        match self {
            RawJudgeInput::Step(s) => Some(s),
            _ => None,
        }
    }

    /// Every step contained in this input, in storage order.
    pub fn steps(&self) -> Vec<&Step> {
        match self {
            RawJudgeInput::Step(s) => vec![s],
            RawJudgeInput::Interaction(i) => i.steps.iter().collect(),
            RawJudgeInput::Group(g) => g.steps().collect(),
        }
    }
}

/// An [`InputItem`] with the value extracted for it and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputItemValue {
    #[serde(flatten)]
    pub item: InputItem,
    pub value: String,
    #[serde(default)]
    pub references: Vec<Reference>,
}

/// Extracted, rubric-ready inputs for a judge, with the raw input they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "JudgeInputRecord")]
pub struct JudgeInput {
    pub id: String,
    pub source_type: Granularity,
    pub source_ids: Vec<String>,
    pub input_items: Vec<InputItemValue>,
    pub raw_input: RawJudgeInput,
}

#[derive(Deserialize)]
struct JudgeInputRecord {
    id: String,
    source_type: Granularity,
    #[serde(default)]
    source_ids: Vec<String>,
    #[serde(default)]
    input_items: Vec<InputItemValue>,
    raw_input: serde_json::Value,
}

impl TryFrom<JudgeInputRecord> for JudgeInput {
    type Error = ValidationError;

    fn try_from(record: JudgeInputRecord) -> Result<Self, Self::Error> {
        let raw_input = RawJudgeInput::from_value(record.source_type, record.raw_input)?;
        Ok(Self {
            id: record.id,
            source_type: record.source_type,
            source_ids: record.source_ids,
            input_items: record.input_items,
            raw_input,
        })
    }
}

impl JudgeInput {
    /// Checks that every reference points at an entity inside `raw_input`.
    pub fn validate_references(&self) -> Result<(), ValidationError> {
        let scope = crate::resolver::ReferenceScope::from_raw(&self.raw_input);
        self.input_items
            .iter()
            .flat_map(|item| item.references.iter())
            .try_for_each(|reference| scope.check(reference))
    }
}
