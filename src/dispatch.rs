//! Pointwise vs. ranking dispatch for annotation test cases.
//!
//! Dispatch is driven by the `test_case_type` discriminant alone, never by which
//! optional fields happen to be present.

use crate::error::{DispatchError, FetchError};
use crate::model::{
    Annotation, Granularity, Interaction, JudgeInput, RawJudgeInput, Reference, Step, TestCase,
};
use crate::resolver::is_navigable;
use crate::source::TraceSource;
use std::borrow::Cow;

/// Which item of a test case is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Single,
    Compared { index: usize, len: usize },
}

/// The parts of a test case a viewer needs for the currently selected item.
#[derive(Debug, Clone)]
pub struct TestCaseView<'a> {
    pub test_case: &'a TestCase,
    pub granularity: Granularity,
    pub selection: Selection,
    pub raw_judge_input: &'a RawJudgeInput,
    pub judge_input: Option<&'a JudgeInput>,
}

impl TestCase {
    /// Resolves the active item.
    ///
    /// Pointwise cases ignore `selector`. Ranking cases default to item 0 and reject an
    /// index past the last compared item instead of clamping it.
    pub fn view(&self, selector: Option<usize>) -> Result<TestCaseView<'_>, DispatchError> {
        let granularity = self.granularity();
        match self {
            TestCase::Pointwise(tc) => Ok(TestCaseView {
                test_case: self,
                granularity,
                selection: Selection::Single,
                raw_judge_input: &tc.raw_judge_input,
                judge_input: tc.judge_input.as_ref(),
            }),
            TestCase::Ranking(tc) => {
                let index = selector.unwrap_or(0);
                let len = tc.raw_judge_inputs.len();
                let raw_judge_input = tc
                    .raw_judge_inputs
                    .get(index)
                    .ok_or(DispatchError::OutOfRange { index, len })?;
                let judge_input = tc.judge_inputs.as_ref().and_then(|inputs| inputs.get(index));
                Ok(TestCaseView {
                    test_case: self,
                    granularity,
                    selection: Selection::Compared { index, len },
                    raw_judge_input,
                    judge_input,
                })
            }
        }
    }
}

/// A lone step judged at step granularity is shown inside its surrounding interaction.
pub fn needs_context_expansion(granularity: Granularity, raw: &RawJudgeInput) -> bool {
    granularity == Granularity::Step && matches!(raw, RawJudgeInput::Step(_))
}

impl<'a> TestCaseView<'a> {
    pub fn needs_context(&self) -> bool {
        needs_context_expansion(self.granularity, self.raw_judge_input)
    }

    /// Fetches the interaction around a lone step, when the view calls for it.
    ///
    /// Returns `Ok(None)` without touching `source` otherwise.
    pub fn load_context<S>(&self, source: &S) -> Result<Option<Interaction>, FetchError>
    where
        S: TraceSource + ?Sized,
    {
        match self.raw_judge_input {
            RawJudgeInput::Step(step) if self.needs_context() => {
                tracing::debug!(step_id = %step.id, "expanding step into its interaction");
                source.fetch_interaction(&step.id).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// The steps to feed the tree and graph builders for this item.
    pub fn trace_steps(&self) -> Cow<'a, [Step]> {
        match self.raw_judge_input {
            RawJudgeInput::Step(step) => Cow::Borrowed(std::slice::from_ref(step)),
            RawJudgeInput::Interaction(interaction) => Cow::Borrowed(&interaction.steps),
            RawJudgeInput::Group(group) => Cow::Owned(group.steps().cloned().collect()),
        }
    }

    pub fn ai_annotation(&self) -> Option<&'a Annotation> {
        self.test_case.meta().ai_annotation.as_ref()
    }

    pub fn human_annotation(&self) -> Option<&'a Annotation> {
        self.test_case.meta().human_annotation.as_ref()
    }

    /// Every reference cited by the active judge input.
    pub fn references(&self) -> impl Iterator<Item = &'a Reference> + 'a {
        self.judge_input
            .into_iter()
            .flat_map(|ji| ji.input_items.iter())
            .flat_map(|item| item.references.iter())
    }

    /// References that lead somewhere finer than the current granularity.
    pub fn navigable_references(&self) -> Vec<&'a Reference> {
        let granularity = self.granularity;
        self.references()
            .filter(|r| is_navigable(granularity, r.kind))
            .collect()
    }
}
