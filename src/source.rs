use crate::error::FetchError;
use crate::model::{Interaction, TestCase};
use ahash::AHashMap;

/// The external collaborator that serves test cases and interactions.
///
/// Implementations wrap whatever transport the host uses. Failures are reported as a
/// [`FetchError`] and passed through untouched; nothing here retries.
pub trait TraceSource {
    fn fetch_test_case(&self, test_case_id: &str) -> Result<TestCase, FetchError>;

    /// Returns the full interaction that contains the given step.
    fn fetch_interaction(&self, step_id: &str) -> Result<Interaction, FetchError>;
}

/// A [`TraceSource`] backed by owned, in-memory snapshots.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    test_cases: AHashMap<String, TestCase>,
    interactions: Vec<Interaction>,
    by_step: AHashMap<String, usize>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_test_case(mut self, test_case: TestCase) -> Self {
        self.test_cases.insert(test_case.id().to_string(), test_case);
        self
    }

    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        let pos = self.interactions.len();
        for step in &interaction.steps {
            self.by_step.entry(step.id.clone()).or_insert(pos);
        }
        self.interactions.push(interaction);
        self
    }
}

impl TraceSource for InMemorySource {
    fn fetch_test_case(&self, test_case_id: &str) -> Result<TestCase, FetchError> {
        self.test_cases
            .get(test_case_id)
            .cloned()
            .ok_or_else(|| FetchError::not_found(format!("Test case '{}' not found", test_case_id)))
    }

    fn fetch_interaction(&self, step_id: &str) -> Result<Interaction, FetchError> {
        self.by_step
            .get(step_id)
            .map(|&pos| self.interactions[pos].clone())
            .ok_or_else(|| {
                FetchError::not_found(format!("No interaction contains step '{}'", step_id))
            })
    }
}
