//! Prelude module for convenient imports
//!
//! Re-exports the types most callers need to load steps, build trees and graphs, and
//! dispatch test cases.
//!
//! # Example
//!
//! ```rust,no_run
//! use annotrace::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/test_case.json")?;
//! let test_case = TestCase::from_json(&json)?;
//!
//! let view = test_case.view(Some(1))?;
//! let steps = view.trace_steps();
//! let tree = build_tree(&steps);
//! println!("{}", TreeFormatter::format(&tree));
//! # Ok(())
//! # }
//! ```

// Builders
pub use crate::graph::{GraphBuilder, LayoutConfig, TraceGraph, build_graph};
pub use crate::hierarchy::{SpanTree, SpanTreeNode, build_tree};

// Data model
pub use crate::data::StepCollection;
pub use crate::model::{
    Annotation, AttributeMatcher, FeedbackConfig, FeedbackSpec, Granularity, Interaction,
    InteractionGroup, JudgeInput, RawJudgeInput, Reference, Step, StepKind, TestCase,
    filter_raw_judge_inputs, validate_steps,
};

// Dispatch and navigation
pub use crate::dispatch::{Selection, TestCaseView};
pub use crate::resolver::{ReferenceScope, is_navigable};
pub use crate::source::{InMemorySource, TraceSource};

// Error types
pub use crate::error::{DispatchError, FetchError, LoadError, ValidationError};

// Rendering
pub use crate::render::TreeFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
