//! # Annotrace - Trace Reconstruction and Aggregation for Agent Annotation
//!
//! **Annotrace** turns the flat list of spans recorded for an AI-agent run into the
//! structures an annotation tool needs to show it to a human reviewer: a nested
//! execution tree, a collapsed call graph, and the test cases that pair raw traces with
//! AI and human judgments.
//!
//! ## Core Workflow
//!
//! The crate works on already-materialized, in-memory data. The primary workflow is:
//!
//! 1.  **Load Your Steps**: Deserialize a step collection (see [`data::StepCollection`])
//!     and run [`model::validate_steps`] on it to reject duplicate ids at the boundary.
//! 2.  **Build the Tree**: [`hierarchy::build_tree`] nests steps under their parents,
//!     falling back to the enclosing interaction when a parent is unknown.
//! 3.  **Build the Graph**: [`graph::GraphBuilder`] collapses repeated invocations of the
//!     same named component into one node and counts the calls on each edge.
//! 4.  **Dispatch Test Cases**: [`model::TestCase::view`] selects the item under review,
//!     and [`resolver`] decides which references a viewer may navigate to.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use annotrace::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let collection = StepCollection::from_file("path/to/steps.jsonl")?;
//!     let report = collection.validate()?;
//!     println!("{} steps, {} LLM calls", report.total_steps, report.llm_calls);
//!
//!     // Nested execution tree
//!     let tree = build_tree(collection.steps());
//!     println!("{}", TreeFormatter::format(&tree));
//!
//!     // Collapsed call graph with a custom layout
//!     let graph = GraphBuilder::new()
//!         .with_layout(LayoutConfig::new(240.0, 100.0))
//!         .build(collection.steps());
//!     for edge in &graph.edges {
//!         println!("{} -> {} ({})", edge.source, edge.target, edge.count);
//!     }
//!
//!     // Navigation rules between granularities
//!     assert!(is_navigable(Granularity::Group, Granularity::Step));
//!     Ok(())
//! }
//! ```

pub mod assembly;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod graph;
pub mod hierarchy;
pub mod model;
pub mod prelude;
pub mod render;
pub mod resolver;
pub mod source;
pub mod stats;
