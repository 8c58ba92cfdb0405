pub mod collection;

pub use collection::StepCollection;
