pub mod formatter;

pub use formatter::TreeFormatter;
