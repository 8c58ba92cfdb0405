pub mod annotation;
pub mod feedback;
pub mod interaction;
pub mod judge;
pub mod matcher;
pub mod reference;
pub mod step;
pub mod test_case;
pub mod validate;

pub use annotation::*;
pub use feedback::*;
pub use interaction::*;
pub use judge::*;
pub use matcher::*;
pub use reference::*;
pub use step::*;
pub use test_case::*;
pub use validate::*;
