pub mod evaluate;
pub mod listener;
pub mod schema;
pub mod session;
pub mod shape;

pub use crate::domain::model::{Digit, Left, Operator, Thought, ThoughtResult, Unused};
pub use crate::domain::ports::DocumentSource;
pub use crate::utils::error::Result;
