pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::LocalSource;
pub use config::toml_config::{ListenerConfig, ServiceConfig};
pub use crate::core::evaluate::{evaluate, extract_expression, Number};
pub use crate::core::listener::Listener;
pub use crate::core::session::Session;
pub use crate::core::shape::{parse_document, parse_result, validate_value, ShapeReport};
pub use domain::model::{Digit, Left, Operator, Thought, ThoughtResult, Unused};
pub use utils::error::{Result, ThoughtError};
