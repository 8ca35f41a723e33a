pub mod cli;
pub mod config;
pub mod error;
pub mod exit;
pub mod graph;
pub mod logging;
pub mod rules;
pub mod types;
pub mod validate;

pub use error::{DepfenceError, Result};
pub use validate::{evaluate, RuleEngine};
