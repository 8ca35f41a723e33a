// src/validate/mod.rs
//! Rule evaluation over an annotated dependency graph.

pub mod collector;
pub mod engine;
pub mod report;

pub use collector::ViolationCollector;
pub use engine::{evaluate, RuleEngine};
pub use report::print_report;
