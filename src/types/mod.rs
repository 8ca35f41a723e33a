// src/types/mod.rs
//! Document types shared by the analyzers, the rule engine and the CLI.
//!
//! Everything here mirrors the JSON shape of a cruise result and a rule set
//! (camelCase keys). Fields the engine does not interpret are kept in
//! `extra` so a graph survives the round trip unchanged.

mod graph;
mod rules;
mod violation;

pub use graph::{
    Dependency, DependencyType, Graph, Module, ReachableEntry, ReachedModule, ReachesEntry,
};
pub use rules::{Restriction, Rule, RuleSet, Severity, ToRestriction, NOT_IN_ALLOWED};
pub use violation::{RuleSummary, Summary, Violation, ViolationRule};
