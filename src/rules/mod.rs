// src/rules/mod.rs
//! Rules: precompilation, restriction matching and the orphan policy.

pub mod compiled;
pub mod load;
pub mod matcher;
pub mod orphans;
pub mod presets;
pub mod validation;

pub use compiled::{CompiledRule, CompiledRuleSet, RuleKind};
pub use load::load_rule_set;
pub use matcher::{matches_dependency_rule, matches_reachable_rule, matches_reaches_rule};
pub use orphans::{OrphanException, OrphanPolicy};
