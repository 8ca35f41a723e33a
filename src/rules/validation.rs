// src/rules/validation.rs
//! Rule-set level checks that run before anything is compiled or evaluated.

use std::collections::HashSet;

use serde_json::Value;
use tracing::warn;

use crate::error::{DepfenceError, Result};
use crate::types::{Rule, RuleSet};

use super::compiled::label;

const MAX_DEPTH_LIMIT: u64 = 99;
const MODULE_SYSTEMS: &[&str] = &["cjs", "amd", "es6", "tsd"];

/// Validates the shape of a rule set.
///
/// # Errors
/// Returns the first rule or option found to be inconsistent.
pub fn validate(rule_set: &RuleSet) -> Result<()> {
    for (i, rule) in rule_set.forbidden.iter().enumerate() {
        check_rule(rule, &label(rule, "forbidden", i))?;
    }
    for (i, rule) in rule_set.allowed.iter().enumerate() {
        let name = label(rule, "allowed", i);
        if rule.orphan_requirement().is_some() {
            return Err(invalid(&name, "orphan clauses are only supported in forbidden rules"));
        }
        check_rule(rule, &name)?;
    }
    if let Some(options) = &rule_set.options {
        check_options(options)?;
    }
    warn_on_shared_names(rule_set);
    Ok(())
}

fn check_rule(rule: &Rule, name: &str) -> Result<()> {
    if rule.orphan_requirement().is_some() && rule.to.reachable.is_some() {
        return Err(invalid(name, "a rule cannot combine 'orphan' and 'reachable'"));
    }
    if rule.is_module_rule() && rule.to.has_dependency_clauses() {
        return Err(invalid(
            name,
            "'orphan' and 'reachable' rules only accept path and pathNot in 'to'",
        ));
    }
    if rule.to.dependency_types.as_ref().is_some_and(Vec::is_empty) {
        return Err(invalid(name, "'dependencyTypes' must not be empty"));
    }
    Ok(())
}

fn check_options(options: &Value) -> Result<()> {
    let Some(options) = options.as_object() else {
        return Err(DepfenceError::InvalidOptions("'options' must be an object".into()));
    };

    if let Some(depth) = options.get("maxDepth") {
        match depth.as_u64() {
            Some(depth) if depth <= MAX_DEPTH_LIMIT => {}
            _ => {
                return Err(DepfenceError::InvalidOptions(format!(
                    "'maxDepth' must be an integer between 0 and {MAX_DEPTH_LIMIT}, got {depth}"
                )))
            }
        }
    }

    if let Some(systems) = options.get("moduleSystems") {
        let valid = systems.as_array().is_some_and(|list| {
            list.iter()
                .all(|s| s.as_str().is_some_and(|s| MODULE_SYSTEMS.contains(&s)))
        });
        if !valid {
            return Err(DepfenceError::InvalidOptions(format!(
                "'moduleSystems' must be a list drawn from {MODULE_SYSTEMS:?}"
            )));
        }
    }
    Ok(())
}

/// Reachability entries are keyed by rule name; two rules sharing one mix
/// their bookkeeping.
fn warn_on_shared_names(rule_set: &RuleSet) {
    let mut seen = HashSet::new();
    for rule in rule_set.forbidden.iter().chain(&rule_set.allowed) {
        if rule.to.reachable.is_none() {
            continue;
        }
        let bucket = rule.bucket_name();
        if !seen.insert(bucket) {
            warn!(rule = bucket, "several reachability rules share one name");
        }
    }
}

fn invalid(rule: &str, reason: &str) -> DepfenceError {
    DepfenceError::InvalidRule {
        rule: rule.to_string(),
        reason: reason.to_string(),
    }
}
