// src/rules/compiled.rs
//! Rule precompilation.
//!
//! Patterns are compiled exactly once per run; the matcher only ever sees
//! [`CompiledRule`]s.

use regex::Regex;

use crate::error::{DepfenceError, Result};
use crate::types::{DependencyType, Rule, RuleSet, Severity, NOT_IN_ALLOWED};

use super::validation;

/// Name reported for forbidden rules that carry none.
pub const UNNAMED: &str = "unnamed";

/// Which list a rule came from; decides its reported name and default
/// severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Forbidden,
    Allowed,
}

#[derive(Debug, Clone, Default)]
pub struct CompiledRestriction {
    pub path: Option<Regex>,
    pub path_not: Option<Regex>,
}

#[derive(Debug, Clone, Default)]
pub struct CompiledToRestriction {
    pub path: Option<Regex>,
    pub path_not: Option<Regex>,
    pub could_not_resolve: Option<bool>,
    pub circular: Option<bool>,
    pub dynamic: Option<bool>,
    pub dependency_types: Option<Vec<DependencyType>>,
    pub dependency_types_not: Option<Vec<DependencyType>>,
    pub more_than_one_dependency_type: Option<bool>,
    pub license: Option<Regex>,
    pub license_not: Option<Regex>,
    pub exotically_required: Option<bool>,
    pub exotic_require: Option<Regex>,
    pub exotic_require_not: Option<Regex>,
    pub via: Option<Regex>,
    pub via_not: Option<Regex>,
    pub reachable: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// Name used in violations.
    pub name: String,
    pub severity: Severity,
    pub comment: Option<String>,
    pub from: CompiledRestriction,
    pub to: CompiledToRestriction,
    /// The rule as written, for predicates that need no patterns.
    pub rule: Rule,
}

impl CompiledRule {
    /// Compiles one rule. `label` identifies it in error messages.
    ///
    /// # Errors
    /// Returns [`DepfenceError::InvalidPattern`] when a pattern does not compile.
    pub fn compile(rule: &Rule, kind: RuleKind, label: &str) -> Result<Self> {
        let pattern = |field: &'static str, source: Option<&String>| compile(label, field, source);

        let from = CompiledRestriction {
            path: pattern("from.path", rule.from.path.as_ref())?,
            path_not: pattern("from.pathNot", rule.from.path_not.as_ref())?,
        };

        let to = &rule.to;
        let to = CompiledToRestriction {
            path: pattern("to.path", to.path.as_ref())?,
            path_not: pattern("to.pathNot", to.path_not.as_ref())?,
            could_not_resolve: to.could_not_resolve,
            circular: to.circular,
            dynamic: to.dynamic,
            dependency_types: to.dependency_types.clone(),
            dependency_types_not: to.dependency_types_not.clone(),
            more_than_one_dependency_type: to.more_than_one_dependency_type,
            license: pattern("to.license", to.license.as_ref())?,
            license_not: pattern("to.licenseNot", to.license_not.as_ref())?,
            exotically_required: to.exotically_required,
            exotic_require: pattern("to.exoticRequire", to.exotic_require.as_ref())?,
            exotic_require_not: pattern("to.exoticRequireNot", to.exotic_require_not.as_ref())?,
            via: pattern("to.via", to.via.as_ref())?,
            via_not: pattern("to.viaNot", to.via_not.as_ref())?,
            reachable: to.reachable,
        };

        let (name, severity) = match kind {
            RuleKind::Forbidden => (
                rule.name.clone().unwrap_or_else(|| UNNAMED.to_string()),
                rule.severity.unwrap_or_default(),
            ),
            RuleKind::Allowed => (NOT_IN_ALLOWED.to_string(), rule.severity.unwrap_or(Severity::Warn)),
        };

        Ok(Self {
            name,
            severity,
            comment: rule.comment.clone(),
            from,
            to,
            rule: rule.clone(),
        })
    }

    /// Reachability bookkeeping name: the rule's own name or the default bucket.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.rule.bucket_name()
    }

    #[must_use]
    pub fn is_module_rule(&self) -> bool {
        self.rule.is_module_rule()
    }

    #[must_use]
    pub fn is_reachability_rule(&self) -> bool {
        self.to.reachable.is_some()
    }
}

fn compile(label: &str, field: &'static str, source: Option<&String>) -> Result<Option<Regex>> {
    source
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| DepfenceError::InvalidPattern {
                rule: label.to_string(),
                field,
                source,
            })
        })
        .transpose()
}

/// A rule set ready for evaluation.
#[derive(Debug, Clone)]
pub struct CompiledRuleSet {
    pub forbidden: Vec<CompiledRule>,
    pub allowed: Vec<CompiledRule>,
    pub allowed_severity: Severity,
}

impl CompiledRuleSet {
    /// Validates and compiles a rule set.
    ///
    /// # Errors
    /// Returns the first configuration error found; nothing is evaluated then.
    pub fn compile(rule_set: &RuleSet) -> Result<Self> {
        validation::validate(rule_set)?;

        let forbidden = rule_set
            .forbidden
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                CompiledRule::compile(rule, RuleKind::Forbidden, &label(rule, "forbidden", i))
            })
            .collect::<Result<Vec<_>>>()?;

        let allowed = rule_set
            .allowed
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                let mut compiled =
                    CompiledRule::compile(rule, RuleKind::Allowed, &label(rule, "allowed", i))?;
                compiled.severity = rule_set.allowed_severity;
                Ok(compiled)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            forbidden,
            allowed,
            allowed_severity: rule_set.allowed_severity,
        })
    }

    /// Every rule, forbidden and allowed, that governs reachability.
    pub fn reachability_rules(&self) -> impl Iterator<Item = &CompiledRule> {
        self.forbidden
            .iter()
            .chain(&self.allowed)
            .filter(|rule| rule.is_reachability_rule())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forbidden.is_empty() && self.allowed.is_empty()
    }
}

/// `forbidden[2] (no-circular)`-style label for error messages.
#[must_use]
pub fn label(rule: &Rule, list: &str, position: usize) -> String {
    match &rule.name {
        Some(name) => format!("{list}[{position}] ({name})"),
        None => format!("{list}[{position}]"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToRestriction;

    #[test]
    fn test_nameless_forbidden_rule_gets_default_name_and_severity() {
        let compiled = CompiledRule::compile(&Rule::default(), RuleKind::Forbidden, "x").unwrap();
        assert_eq!(compiled.name, UNNAMED);
        assert_eq!(compiled.severity, Severity::Error);
        assert_eq!(compiled.bucket(), NOT_IN_ALLOWED);
    }

    #[test]
    fn test_allowed_rules_use_allowed_severity() {
        let rule_set = RuleSet {
            allowed: vec![Rule::default()],
            allowed_severity: Severity::Info,
            ..RuleSet::default()
        };
        let compiled = CompiledRuleSet::compile(&rule_set).unwrap();
        assert_eq!(compiled.allowed[0].name, NOT_IN_ALLOWED);
        assert_eq!(compiled.allowed[0].severity, Severity::Info);
    }

    #[test]
    fn test_bad_pattern_names_rule_and_field() {
        let rule = Rule {
            name: Some("broken".into()),
            to: ToRestriction {
                license_not: Some("(unclosed".into()),
                ..ToRestriction::default()
            },
            ..Rule::default()
        };
        let rule_set = RuleSet {
            forbidden: vec![Rule::default(), rule],
            ..RuleSet::default()
        };
        let err = CompiledRuleSet::compile(&rule_set).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("forbidden[1] (broken)"), "{message}");
        assert!(message.contains("to.licenseNot"), "{message}");
    }
}
