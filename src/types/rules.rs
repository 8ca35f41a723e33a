// src/types/rules.rs
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::graph::DependencyType;

/// Bucket name for nameless reachability rules and for allowed-rule misses.
pub const NOT_IN_ALLOWED: &str = "not-in-allowed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The `from` end of a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restriction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_not: Option<String>,
    /// Older rule sets put the orphan clause on `from`; treated as `to.orphan`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orphan: Option<bool>,
}

/// The `to` end of a rule. Every present clause must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToRestriction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_not: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub could_not_resolve: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circular: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_types: Option<Vec<DependencyType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_types_not: Option<Vec<DependencyType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub more_than_one_dependency_type: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_not: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exotically_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exotic_require: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exotic_require_not: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via_not: Option<String>,
    /// Absent: the rule says nothing about reachability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reachable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orphan: Option<bool>,
}

impl ToRestriction {
    /// True when any clause only makes sense on a dependency edge.
    #[must_use]
    pub fn has_dependency_clauses(&self) -> bool {
        self.could_not_resolve.is_some()
            || self.circular.is_some()
            || self.dynamic.is_some()
            || self.dependency_types.is_some()
            || self.dependency_types_not.is_some()
            || self.more_than_one_dependency_type.is_some()
            || self.license.is_some()
            || self.license_not.is_some()
            || self.exotically_required.is_some()
            || self.exotic_require.is_some()
            || self.exotic_require_not.is_some()
            || self.via.is_some()
            || self.via_not.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub from: Restriction,
    #[serde(default)]
    pub to: ToRestriction,
}

impl Rule {
    /// Name used for reachability bookkeeping.
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        self.name.as_deref().unwrap_or(NOT_IN_ALLOWED)
    }

    /// The orphan requirement, wherever the rule set put it.
    #[must_use]
    pub fn orphan_requirement(&self) -> Option<bool> {
        self.to.orphan.or(self.from.orphan)
    }

    /// Module-level rules are judged once per module, not once per edge.
    #[must_use]
    pub fn is_module_rule(&self) -> bool {
        self.orphan_requirement().is_some() || self.to.reachable.is_some()
    }
}

const fn default_allowed_severity() -> Severity {
    Severity::Warn
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    #[serde(default)]
    pub forbidden: Vec<Rule>,
    #[serde(default)]
    pub allowed: Vec<Rule>,
    #[serde(default = "default_allowed_severity")]
    pub allowed_severity: Severity,
    /// Cruise options consumed upstream; only sanity-checked here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            forbidden: Vec::new(),
            allowed: Vec::new(),
            allowed_severity: default_allowed_severity(),
            options: None,
        }
    }
}
