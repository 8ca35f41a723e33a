// src/types/violation.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::rules::Severity;

/// Identifies the rule a violation came from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationRule {
    pub name: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Compact rule reference stored on violating modules and dependencies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RuleSummary {
    pub name: String,
    pub severity: Severity,
}

impl From<&ViolationRule> for RuleSummary {
    fn from(rule: &ViolationRule) -> Self {
        Self {
            name: rule.name.clone(),
            severity: rule.severity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub rule: ViolationRule,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cycle: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<Vec<String>>,
}

impl Violation {
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.rule.severity
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default)]
    pub violations: Vec<Violation>,
    #[serde(default)]
    pub error: usize,
    #[serde(default)]
    pub warn: usize,
    #[serde(default)]
    pub info: usize,
    #[serde(default)]
    pub total_cruised: usize,
    #[serde(default)]
    pub total_dependencies_cruised: usize,
    /// Upstream summary fields (`optionsUsed` and friends), passed through.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Summary {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Count of violations at or above `severity`.
    #[must_use]
    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity() >= severity)
            .count()
    }
}
