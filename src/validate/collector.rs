// src/validate/collector.rs
//! Merges per-module results into one deterministic summary.

use serde_json::{Map, Value};

use crate::types::{Severity, Summary, Violation};

/// Gathers violations from any number of workers; order of arrival does not
/// affect the final summary.
#[derive(Debug, Default)]
pub struct ViolationCollector {
    violations: Vec<Violation>,
}

impl ViolationCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        self.violations.extend(violations);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Sorts by `(from, to, rule)` and counts per severity. `ViolationRule`
    /// orders by name first.
    ///
    /// `extra` carries upstream summary fields through untouched.
    #[must_use]
    pub fn finish(
        mut self,
        total_cruised: usize,
        total_dependencies_cruised: usize,
        extra: Map<String, Value>,
    ) -> Summary {
        self.violations.sort_by(|a, b| {
            (&a.from, &a.to, &a.rule, &a.via, &a.cycle).cmp(&(&b.from, &b.to, &b.rule, &b.via, &b.cycle))
        });

        let count = |severity: Severity| {
            self.violations
                .iter()
                .filter(|v| v.severity() == severity)
                .count()
        };

        Summary {
            error: count(Severity::Error),
            warn: count(Severity::Warn),
            info: count(Severity::Info),
            total_cruised,
            total_dependencies_cruised,
            extra,
            violations: self.violations,
        }
    }
}
