// src/types/graph.rs
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::violation::{RuleSummary, Summary};

/// How a dependency was found to be needed by its module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyType {
    Local,
    Npm,
    NpmDev,
    NpmOptional,
    NpmPeer,
    NpmBundled,
    NpmNoPkg,
    NpmUnknown,
    Core,
    Unknown,
    Undetermined,
    Deprecated,
}

impl DependencyType {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Npm => "npm",
            Self::NpmDev => "npm-dev",
            Self::NpmOptional => "npm-optional",
            Self::NpmPeer => "npm-peer",
            Self::NpmBundled => "npm-bundled",
            Self::NpmNoPkg => "npm-no-pkg",
            Self::NpmUnknown => "npm-unknown",
            Self::Core => "core",
            Self::Unknown => "unknown",
            Self::Undetermined => "undetermined",
            Self::Deprecated => "deprecated",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const fn default_true() -> bool {
    true
}

/// One resolved (or unresolvable) dependency edge of a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    /// The specifier as written in the source.
    pub module: String,
    /// Normalized path. Empty exactly when `could_not_resolve` is set.
    #[serde(default)]
    pub resolved: String,
    #[serde(default)]
    pub dependency_types: Vec<DependencyType>,
    #[serde(default)]
    pub dynamic: bool,
    /// False for edges the extractor was told not to follow (`doNotFollow`).
    #[serde(default = "default_true")]
    pub followable: bool,
    #[serde(default)]
    pub circular: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cycle: Vec<String>,
    #[serde(default)]
    pub could_not_resolve: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default)]
    pub exotically_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exotic_require: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dependency {
    /// A resolved local dependency; mostly useful for building graphs in code.
    #[must_use]
    pub fn local(resolved: impl Into<String>) -> Self {
        let resolved = resolved.into();
        Self {
            module: resolved.clone(),
            resolved,
            dependency_types: vec![DependencyType::Local],
            dynamic: false,
            followable: true,
            circular: false,
            cycle: Vec::new(),
            could_not_resolve: false,
            license: None,
            exotically_required: false,
            exotic_require: None,
            valid: None,
            rules: Vec::new(),
            extra: Map::new(),
        }
    }

    /// An edge whose specifier could not be resolved to a path.
    #[must_use]
    pub fn unresolved(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            resolved: String::new(),
            dependency_types: vec![DependencyType::Unknown],
            could_not_resolve: true,
            ..Self::local("")
        }
    }

    /// The path-bearing field rules test against: `resolved`, or the raw
    /// specifier when the edge is unresolved.
    #[must_use]
    pub fn target(&self) -> &str {
        if self.could_not_resolve || self.resolved.is_empty() {
            &self.module
        } else {
            &self.resolved
        }
    }
}

/// A module -> reached module fact, with the hops taken to get there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachedModule {
    pub source: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub via: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachesEntry {
    pub modules: Vec<ReachedModule>,
    pub as_defined_in_rule: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachableEntry {
    pub value: bool,
    pub as_defined_in_rule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_from: Option<String>,
}

/// A node of the dependency graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub source: String,
    /// No dependents and no dependencies.
    #[serde(default)]
    pub orphan: bool,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependents: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaches: Option<Vec<ReachesEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reachable: Option<Vec<ReachableEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Module {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_dependencies(mut self, dependencies: Vec<Dependency>) -> Self {
        self.dependencies = dependencies;
        self
    }

    #[must_use]
    pub fn orphaned(mut self) -> Self {
        self.orphan = true;
        self
    }
}

/// A cruise result: the graph handed to the engine and returned annotated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    pub modules: Vec<Module>,
    /// Directory rollups. Carried through, never evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folders: Option<Vec<Value>>,
    #[serde(default)]
    pub summary: Summary,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Graph {
    #[must_use]
    pub fn new(modules: Vec<Module>) -> Self {
        Self {
            modules,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn module(&self, source: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.source == source)
    }

    #[must_use]
    pub fn dependency_count(&self) -> usize {
        self.modules.iter().map(|m| m.dependencies.len()).sum()
    }
}
