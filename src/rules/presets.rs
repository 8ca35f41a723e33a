// src/rules/presets.rs
//! Ready-made rules for the most common architectural constraints.

use crate::types::{DependencyType, Rule, RuleSet, Severity, ToRestriction};

fn rule(name: &str, severity: Severity, comment: &str, to: ToRestriction) -> Rule {
    Rule {
        name: Some(name.to_string()),
        severity: Some(severity),
        comment: Some(comment.to_string()),
        to,
        ..Rule::default()
    }
}

/// Modules nothing depends on and that depend on nothing.
#[must_use]
pub fn no_orphans() -> Rule {
    rule(
        "no-orphans",
        Severity::Warn,
        "This module is not used by anything and does not use anything itself. \
         Either remove it or wire it up.",
        ToRestriction {
            orphan: Some(true),
            ..ToRestriction::default()
        },
    )
}

#[must_use]
pub fn no_circular() -> Rule {
    rule(
        "no-circular",
        Severity::Warn,
        "This dependency is part of a circular relationship.",
        ToRestriction {
            circular: Some(true),
            ..ToRestriction::default()
        },
    )
}

#[must_use]
pub fn not_to_unresolvable() -> Rule {
    rule(
        "not-to-unresolvable",
        Severity::Error,
        "This module depends on a module that cannot be found.",
        ToRestriction {
            could_not_resolve: Some(true),
            ..ToRestriction::default()
        },
    )
}

#[must_use]
pub fn no_duplicate_dep_types() -> Rule {
    rule(
        "no-duplicate-dep-types",
        Severity::Warn,
        "This dependency is declared more than once in the manifest (e.g. both as a \
         regular and as a dev dependency).",
        ToRestriction {
            more_than_one_dependency_type: Some(true),
            dependency_types_not: Some(vec![DependencyType::NpmPeer]),
            ..ToRestriction::default()
        },
    )
}

#[must_use]
pub fn not_to_deprecated() -> Rule {
    rule(
        "not-to-deprecated",
        Severity::Warn,
        "This module uses a deprecated package. Upgrade it or find an alternative.",
        ToRestriction {
            dependency_types: Some(vec![DependencyType::Deprecated]),
            ..ToRestriction::default()
        },
    )
}

#[must_use]
pub fn no_non_package_json() -> Rule {
    rule(
        "no-non-package-json",
        Severity::Error,
        "This module depends on a package that is not declared in the manifest.",
        ToRestriction {
            dependency_types: Some(vec![DependencyType::NpmNoPkg, DependencyType::NpmUnknown]),
            ..ToRestriction::default()
        },
    )
}

/// The rule set used when none is supplied.
#[must_use]
pub fn recommended() -> RuleSet {
    RuleSet {
        forbidden: vec![
            no_circular(),
            no_orphans(),
            not_to_unresolvable(),
            no_non_package_json(),
            no_duplicate_dep_types(),
            not_to_deprecated(),
        ],
        ..RuleSet::default()
    }
}
