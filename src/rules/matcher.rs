// src/rules/matcher.rs
//! Restriction matching: does one `from`/`to` restriction hold for one
//! module or one dependency edge?
//!
//! All clauses present on a restriction are ANDed; an absent clause holds
//! vacuously, so an empty restriction matches everything. A clause that
//! needs a field the candidate lacks (a license, an exotic require) does
//! not match.

use regex::Regex;

use crate::types::{Dependency, Module, Rule};

use super::compiled::{CompiledRestriction, CompiledRule, CompiledToRestriction};

fn path_holds(path: Option<&Regex>, path_not: Option<&Regex>, value: &str) -> bool {
    path.map_or(true, |re| re.is_match(value)) && path_not.map_or(true, |re| !re.is_match(value))
}

fn flag_holds(wanted: Option<bool>, actual: bool) -> bool {
    wanted.map_or(true, |wanted| wanted == actual)
}

/// `license`/`exoticRequire` style clauses: an absent value never matches.
fn optional_holds(wanted: Option<&Regex>, unwanted: Option<&Regex>, value: Option<&str>) -> bool {
    if wanted.is_none() && unwanted.is_none() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    path_holds(wanted, unwanted, value)
}

impl CompiledRestriction {
    /// Tests the restriction against a module's `source`.
    #[must_use]
    pub fn matches(&self, module: &Module) -> bool {
        path_holds(self.path.as_ref(), self.path_not.as_ref(), &module.source)
    }
}

impl CompiledToRestriction {
    /// Tests only the path clauses, against a module's `source`. Used for
    /// module-level rules where the `to` end is a module, not an edge.
    #[must_use]
    pub fn matches_module(&self, module: &Module) -> bool {
        self.matches_source(&module.source)
    }

    /// Path clauses only, against a module path.
    #[must_use]
    pub fn matches_source(&self, source: &str) -> bool {
        path_holds(self.path.as_ref(), self.path_not.as_ref(), source)
    }

    /// Tests every clause against a dependency edge.
    #[must_use]
    pub fn matches(&self, dependency: &Dependency) -> bool {
        path_holds(self.path.as_ref(), self.path_not.as_ref(), dependency.target())
            && self.types_hold(dependency)
            && flag_holds(self.could_not_resolve, dependency.could_not_resolve)
            && flag_holds(self.circular, dependency.circular)
            && flag_holds(self.dynamic, dependency.dynamic)
            && flag_holds(self.exotically_required, dependency.exotically_required)
            && optional_holds(
                self.license.as_ref(),
                self.license_not.as_ref(),
                dependency.license.as_deref(),
            )
            && optional_holds(
                self.exotic_require.as_ref(),
                self.exotic_require_not.as_ref(),
                dependency.exotic_require.as_deref(),
            )
            && self.via_holds(dependency)
    }

    fn types_hold(&self, dependency: &Dependency) -> bool {
        let types = &dependency.dependency_types;
        let intersects = |wanted: &Vec<_>| types.iter().any(|t| wanted.contains(t));

        self.dependency_types.as_ref().map_or(true, intersects)
            && self
                .dependency_types_not
                .as_ref()
                .map_or(true, |unwanted| !intersects(unwanted))
            && flag_holds(self.more_than_one_dependency_type, types.len() > 1)
    }

    fn via_holds(&self, dependency: &Dependency) -> bool {
        if self.via.is_none() && self.via_not.is_none() {
            return true;
        }
        if dependency.cycle.is_empty() {
            return false;
        }
        let any_matches = |re: &Regex| dependency.cycle.iter().any(|m| re.is_match(m));
        self.via.as_ref().map_or(true, any_matches)
            && self.via_not.as_ref().map_or(true, |re| !any_matches(re))
    }
}

/// True when both ends of a dependency-level rule hold for this edge.
#[must_use]
pub fn matches_dependency_rule(rule: &CompiledRule, module: &Module, dependency: &Dependency) -> bool {
    rule.from.matches(module) && rule.to.matches(dependency)
}

/// True when the rule governs reachability and the module carries a
/// `reaches` entry recorded for it.
///
/// A named rule only matches entries with exactly its name; a nameless rule
/// only matches the `not-in-allowed` bucket.
#[must_use]
pub fn matches_reaches_rule(rule: &Rule, module: &Module) -> bool {
    if rule.to.reachable.is_none() {
        return false;
    }
    let bucket = rule.bucket_name();
    module
        .reaches
        .as_deref()
        .unwrap_or_default()
        .iter()
        .any(|entry| entry.as_defined_in_rule == bucket)
}

/// True when the module is a `to` candidate of the rule whose recorded
/// reachability equals `value`.
#[must_use]
pub fn matches_reachable_rule(rule: &Rule, module: &Module, value: bool) -> bool {
    if rule.to.reachable.is_none() {
        return false;
    }
    let bucket = rule.bucket_name();
    module
        .reachable
        .as_deref()
        .unwrap_or_default()
        .iter()
        .any(|entry| entry.as_defined_in_rule == bucket && entry.value == value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::compiled::RuleKind;
    use crate::types::{DependencyType, ReachesEntry, ReachedModule, Restriction, ToRestriction};

    fn compile(from: Restriction, to: ToRestriction) -> CompiledRule {
        let rule = Rule {
            from,
            to,
            ..Rule::default()
        };
        CompiledRule::compile(&rule, RuleKind::Forbidden, "test").unwrap()
    }

    fn to(to: ToRestriction) -> CompiledRule {
        compile(Restriction::default(), to)
    }

    fn npm(resolved: &str, types: &[DependencyType]) -> Dependency {
        Dependency {
            module: resolved.to_string(),
            dependency_types: types.to_vec(),
            ..Dependency::local(resolved)
        }
    }

    #[test]
    fn test_empty_restrictions_match_everything() {
        let rule = to(ToRestriction::default());
        let module = Module::new("src/index.js");
        assert!(matches_dependency_rule(&rule, &module, &Dependency::local("src/a.js")));
        assert!(matches_dependency_rule(&rule, &module, &Dependency::unresolved("./gone")));
    }

    #[test]
    fn test_path_and_path_not() {
        let rule = compile(
            Restriction {
                path: Some("^src/".into()),
                path_not: Some("\\.spec\\.js$".into()),
                orphan: None,
            },
            ToRestriction {
                path: Some("^lib/".into()),
                ..ToRestriction::default()
            },
        );
        let dep = Dependency::local("lib/util.js");

        assert!(matches_dependency_rule(&rule, &Module::new("src/a.js"), &dep));
        assert!(!matches_dependency_rule(&rule, &Module::new("src/a.spec.js"), &dep));
        assert!(!matches_dependency_rule(&rule, &Module::new("test/a.js"), &dep));
        assert!(!matches_dependency_rule(
            &rule,
            &Module::new("src/a.js"),
            &Dependency::local("src/b.js")
        ));
    }

    #[test]
    fn test_unresolved_edges_match_on_specifier() {
        let rule = to(ToRestriction {
            path: Some("^left-pad$".into()),
            could_not_resolve: Some(true),
            ..ToRestriction::default()
        });
        assert!(rule.to.matches(&Dependency::unresolved("left-pad")));
        assert!(!rule.to.matches(&Dependency::local("left-pad")));
    }

    #[test]
    fn test_dependency_types() {
        let rule = to(ToRestriction {
            dependency_types: Some(vec![DependencyType::NpmDev, DependencyType::NpmPeer]),
            ..ToRestriction::default()
        });
        assert!(rule.to.matches(&npm("node_modules/x", &[DependencyType::NpmDev])));
        assert!(!rule.to.matches(&npm("node_modules/x", &[DependencyType::Npm])));

        let rule = to(ToRestriction {
            dependency_types_not: Some(vec![DependencyType::Core]),
            ..ToRestriction::default()
        });
        assert!(!rule.to.matches(&npm("fs", &[DependencyType::Core])));
        assert!(rule.to.matches(&npm("node_modules/x", &[DependencyType::Npm])));
    }

    #[test]
    fn test_more_than_one_dependency_type() {
        let rule = to(ToRestriction {
            more_than_one_dependency_type: Some(true),
            ..ToRestriction::default()
        });
        let both = npm("node_modules/x", &[DependencyType::Npm, DependencyType::NpmDev]);
        let one = npm("node_modules/x", &[DependencyType::Npm]);
        assert!(rule.to.matches(&both));
        assert!(!rule.to.matches(&one));

        let rule = to(ToRestriction {
            more_than_one_dependency_type: Some(false),
            ..ToRestriction::default()
        });
        assert!(!rule.to.matches(&both));
        assert!(rule.to.matches(&one));
    }

    #[test]
    fn test_license_clauses_never_match_missing_license() {
        let gpl = to(ToRestriction {
            license: Some("GPL".into()),
            ..ToRestriction::default()
        });
        let not_mit = to(ToRestriction {
            license_not: Some("MIT".into()),
            ..ToRestriction::default()
        });

        let mut dep = npm("node_modules/x", &[DependencyType::Npm]);
        assert!(!gpl.to.matches(&dep));
        assert!(!not_mit.to.matches(&dep));

        dep.license = Some("GPL-3.0".into());
        assert!(gpl.to.matches(&dep));
        assert!(not_mit.to.matches(&dep));

        dep.license = Some("MIT".into());
        assert!(!gpl.to.matches(&dep));
        assert!(!not_mit.to.matches(&dep));
    }

    #[test]
    fn test_boolean_flags_compare_by_equality() {
        let rule = to(ToRestriction {
            circular: Some(false),
            dynamic: Some(true),
            ..ToRestriction::default()
        });
        let mut dep = Dependency::local("src/a.js");
        assert!(!rule.to.matches(&dep));
        dep.dynamic = true;
        assert!(rule.to.matches(&dep));
        dep.circular = true;
        assert!(!rule.to.matches(&dep));
    }

    #[test]
    fn test_exotic_require() {
        let rule = to(ToRestriction {
            exotic_require: Some("^want$".into()),
            ..ToRestriction::default()
        });
        let mut dep = Dependency::local("src/a.js");
        assert!(!rule.to.matches(&dep));
        dep.exotically_required = true;
        dep.exotic_require = Some("want".into());
        assert!(rule.to.matches(&dep));
    }

    #[test]
    fn test_via_clauses_need_a_cycle() {
        let rule = to(ToRestriction {
            via: Some("^src/b".into()),
            ..ToRestriction::default()
        });
        let rule_not = to(ToRestriction {
            via_not: Some("^src/b".into()),
            ..ToRestriction::default()
        });
        let mut dep = Dependency::local("src/a.js");
        assert!(!rule.to.matches(&dep));
        assert!(!rule_not.to.matches(&dep));

        dep.circular = true;
        dep.cycle = vec!["src/a.js".into(), "src/b.js".into(), "src/c.js".into()];
        assert!(rule.to.matches(&dep));
        assert!(!rule_not.to.matches(&dep));
    }

    fn module_with_reaches(bucket: &str) -> Module {
        Module {
            reaches: Some(vec![ReachesEntry {
                modules: vec![ReachedModule {
                    source: "src/hoppetee.js".into(),
                    via: Vec::new(),
                }],
                as_defined_in_rule: bucket.into(),
            }]),
            ..Module::new("src/index.js")
        }
    }

    fn reachable_rule(name: Option<&str>) -> Rule {
        Rule {
            name: name.map(String::from),
            to: ToRestriction {
                reachable: Some(true),
                ..ToRestriction::default()
            },
            ..Rule::default()
        }
    }

    #[test]
    fn test_reaches_rule_without_reachable_never_matches() {
        assert!(!matches_reaches_rule(&Rule::default(), &Module::default()));
        assert!(!matches_reaches_rule(&Rule::default(), &module_with_reaches("no-unreachable")));
    }

    #[test]
    fn test_reaches_rule_matches_by_name() {
        let named = reachable_rule(Some("no-unreachable"));
        assert!(matches_reaches_rule(&named, &module_with_reaches("no-unreachable")));
        assert!(!matches_reaches_rule(&named, &module_with_reaches("not-in-allowed")));

        let nameless = reachable_rule(None);
        assert!(matches_reaches_rule(&nameless, &module_with_reaches("not-in-allowed")));
        assert!(!matches_reaches_rule(&nameless, &module_with_reaches("no-unreachable")));
    }
}
