// src/validate/engine.rs
//! The rule engine: annotates a graph and reports every rule it breaks.
//!
//! Evaluation runs in three phases:
//! 1. compile the rule set (fatal on configuration errors),
//! 2. annotate a copy of the graph with cycles, then reachability,
//! 3. judge every module and every dependency edge, optionally in parallel.

use std::collections::BTreeSet;

use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, info};

use crate::error::Result;
use crate::graph::{self, cycles, reachability};
use crate::rules::{
    matches_dependency_rule, matches_reachable_rule, matches_reaches_rule, CompiledRule,
    CompiledRuleSet, OrphanPolicy,
};
use crate::types::{
    Dependency, Graph, Module, RuleSet, RuleSummary, Summary, Violation, ViolationRule,
    NOT_IN_ALLOWED,
};

use super::collector::ViolationCollector;

/// Compiled rules plus the knobs that shape evaluation.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: CompiledRuleSet,
    orphans: OrphanPolicy,
    parallel: bool,
}

/// What one module contributed: the rules it breaks itself, the rules each
/// of its dependencies break, and the violations behind them.
#[derive(Debug, Default)]
struct ModuleOutcome {
    module_rules: Vec<ViolationRule>,
    dependency_rules: Vec<Vec<ViolationRule>>,
    violations: Vec<Violation>,
}

impl ModuleOutcome {
    fn new(dependencies: usize) -> Self {
        Self {
            dependency_rules: vec![Vec::new(); dependencies],
            ..Self::default()
        }
    }

    fn flag_module(&mut self, rule: ViolationRule, violation: Violation) {
        self.module_rules.push(rule);
        self.violations.push(violation);
    }

    fn flag_dependency(&mut self, position: usize, rule: ViolationRule, violation: Violation) {
        if let Some(rules) = self.dependency_rules.get_mut(position) {
            rules.push(rule);
        }
        self.violations.push(violation);
    }
}

impl RuleEngine {
    /// Validates and compiles `rule_set`.
    ///
    /// # Errors
    /// Returns the first configuration error in the rule set.
    pub fn new(rule_set: &RuleSet) -> Result<Self> {
        let rules = CompiledRuleSet::compile(rule_set)?;
        info!(
            forbidden = rules.forbidden.len(),
            allowed = rules.allowed.len(),
            "rule set compiled"
        );
        Ok(Self {
            rules,
            orphans: OrphanPolicy::default(),
            parallel: true,
        })
    }

    #[must_use]
    pub fn with_orphan_policy(mut self, orphans: OrphanPolicy) -> Self {
        self.orphans = orphans;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub fn rules(&self) -> &CompiledRuleSet {
        &self.rules
    }

    #[must_use]
    pub fn orphan_policy(&self) -> &OrphanPolicy {
        &self.orphans
    }

    /// Annotates a copy of `graph` and evaluates every rule against it.
    ///
    /// The returned graph carries `circular`/`cycle`, `reaches`/`reachable`,
    /// `valid`/`rules` and the populated `summary`; the returned summary is
    /// the same as `graph.summary`.
    ///
    /// # Errors
    /// Returns [`crate::error::DepfenceError::InvalidGraph`] when the graph
    /// breaks its structural invariants.
    pub fn evaluate(&self, graph: &Graph) -> Result<(Graph, Summary)> {
        graph::check_graph(graph)?;

        let annotated = cycles::annotate(graph);
        let mut annotated = reachability::annotate(&annotated, &self.rules);
        debug!(modules = annotated.modules.len(), "graph annotated");

        let outcomes: Vec<ModuleOutcome> = if self.parallel {
            annotated
                .modules
                .par_iter()
                .map(|module| self.evaluate_module(module))
                .collect()
        } else {
            annotated
                .modules
                .iter()
                .map(|module| self.evaluate_module(module))
                .collect()
        };

        let mut collector = ViolationCollector::new();
        for (module, outcome) in annotated.modules.iter_mut().zip(outcomes) {
            apply_outcome(module, outcome.module_rules, outcome.dependency_rules);
            collector.extend(outcome.violations);
        }

        let summary = collector.finish(
            annotated.modules.len(),
            annotated.dependency_count(),
            graph.summary.extra.clone(),
        );
        info!(
            violations = summary.violations.len(),
            error = summary.error,
            warn = summary.warn,
            info = summary.info,
            "evaluation done"
        );

        annotated.summary = summary.clone();
        Ok((annotated, summary))
    }

    fn evaluate_module(&self, module: &Module) -> ModuleOutcome {
        let mut outcome = ModuleOutcome::new(module.dependencies.len());

        for rule in self.rules.forbidden.iter().filter(|r| r.is_module_rule()) {
            self.forbidden_module_rule(rule, module, &mut outcome);
        }
        self.allowed_reachability(module, &mut outcome);

        for (position, dependency) in module.dependencies.iter().enumerate() {
            for rule in self.rules.forbidden.iter().filter(|r| !r.is_module_rule()) {
                if matches_dependency_rule(rule, module, dependency) {
                    outcome.flag_dependency(
                        position,
                        violation_rule(rule),
                        edge_violation(rule, module, dependency),
                    );
                }
            }
            if let Some(rule) = self.allowed_miss(module, dependency) {
                outcome.flag_dependency(position, rule.clone(), edge_violation_named(rule, module, dependency));
            }
        }

        outcome
    }

    fn forbidden_module_rule(&self, rule: &CompiledRule, module: &Module, outcome: &mut ModuleOutcome) {
        if rule.rule.orphan_requirement().is_some() {
            if rule.from.matches(module) && self.orphans.is_orphan_violation(&rule.rule, module) {
                outcome.flag_module(violation_rule(rule), self_violation(rule, module));
            }
            return;
        }

        match rule.to.reachable {
            Some(true) if rule.from.matches(module) && matches_reaches_rule(&rule.rule, module) => {
                let bucket = rule.bucket();
                let reached = module
                    .reaches
                    .iter()
                    .flatten()
                    .filter(|entry| entry.as_defined_in_rule == bucket)
                    .flat_map(|entry| &entry.modules)
                    // Nameless rules share one bucket; keep this rule's targets.
                    .filter(|target| rule.to.matches_source(&target.source));
                let mut seen = BTreeSet::new();
                for target in reached {
                    if !seen.insert(target.source.as_str()) {
                        continue;
                    }
                    outcome.flag_module(
                        violation_rule(rule),
                        Violation {
                            rule: violation_rule(rule),
                            from: module.source.clone(),
                            to: target.source.clone(),
                            cycle: Vec::new(),
                            via: Some(target.via.clone()),
                        },
                    );
                }
            }
            Some(false) if matches_reachable_rule(&rule.rule, module, false) => {
                outcome.flag_module(violation_rule(rule), self_violation(rule, module));
            }
            _ => {}
        }
    }

    /// A to-candidate of allowed reachability rules is out of bounds when no
    /// such rule sees it with the reachability it requires.
    fn allowed_reachability(&self, module: &Module, outcome: &mut ModuleOutcome) {
        let mut applicable = self.rules.allowed.iter().filter(|rule| {
            rule.is_reachability_rule()
                && module
                    .reachable
                    .iter()
                    .flatten()
                    .any(|entry| entry.as_defined_in_rule == rule.bucket())
        });

        let Some(first) = applicable.next() else {
            return;
        };
        let satisfied = std::iter::once(first).chain(applicable).any(|rule| {
            rule.to
                .reachable
                .is_some_and(|wanted| matches_reachable_rule(&rule.rule, module, wanted))
        });
        if !satisfied {
            let rule = self.not_in_allowed();
            outcome.flag_module(
                rule.clone(),
                Violation {
                    rule,
                    from: module.source.clone(),
                    to: module.source.clone(),
                    cycle: Vec::new(),
                    via: None,
                },
            );
        }
    }

    /// The `not-in-allowed` rule when the edge escapes every allowed rule
    /// whose `from` covers its module.
    fn allowed_miss(&self, module: &Module, dependency: &Dependency) -> Option<ViolationRule> {
        let mut scoped = self
            .rules
            .allowed
            .iter()
            .filter(|rule| !rule.is_module_rule() && rule.from.matches(module))
            .peekable();
        scoped.peek()?;
        if scoped.any(|rule| rule.to.matches(dependency)) {
            return None;
        }
        Some(self.not_in_allowed())
    }

    fn not_in_allowed(&self) -> ViolationRule {
        ViolationRule {
            name: NOT_IN_ALLOWED.to_string(),
            severity: self.rules.allowed_severity,
            comment: None,
        }
    }
}

/// Compiles `rule_set` and evaluates `graph` with default settings.
///
/// # Errors
/// Returns a configuration or graph error; see [`RuleEngine::evaluate`].
pub fn evaluate(graph: &Graph, rule_set: &RuleSet) -> Result<(Graph, Summary)> {
    RuleEngine::new(rule_set)?.evaluate(graph)
}

fn violation_rule(rule: &CompiledRule) -> ViolationRule {
    ViolationRule {
        name: rule.name.clone(),
        severity: rule.severity,
        comment: rule.comment.clone(),
    }
}

fn self_violation(rule: &CompiledRule, module: &Module) -> Violation {
    Violation {
        rule: violation_rule(rule),
        from: module.source.clone(),
        to: module.source.clone(),
        cycle: Vec::new(),
        via: None,
    }
}

fn edge_violation(rule: &CompiledRule, module: &Module, dependency: &Dependency) -> Violation {
    edge_violation_named(violation_rule(rule), module, dependency)
}

fn edge_violation_named(rule: ViolationRule, module: &Module, dependency: &Dependency) -> Violation {
    Violation {
        rule,
        from: module.source.clone(),
        to: dependency.target().to_string(),
        cycle: if dependency.circular {
            dependency.cycle.clone()
        } else {
            Vec::new()
        },
        via: None,
    }
}

fn summaries(mut rules: Vec<ViolationRule>) -> Vec<RuleSummary> {
    rules.sort();
    rules.dedup();
    rules.iter().map(RuleSummary::from).collect()
}

fn apply_outcome(module: &mut Module, module_rules: Vec<ViolationRule>, dependency_rules: Vec<Vec<ViolationRule>>) {
    module.valid = Some(module_rules.is_empty());
    module.rules = summaries(module_rules);
    for (dependency, rules) in module.dependencies.iter_mut().zip(dependency_rules) {
        dependency.valid = Some(rules.is_empty());
        dependency.rules = summaries(rules);
    }
}
