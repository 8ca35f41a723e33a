// tests/property_engine.rs
use std::collections::BTreeSet;

use depfence_core::graph::cycles;
use depfence_core::rules::presets::{no_circular, no_orphans};
use depfence_core::rules::{CompiledRule, OrphanPolicy, RuleKind};
use depfence_core::types::{Dependency, Graph, Module, Rule, RuleSet};
use depfence_core::RuleEngine;
use proptest::prelude::*;

fn name(i: usize) -> String {
    format!("src/m{i}.js")
}

fn build(adjacency: &[Vec<usize>]) -> Graph {
    let has_dependents: BTreeSet<usize> = adjacency.iter().flatten().copied().collect();
    Graph::new(
        adjacency
            .iter()
            .enumerate()
            .map(|(i, targets)| Module {
                orphan: targets.is_empty() && !has_dependents.contains(&i),
                ..Module::new(name(i)).with_dependencies(targets.iter().map(|t| Dependency::local(name(*t))).collect())
            })
            .collect(),
    )
}

fn arb_adjacency() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..10).prop_flat_map(|n| prop::collection::vec(prop::collection::vec(0..n, 0..4), n))
}

fn circular_edges(graph: &Graph) -> BTreeSet<(String, String)> {
    graph
        .modules
        .iter()
        .flat_map(|m| {
            m.dependencies
                .iter()
                .filter(|d| d.circular)
                .map(|d| (m.source.clone(), d.resolved.clone()))
        })
        .collect()
}

proptest! {
    #[test]
    fn empty_restriction_matches_everything(adjacency in arb_adjacency()) {
        let rule = CompiledRule::compile(&Rule::default(), RuleKind::Forbidden, "any").unwrap();
        let graph = build(&adjacency);
        for module in &graph.modules {
            prop_assert!(rule.from.matches(module));
            for dependency in &module.dependencies {
                prop_assert!(rule.to.matches(dependency));
            }
        }
    }

    #[test]
    fn non_orphans_never_violate(source in "[a-z./]{1,20}") {
        let module = Module::new(source);
        prop_assert!(!OrphanPolicy::default().is_orphan_violation(&no_orphans(), &module));
    }

    #[test]
    fn cycles_are_well_formed(adjacency in arb_adjacency()) {
        let annotated = cycles::annotate(&build(&adjacency));
        for module in &annotated.modules {
            for dependency in &module.dependencies {
                prop_assert_eq!(dependency.circular, !dependency.cycle.is_empty());
                if dependency.circular {
                    let unique: BTreeSet<&String> = dependency.cycle.iter().collect();
                    prop_assert_eq!(unique.len(), dependency.cycle.len());
                    prop_assert_eq!(dependency.cycle.first(), Some(&dependency.resolved));
                    prop_assert_eq!(dependency.cycle.last(), Some(&module.source));
                }
            }
        }
    }

    #[test]
    fn circularity_ignores_module_order(adjacency in arb_adjacency()) {
        let graph = build(&adjacency);
        let mut reversed = graph.clone();
        reversed.modules.reverse();

        prop_assert_eq!(
            circular_edges(&cycles::annotate(&graph)),
            circular_edges(&cycles::annotate(&reversed))
        );
    }

    #[test]
    fn evaluation_is_deterministic(adjacency in arb_adjacency()) {
        let rules = RuleSet {
            forbidden: vec![no_circular(), no_orphans()],
            ..RuleSet::default()
        };
        let engine = RuleEngine::new(&rules).unwrap();
        let graph = build(&adjacency);

        let parallel = engine.clone().with_parallel(true).evaluate(&graph).unwrap();
        let sequential = engine.with_parallel(false).evaluate(&graph).unwrap();
        prop_assert_eq!(&parallel, &sequential);

        let orphans = graph.modules.iter().filter(|m| m.orphan).count();
        let circular = parallel.0.modules.iter().flat_map(|m| &m.dependencies).filter(|d| d.circular).count();
        prop_assert_eq!(parallel.1.violations.len(), orphans + circular);
    }
}
