// src/graph/reachability.rs
//! Reachability annotation for rules carrying a `to.reachable` clause.
//!
//! For every such rule, each module matched by its `from` is the root of a
//! breadth-first walk. The edges leaving the root are always taken; past
//! the first hop only followable, non-dynamic edges are. Results land in a
//! side table indexed by module and are merged into a copy of the graph at
//! the end.

use std::collections::VecDeque;

use tracing::debug;

use super::index::GraphIndex;
use crate::rules::{CompiledRule, CompiledRuleSet};
use crate::types::{Graph, ReachableEntry, ReachedModule, ReachesEntry};

#[derive(Debug, Default, Clone)]
struct SideTable {
    reaches: Vec<Vec<ReachesEntry>>,
    reachable: Vec<Vec<ReachableEntry>>,
}

impl SideTable {
    fn new(size: usize) -> Self {
        Self {
            reaches: vec![Vec::new(); size],
            reachable: vec![Vec::new(); size],
        }
    }
}

/// Returns a copy of `graph` with `reaches` and `reachable` computed for
/// every reachability rule. Any `reaches`/`reachable` on the input is
/// discarded.
#[must_use]
pub fn annotate(graph: &Graph, rules: &CompiledRuleSet) -> Graph {
    let index = GraphIndex::build(graph);
    let mut table = SideTable::new(index.len());
    let mut participating = 0usize;

    for rule in rules.reachability_rules() {
        record_rule(graph, &index, rule, &mut table);
        participating += 1;
    }

    let mut annotated = graph.clone();
    for ((module, reaches), reachable) in annotated
        .modules
        .iter_mut()
        .zip(table.reaches)
        .zip(table.reachable)
    {
        module.reaches = (!reaches.is_empty()).then_some(reaches);
        module.reachable = (!reachable.is_empty()).then_some(reachable);
    }

    debug!(rules = participating, "reachability pass done");
    annotated
}

#[allow(clippy::indexing_slicing)] // Indices come from the same GraphIndex
fn record_rule(graph: &Graph, index: &GraphIndex<'_>, rule: &CompiledRule, table: &mut SideTable) {
    let bucket = rule.bucket();
    let candidate: Vec<bool> = graph
        .modules
        .iter()
        .map(|m| rule.to.matches_module(m))
        .collect();
    let roots: Vec<usize> = graph
        .modules
        .iter()
        .enumerate()
        .filter(|(_, m)| rule.from.matches(m))
        .map(|(id, _)| id)
        .collect();

    // First root that reaches each module.
    let mut matched_from: Vec<Option<usize>> = vec![None; index.len()];

    for &root in &roots {
        let mut modules = Vec::new();
        for (target, via) in walk(index, root) {
            if !candidate[target] {
                continue;
            }
            matched_from[target].get_or_insert(root);
            modules.push(ReachedModule {
                source: index.source(target).to_string(),
                via: via.into_iter().map(|id| index.source(id).to_string()).collect(),
            });
        }
        if !modules.is_empty() {
            table.reaches[root].push(ReachesEntry {
                modules,
                as_defined_in_rule: bucket.to_string(),
            });
        }
    }

    for &root in &roots {
        matched_from[root] = Some(root);
    }
    for (id, is_candidate) in candidate.iter().enumerate() {
        if !is_candidate {
            continue;
        }
        let from = matched_from[id];
        table.reachable[id].push(ReachableEntry {
            value: from.is_some(),
            as_defined_in_rule: bucket.to_string(),
            matched_from: from.map(|root| index.source(root).to_string()),
        });
    }
}

/// Every module reachable from `root` (excluding `root`), in discovery
/// order, with the hops taken to get there.
#[allow(clippy::indexing_slicing)] // Indices come from the same GraphIndex
fn walk(index: &GraphIndex<'_>, root: usize) -> Vec<(usize, Vec<usize>)> {
    let mut parent: Vec<Option<usize>> = vec![None; index.len()];
    let mut seen = vec![false; index.len()];
    let mut queue = VecDeque::from([root]);
    let mut found = Vec::new();
    seen[root] = true;

    while let Some(node) = queue.pop_front() {
        for edge in index.edges(node) {
            if node != root && !edge.followable {
                continue;
            }
            let next = edge.target;
            if seen[next] {
                continue;
            }
            seen[next] = true;
            parent[next] = Some(node);
            found.push(next);
            queue.push_back(next);
        }
    }

    found
        .into_iter()
        .map(|target| (target, hops(&parent, root, target)))
        .collect()
}

#[allow(clippy::indexing_slicing)] // Indices come from the same GraphIndex
fn hops(parent: &[Option<usize>], root: usize, target: usize) -> Vec<usize> {
    let mut path = vec![target];
    let mut node = target;
    while let Some(previous) = parent[node] {
        if previous == root {
            break;
        }
        path.push(previous);
        node = previous;
    }
    path.reverse();
    path
}
