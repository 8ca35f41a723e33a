// src/graph/cycles.rs
//! Cycle detection.
//!
//! Strongly connected components come from a depth-first search (Tarjan)
//! that keeps the active path on a stack. An edge `u -> v` is circular when
//! `u` and `v` share a component (or `u == v`); its `cycle` is the shortest
//! way from `v` back to `u`, target first.
//!
//! Modules are visited in input order and dependencies in declaration
//! order, so two runs over the same graph report the same cycles.

use std::collections::{BTreeSet, VecDeque};

use tracing::debug;

use super::index::GraphIndex;
use crate::types::Graph;

/// Returns a copy of `graph` with `circular` and `cycle` set on every
/// dependency.
///
/// Each circular edge gets its own breadth-first search inside its
/// component and its own `cycle` list, so a ring of `n` modules costs
/// `O(n²)` in both time and output size.
#[must_use]
#[allow(clippy::indexing_slicing)] // Indices come from the same GraphIndex
pub fn annotate(graph: &Graph) -> Graph {
    let index = GraphIndex::build(graph);
    let components = strongly_connected(&index);
    let mut annotated = graph.clone();
    let mut circular_edges = 0usize;

    for (id, module) in annotated.modules.iter_mut().enumerate() {
        for dependency in &mut module.dependencies {
            dependency.circular = false;
            dependency.cycle.clear();
        }
        for edge in index.edges(id) {
            if edge.target != id && components[edge.target] != components[id] {
                continue;
            }
            let Some(dependency) = module.dependencies.get_mut(edge.dependency) else {
                continue;
            };
            dependency.circular = true;
            dependency.cycle = path_back(&index, &components, edge.target, id)
                .into_iter()
                .map(|node| index.source(node).to_string())
                .collect();
            circular_edges += 1;
        }
    }

    debug!(modules = index.len(), circular_edges, "cycle pass done");
    annotated
}

/// Distinct cycles of an annotated graph, each rotated to start at its
/// smallest module, in sorted order.
#[must_use]
pub fn cycles(graph: &Graph) -> Vec<Vec<String>> {
    let mut distinct = BTreeSet::new();
    for dependency in graph.modules.iter().flat_map(|m| &m.dependencies) {
        if dependency.circular && !dependency.cycle.is_empty() {
            distinct.insert(canonical(&dependency.cycle));
        }
    }
    distinct.into_iter().collect()
}

#[allow(clippy::indexing_slicing)] // start < cycle.len()
fn canonical(cycle: &[String]) -> Vec<String> {
    let start = cycle
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.cmp(b.1))
        .map_or(0, |(i, _)| i);
    cycle[start..].iter().chain(&cycle[..start]).cloned().collect()
}

/// Shortest path `from -> … -> to` inside one component, breadth first.
#[allow(clippy::indexing_slicing)] // Indices come from the same GraphIndex
fn path_back(index: &GraphIndex<'_>, components: &[usize], from: usize, to: usize) -> Vec<usize> {
    if from == to {
        return vec![from];
    }

    let component = components[from];
    let mut parent: Vec<Option<usize>> = vec![None; index.len()];
    let mut seen = vec![false; index.len()];
    let mut queue = VecDeque::from([from]);
    seen[from] = true;

    while let Some(node) = queue.pop_front() {
        for edge in index.edges(node) {
            let next = edge.target;
            if seen[next] || components[next] != component {
                continue;
            }
            seen[next] = true;
            parent[next] = Some(node);
            if next == to {
                return unwind(&parent, from, to);
            }
            queue.push_back(next);
        }
    }

    // Unreachable for members of one component.
    vec![from, to]
}

#[allow(clippy::indexing_slicing)] // Indices come from the same GraphIndex
fn unwind(parent: &[Option<usize>], from: usize, to: usize) -> Vec<usize> {
    let mut path = vec![to];
    let mut node = to;
    while node != from {
        match parent[node] {
            Some(previous) => {
                path.push(previous);
                node = previous;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Component id per module.
fn strongly_connected(index: &GraphIndex<'_>) -> Vec<usize> {
    let mut state = DfsState::new(index.len());
    for root in 0..index.len() {
        if state.order[root].is_none() {
            state.visit(root, index);
        }
    }
    state.component
}

struct DfsState {
    order: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    path_stack: Vec<usize>,
    component: Vec<usize>,
    next_order: usize,
    components: usize,
}

#[allow(clippy::indexing_slicing)] // Indices come from the same GraphIndex
impl DfsState {
    fn new(size: usize) -> Self {
        Self {
            order: vec![None; size],
            lowlink: vec![0; size],
            on_stack: vec![false; size],
            path_stack: Vec::new(),
            component: vec![usize::MAX; size],
            next_order: 0,
            components: 0,
        }
    }

    fn open(&mut self, node: usize) {
        self.order[node] = Some(self.next_order);
        self.lowlink[node] = self.next_order;
        self.next_order += 1;
        self.path_stack.push(node);
        self.on_stack[node] = true;
    }

    /// Iterative so deep import chains cannot overflow the call stack.
    fn visit(&mut self, root: usize, index: &GraphIndex<'_>) {
        self.open(root);
        let mut frames: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = frames.last_mut() {
            let (node, position) = *frame;
            if let Some(edge) = index.edges(node).get(position) {
                frame.1 += 1;
                let target = edge.target;
                match self.order[target] {
                    None => {
                        self.open(target);
                        frames.push((target, 0));
                    }
                    Some(order) if self.on_stack[target] => {
                        self.lowlink[node] = self.lowlink[node].min(order);
                    }
                    Some(_) => {}
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                self.lowlink[parent] = self.lowlink[parent].min(self.lowlink[node]);
            }
            if Some(self.lowlink[node]) == self.order[node] {
                self.close(node);
            }
        }
    }

    fn close(&mut self, root: usize) {
        while let Some(node) = self.path_stack.pop() {
            self.on_stack[node] = false;
            self.component[node] = self.components;
            if node == root {
                break;
            }
        }
        self.components += 1;
    }
}
