// src/graph/index.rs
//! Integer adjacency over the modules of a graph.
//!
//! Only edges that land on a module of the graph are kept: unresolvable
//! specifiers and paths outside the module set are not part of any cycle and
//! cannot be traversed.

use std::collections::HashMap;

use crate::types::Graph;

/// One traversable edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Position of the dependency in its module's `dependencies`.
    pub dependency: usize,
    /// Index of the target module.
    pub target: usize,
    /// False for dynamic imports and `doNotFollow` edges.
    pub followable: bool,
}

#[derive(Debug, Default)]
pub struct GraphIndex<'a> {
    ids: HashMap<&'a str, usize>,
    sources: Vec<&'a str>,
    edges: Vec<Vec<Edge>>,
}

impl<'a> GraphIndex<'a> {
    /// Indexes modules in input order, edges in declaration order.
    #[must_use]
    pub fn build(graph: &'a Graph) -> Self {
        let sources: Vec<&str> = graph.modules.iter().map(|m| m.source.as_str()).collect();
        let ids: HashMap<&str, usize> = sources.iter().enumerate().map(|(i, s)| (*s, i)).collect();

        let edges = graph
            .modules
            .iter()
            .map(|module| {
                module
                    .dependencies
                    .iter()
                    .enumerate()
                    .filter(|(_, dep)| !dep.could_not_resolve)
                    .filter_map(|(position, dep)| {
                        ids.get(dep.resolved.as_str()).map(|&target| Edge {
                            dependency: position,
                            target,
                            followable: dep.followable && !dep.dynamic,
                        })
                    })
                    .collect()
            })
            .collect();

        Self { ids, sources, edges }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    #[must_use]
    pub fn id(&self, source: &str) -> Option<usize> {
        self.ids.get(source).copied()
    }

    /// Source path of a module index. Panics on an index not from this graph.
    #[must_use]
    #[allow(clippy::indexing_slicing)]
    pub fn source(&self, id: usize) -> &'a str {
        self.sources[id]
    }

    #[must_use]
    pub fn edges(&self, id: usize) -> &[Edge] {
        self.edges.get(id).map(Vec::as_slice).unwrap_or_default()
    }
}
