// src/graph/mod.rs
//! Graph analyzers and graph-document loading.
//!
//! Both analyzers are pure: they take the graph by reference and return an
//! annotated copy.

pub mod cycles;
pub mod index;
pub mod reachability;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::{DepfenceError, Result};
use crate::types::Graph;

pub use index::GraphIndex;

/// Reads a graph document (JSON).
///
/// # Errors
/// Returns an error if the file cannot be read or is not a graph document.
pub fn load_graph(path: &Path) -> Result<Graph> {
    let content = fs::read_to_string(path).map_err(|source| DepfenceError::Io {
        source,
        path: path.to_path_buf(),
    })?;
    serde_json::from_str(&content).map_err(|e| DepfenceError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Checks the structural invariants the analyzers rely on.
///
/// # Errors
/// Returns [`DepfenceError::InvalidGraph`] on a duplicate module source or
/// on a dependency whose `resolved` disagrees with `couldNotResolve`.
pub fn check_graph(graph: &Graph) -> Result<()> {
    let mut seen = HashSet::with_capacity(graph.modules.len());
    for module in &graph.modules {
        if !seen.insert(module.source.as_str()) {
            return Err(DepfenceError::InvalidGraph(format!(
                "duplicate module source '{}'",
                module.source
            )));
        }
        for dependency in &module.dependencies {
            if dependency.resolved.is_empty() != dependency.could_not_resolve {
                return Err(DepfenceError::InvalidGraph(format!(
                    "'{}' -> '{}': resolved must be present exactly when couldNotResolve is false",
                    module.source, dependency.module
                )));
            }
            if dependency.dependency_types.is_empty() {
                warn!(
                    from = %module.source,
                    to = %dependency.module,
                    "dependency without dependency types"
                );
            }
        }
    }
    Ok(())
}
