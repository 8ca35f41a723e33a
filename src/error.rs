// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Failures the engine and its loaders can report.
///
/// Everything here is fatal and surfaces before any module is evaluated;
/// matching itself never fails.
#[derive(Debug, Error)]
pub enum DepfenceError {
    #[error("rule '{rule}': invalid regular expression in '{field}': {source}")]
    InvalidPattern {
        rule: String,
        field: &'static str,
        source: regex::Error,
    },

    #[error("rule '{rule}': {reason}")]
    InvalidRule { rule: String, reason: String },

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("could not parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

impl DepfenceError {
    /// Configuration and input problems, as opposed to environment failures.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }
}

pub type Result<T> = std::result::Result<T, DepfenceError>;
