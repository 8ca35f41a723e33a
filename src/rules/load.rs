// src/rules/load.rs
//! Reads rule-set documents from disk (JSON, or TOML by extension).

use std::fs;
use std::path::Path;

use crate::error::{DepfenceError, Result};
use crate::types::RuleSet;

/// Loads a rule set. Files ending in `.toml` are parsed as TOML, anything
/// else as JSON.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_rule_set(path: &Path) -> Result<RuleSet> {
    let content = fs::read_to_string(path).map_err(|source| DepfenceError::Io {
        source,
        path: path.to_path_buf(),
    })?;
    parse_rule_set(&content, is_toml(path)).map_err(|reason| DepfenceError::Parse {
        path: path.to_path_buf(),
        reason,
    })
}

/// Parses rule-set text.
///
/// # Errors
/// Returns the parser's message on malformed input or unknown enum values
/// (severities, dependency types).
pub fn parse_rule_set(content: &str, toml: bool) -> std::result::Result<RuleSet, String> {
    if toml {
        toml::from_str(content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}
