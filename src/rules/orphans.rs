// src/rules/orphans.rs
//! Orphan exemptions.
//!
//! Some files are orphans by nature: dotfiles, type declarations and tool
//! configuration nobody imports. They are judged on their basename only, so
//! directory depth never matters.

use regex::Regex;

use crate::error::{DepfenceError, Result};
use crate::types::{Module, Rule};

/// One exemption, tested against a module's basename.
#[derive(Debug, Clone)]
pub enum OrphanException {
    Prefix(String),
    Suffix(String),
    Pattern(Regex),
}

impl OrphanException {
    /// Builds a `Pattern` exception from a basename regex.
    ///
    /// # Errors
    /// Returns [`DepfenceError::InvalidPattern`] if the regex does not compile.
    pub fn pattern(source: &str) -> Result<Self> {
        Regex::new(source)
            .map(Self::Pattern)
            .map_err(|source| DepfenceError::InvalidPattern {
                rule: "orphans.extra_exceptions".to_string(),
                field: "pattern",
                source,
            })
    }

    #[must_use]
    pub fn excepts(&self, basename: &str) -> bool {
        match self {
            Self::Prefix(prefix) => basename.starts_with(prefix.as_str()),
            Self::Suffix(suffix) => basename.ends_with(suffix.as_str()),
            Self::Pattern(re) => re.is_match(basename),
        }
    }
}

/// Well-known tool configuration basenames.
const CONFIG_FILES: &[&str] = &[
    r"^babel\.config\.[^.]+$",
    r"^webpack\.config\.[^.]+$",
    r"^tsconfig\.json$",
];

#[derive(Debug, Clone)]
pub struct OrphanPolicy {
    exceptions: Vec<OrphanException>,
}

impl Default for OrphanPolicy {
    fn default() -> Self {
        let mut exceptions = vec![
            OrphanException::Prefix(".".to_string()),
            OrphanException::Suffix(".d.ts".to_string()),
        ];
        exceptions.extend(
            CONFIG_FILES
                .iter()
                .filter_map(|source| Regex::new(source).ok())
                .map(OrphanException::Pattern),
        );
        Self { exceptions }
    }
}

impl OrphanPolicy {
    /// The default policy plus extra basename patterns.
    ///
    /// # Errors
    /// Returns an error if one of the patterns does not compile.
    pub fn with_extra_patterns(patterns: &[String]) -> Result<Self> {
        let mut policy = Self::default();
        for pattern in patterns {
            policy.exceptions.push(OrphanException::pattern(pattern)?);
        }
        Ok(policy)
    }

    #[must_use]
    pub fn is_excepted(&self, source: &str) -> bool {
        let name = basename(source);
        self.exceptions.iter().any(|e| e.excepts(name))
    }

    /// True when an orphan rule flags this module.
    #[must_use]
    pub fn is_orphan_violation(&self, rule: &Rule, module: &Module) -> bool {
        if rule.orphan_requirement() != Some(true) || !module.orphan {
            return false;
        }
        !self.is_excepted(&module.source)
    }
}

fn basename(source: &str) -> &str {
    source.rsplit(['/', '\\']).next().unwrap_or(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename() {
        assert_eq!(basename("a/b/c.js"), "c.js");
        assert_eq!(basename("c.js"), "c.js");
        assert_eq!(basename("a\\b\\.c.js"), ".c.js");
    }

    #[test]
    fn test_config_files_need_an_extension() {
        let policy = OrphanPolicy::default();
        assert!(policy.is_excepted("babel.config.js"));
        assert!(policy.is_excepted("tools/webpack.config.ts"));
        assert!(policy.is_excepted("tsconfig.json"));
        assert!(!policy.is_excepted("babel.config"));
        assert!(!policy.is_excepted("my-babel.config.js"));
    }

    #[test]
    fn test_extra_patterns() {
        let policy = OrphanPolicy::with_extra_patterns(&[r"^jest\.config\.".into()]).unwrap();
        assert!(policy.is_excepted("packages/x/jest.config.cjs"));
        assert!(OrphanPolicy::with_extra_patterns(&["(".into()]).is_err());
    }
}
