// src/config/types.rs
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::rules::OrphanPolicy;
use crate::types::{Severity, Summary};

/// Contents of `depfence.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepfenceToml {
    pub engine: EngineConfig,
    pub orphans: OrphanConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Evaluate modules on the rayon pool. Default: true
    pub parallel: bool,
    /// Lowest severity that fails the run. Default: error
    pub fail_on: FailOn,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            fail_on: FailOn::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailOn {
    #[default]
    Error,
    Warn,
    Info,
    Never,
}

impl FailOn {
    #[must_use]
    pub fn threshold(self) -> Option<Severity> {
        match self {
            Self::Error => Some(Severity::Error),
            Self::Warn => Some(Severity::Warn),
            Self::Info => Some(Severity::Info),
            Self::Never => None,
        }
    }

    /// True when the summary holds a violation at or above the threshold.
    #[must_use]
    pub fn fails(self, summary: &Summary) -> bool {
        self.threshold()
            .is_some_and(|severity| summary.count_at_least(severity) > 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrphanConfig {
    /// Basename regexes added to the built-in orphan exceptions.
    pub extra_exceptions: Vec<String>,
}

impl OrphanConfig {
    /// Converts to the engine's orphan policy.
    ///
    /// # Errors
    /// Returns an error if an extra exception is not a valid regex.
    pub fn to_policy(&self) -> Result<OrphanPolicy> {
        OrphanPolicy::with_extra_patterns(&self.extra_exceptions)
    }
}
