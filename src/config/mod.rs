// src/config/mod.rs
//! Tool configuration, read from `depfence.toml`.

pub mod types;

pub use self::types::{DepfenceToml, EngineConfig, FailOn, OrphanConfig};

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{DepfenceError, Result};
use crate::validate::RuleEngine;

pub const CONFIG_FILE: &str = "depfence.toml";

impl DepfenceToml {
    /// Loads `path`, or `depfence.toml` in the working directory when `path`
    /// is `None`. A missing default file yields the defaults.
    ///
    /// # Errors
    /// Returns an error if an explicitly named file is missing, or if the
    /// file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path, true),
            None => (Path::new(CONFIG_FILE), false),
        };
        if !explicit && !path.exists() {
            debug!("no {CONFIG_FILE}, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| DepfenceError::Io {
            source,
            path: path.to_path_buf(),
        })?;
        Self::parse(&content).map_err(|reason| DepfenceError::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// # Errors
    /// Returns the TOML parser's message on malformed input.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Applies the engine and orphan settings to a freshly built engine.
    ///
    /// # Errors
    /// Returns an error if an orphan exception pattern is invalid.
    pub fn configure(&self, engine: RuleEngine) -> Result<RuleEngine> {
        Ok(engine
            .with_parallel(self.engine.parallel)
            .with_orphan_policy(self.orphans.to_policy()?))
    }
}
