// src/cli/handlers.rs
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::DepfenceToml;
use crate::exit::DepfenceExit;
use crate::graph::load_graph;
use crate::rules::{load_rule_set, presets};
use crate::types::{Graph, RuleSet};
use crate::validate::{print_report, RuleEngine};

fn rule_set(path: Option<&Path>) -> Result<RuleSet> {
    match path {
        Some(path) => {
            load_rule_set(path).with_context(|| format!("loading rules from {}", path.display()))
        }
        None => {
            info!("no rule set given, using the recommended rules");
            Ok(presets::recommended())
        }
    }
}

fn write_graph(graph: &Graph, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(graph)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

/// Handles the validate command.
///
/// # Errors
/// Returns error if the configuration, rules or graph cannot be loaded, or
/// if the rule set is invalid.
pub fn handle_validate(args: &ValidateArgs) -> Result<DepfenceExit> {
    let config = DepfenceToml::load(args.config.as_deref()).context("loading configuration")?;
    let rules = rule_set(args.rules.as_deref())?;

    let mut engine = config.configure(RuleEngine::new(&rules)?)?;
    if args.sequential {
        engine = engine.with_parallel(false);
    }

    let graph = load_graph(&args.graph)
        .with_context(|| format!("loading graph from {}", args.graph.display()))?;
    let (annotated, summary) = engine.evaluate(&graph)?;

    match args.format {
        OutputFormat::Text => print_report(&annotated, &summary),
        OutputFormat::Json => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &annotated)?;
            writeln!(stdout)?;
        }
    }
    if let Some(output) = &args.output {
        write_graph(&annotated, output)?;
    }

    if config.engine.fail_on.fails(&summary) {
        Ok(DepfenceExit::CheckFailed)
    } else {
        Ok(DepfenceExit::Success)
    }
}

/// Handles the check-rules command.
///
/// # Errors
/// Returns error if the rule set cannot be loaded or is invalid.
pub fn handle_check_rules(path: &Path) -> Result<DepfenceExit> {
    let rules = rule_set(Some(path))?;
    let engine = RuleEngine::new(&rules)?;
    let compiled = engine.rules();

    println!(
        "{} {} forbidden, {} allowed",
        "✓ Rule set is valid:".green(),
        compiled.forbidden.len(),
        compiled.allowed.len()
    );
    Ok(DepfenceExit::Success)
}
