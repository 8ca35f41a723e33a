// src/cli/args.rs
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "depfence",
    version,
    about = "Validates a module dependency graph against architectural rules"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    /// Configuration file (default: ./depfence.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Log phase timings and counts to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a rule set against a graph document
    Validate {
        /// Graph document (JSON)
        #[arg(value_name = "GRAPH")]
        graph: PathBuf,
        /// Rule set (JSON, or TOML by extension). Defaults to the recommended rules
        #[arg(long, short, value_name = "FILE")]
        rules: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Evaluate modules on the current thread only
        #[arg(long)]
        sequential: bool,
        /// Also write the annotated graph to this file
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Validate a rule set without evaluating anything
    CheckRules {
        #[arg(value_name = "FILE")]
        rules: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal report
    Text,
    /// The annotated graph document
    Json,
}

/// Arguments for the validate command (used by handlers)
#[derive(Debug, Clone)]
pub struct ValidateArgs {
    pub graph: PathBuf,
    pub rules: Option<PathBuf>,
    pub format: OutputFormat,
    pub sequential: bool,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}
