//! Command dispatch, kept out of the binary.

use super::args::{Cli, Commands, ValidateArgs};
use super::handlers::{handle_check_rules, handle_validate};
use crate::exit::DepfenceExit;
use anyhow::Result;

/// Executes the parsed command.
///
/// # Errors
/// Returns error if the command handler fails.
pub fn execute(cli: Cli) -> Result<DepfenceExit> {
    let Some(command) = cli.command else {
        use clap::CommandFactory;
        let _ = Cli::command().print_help();
        return Ok(DepfenceExit::Success);
    };

    match command {
        Commands::Validate {
            graph,
            rules,
            format,
            sequential,
            output,
        } => handle_validate(&ValidateArgs {
            graph,
            rules,
            format,
            sequential,
            output,
            config: cli.config,
        }),
        Commands::CheckRules { rules } => handle_check_rules(&rules),
    }
}
