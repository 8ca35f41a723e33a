// src/bin/depfence.rs
use clap::Parser;
use colored::Colorize;
use depfence_core::cli::{self, Cli};
use depfence_core::exit::DepfenceExit;
use depfence_core::logging;

fn main() -> DepfenceExit {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match cli::dispatch::execute(cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red());
            DepfenceExit::from_error(&e)
        }
    }
}
