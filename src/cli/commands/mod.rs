//! Command implementations for the watch history CLI
//!
//! Each command is implemented in its own module:
//! - `process`: parse, aggregate and write the tables
//! - `inspect`: parse, aggregate and print a summary

pub mod inspect;
pub mod process;
pub mod shared;

pub use shared::RunStats;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};

/// Main command runner
///
/// Dispatches to the handler for the chosen subcommand.
pub async fn run(args: Args) -> Result<RunStats> {
    match args.command {
        Some(Commands::Process(process_args)) => process::run_process(process_args).await,
        Some(Commands::Inspect(inspect_args)) => inspect::run_inspect(inspect_args).await,
        None => Err(Error::configuration("No command given")),
    }
}
