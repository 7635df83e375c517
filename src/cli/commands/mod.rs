//! Command implementations for the lead enricher CLI
//!
//! Each subcommand lives in its own module and talks to the library only
//! through [`LeadProcessor`](crate::LeadProcessor).

pub mod filter;
pub mod list;
pub mod process;
pub mod shared;

use crate::Result;
use crate::cli::args::{Args, Commands};
use tokio_util::sync::CancellationToken;

/// Whether a command finished its work
///
/// `Failed` is used for soft failures that were already reported to the
/// user; hard failures come back as `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Completed,
    Failed,
}

/// Main command runner for the lead enricher
///
/// Dispatches to the subcommand handler:
/// - `list`: lead files in the data folder
/// - `process`: enrichment, filtering and optional export
/// - `filter`: filtering and optional export of an enriched CSV
pub async fn run(args: Args, cancel: CancellationToken) -> Result<CommandStatus> {
    let Args { command, global } = args;

    match command {
        Some(Commands::List(list_args)) => list::run_list(&global, list_args).await,
        Some(Commands::Process(process_args)) => {
            process::run_process(&global, process_args, cancel).await
        }
        Some(Commands::Filter(filter_args)) => filter::run_filter(&global, filter_args).await,
        None => Ok(CommandStatus::Completed),
    }
}
