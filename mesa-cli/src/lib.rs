//! Command-line interface for scoring group dining venues.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod calculate;
mod error;
mod fs;
mod history;
mod output;
mod rank;

pub use error::CliError;

use calculate::{CalculateArgs, run_calculate};
use history::{HistoryArgs, run_history};
use rank::{RankArgs, run_rank};

const ARG_CALCULATE_REQUEST: &str = "request";
const ARG_RANK_REQUEST: &str = "request";
const ARG_STORE: &str = "store";
const ARG_GROUP: &str = "group";
const ARG_FORMAT: &str = "format";
const ARG_ORIGIN_AS_UNSET: &str = "origin-as-unset";
const ENV_CALCULATE_REQUEST: &str = "MESA_CMDS_CALCULATE_REQUEST_PATH";
const ENV_RANK_REQUEST: &str = "MESA_CMDS_RANK_REQUEST_PATH";
const ENV_HISTORY_STORE: &str = "MESA_CMDS_HISTORY_STORE";
const ENV_HISTORY_GROUP: &str = "MESA_CMDS_HISTORY_GROUP";

/// Run the Mesa CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] describing the first failure.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Calculate(args) => run_calculate(args),
        Command::Rank(args) => run_rank(args),
        Command::History(args) => run_history(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "mesa",
    about = "Score and rank dining venues for a group of colleagues",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score one venue for a group.
    Calculate(CalculateArgs),
    /// Rank candidate venues for a group.
    Rank(RankArgs),
    /// List stored calculations for a group.
    History(HistoryArgs),
}

#[cfg(test)]
mod tests;
