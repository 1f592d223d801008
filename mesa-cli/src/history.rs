//! History command implementation for the Mesa CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::output::{self, OutputFormat};
use crate::{ARG_FORMAT, ARG_GROUP, ARG_STORE, CliError, ENV_HISTORY_GROUP, ENV_HISTORY_STORE};

/// CLI arguments for the `history` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "history", about = "List stored calculations for a group")]
#[ortho_config(prefix = "MESA")]
pub(crate) struct HistoryArgs {
    /// SQLite database that keeps calculation history.
    #[arg(long = ARG_STORE, value_name = "path")]
    #[serde(default)]
    pub(crate) store: Option<Utf8PathBuf>,
    /// Group whose calculations are listed.
    #[arg(long = ARG_GROUP, value_name = "id")]
    #[serde(default)]
    pub(crate) group: Option<u64>,
    /// Output format.
    #[arg(long = ARG_FORMAT, value_enum)]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
}

/// Resolved `history` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HistoryConfig {
    pub(crate) store: Utf8PathBuf,
    pub(crate) group: u64,
    pub(crate) format: OutputFormat,
}

impl TryFrom<HistoryArgs> for HistoryConfig {
    type Error = CliError;

    fn try_from(args: HistoryArgs) -> Result<Self, Self::Error> {
        let store = args.store.ok_or(CliError::MissingArgument {
            field: ARG_STORE,
            env: ENV_HISTORY_STORE,
        })?;
        let group = args.group.ok_or(CliError::MissingArgument {
            field: ARG_GROUP,
            env: ENV_HISTORY_GROUP,
        })?;
        Ok(Self {
            store,
            group,
            format: args.format.unwrap_or_default(),
        })
    }
}

pub(crate) fn run_history(args: HistoryArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_history_with(args, &mut stdout)
}

pub(crate) fn run_history_with(args: HistoryArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = HistoryConfig::try_from(merged)?;
    list(&config, writer)
}

#[cfg(feature = "store-sqlite")]
fn list(config: &HistoryConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    use mesa_core::{CalculationStore, SqliteCalculationStore};

    crate::fs::require_existing(&config.store, ARG_STORE)?;
    let store = SqliteCalculationStore::open(config.store.as_std_path())?;
    let history = store.list_for_group(config.group)?;
    log::info!(
        "found {} stored calculations for group {}",
        history.len(),
        config.group
    );
    match config.format {
        OutputFormat::Json => output::write_json(writer, &history),
        OutputFormat::Summary => {
            for stored in &history {
                output::write_line(writer, &output::stored_summary(stored))?;
            }
            Ok(())
        }
    }
}

#[cfg(not(feature = "store-sqlite"))]
fn list(_config: &HistoryConfig, _writer: &mut dyn Write) -> Result<(), CliError> {
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "history",
    })
}
