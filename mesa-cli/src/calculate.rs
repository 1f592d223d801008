//! Calculate command implementation for the Mesa CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use mesa_core::{CalculationRequest, CalculationResult, calculate};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::output::{self, OutputFormat};
use crate::{
    ARG_CALCULATE_REQUEST, ARG_FORMAT, ARG_ORIGIN_AS_UNSET, ARG_STORE, CliError,
    ENV_CALCULATE_REQUEST, fs,
};

/// CLI arguments for the `calculate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "calculate",
    long_about = "Score one venue for one group. The request is a JSON file \
                 holding groupId, members and venue. The result can also be \
                 saved to a SQLite history store.",
    about = "Score a venue for a group"
)]
#[ortho_config(prefix = "MESA")]
pub(crate) struct CalculateArgs {
    /// Path to a JSON file containing a calculation request.
    #[arg(value_name = ARG_CALCULATE_REQUEST)]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// SQLite database that keeps calculation history.
    #[arg(long = ARG_STORE, value_name = "path")]
    #[serde(default)]
    pub(crate) store: Option<Utf8PathBuf>,
    /// Output format.
    #[arg(long = ARG_FORMAT, value_enum)]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
    /// Treat addresses at exactly (0, 0) as unknown.
    #[arg(long = ARG_ORIGIN_AS_UNSET)]
    #[serde(default)]
    pub(crate) origin_as_unset: bool,
}

impl CalculateArgs {
    pub(crate) fn into_config(self) -> Result<CalculateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        CalculateConfig::try_from(merged)
    }
}

/// Resolved `calculate` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CalculateConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) store: Option<Utf8PathBuf>,
    pub(crate) format: OutputFormat,
    pub(crate) origin_as_unset: bool,
}

impl TryFrom<CalculateArgs> for CalculateConfig {
    type Error = CliError;

    fn try_from(args: CalculateArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingPositional {
            field: ARG_CALCULATE_REQUEST,
            env: ENV_CALCULATE_REQUEST,
        })?;
        Ok(Self {
            request_path,
            store: args.store,
            format: args.format.unwrap_or_default(),
            origin_as_unset: args.origin_as_unset,
        })
    }
}

pub(crate) fn run_calculate(args: CalculateArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_calculate_with(args, &mut stdout)
}

pub(crate) fn run_calculate_with(
    args: CalculateArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    fs::require_existing(&config.request_path, ARG_CALCULATE_REQUEST)?;
    let request = load_calculation_request(&config.request_path, config.origin_as_unset)?;

    let unlocated = request.unlocated_members();
    if unlocated > 0 {
        log::warn!(
            "{unlocated} of {} members in group {} have no address and are left out of distance statistics",
            request.members.len(),
            request.group_id
        );
    }

    let result = calculate(&request).map_err(|source| CliError::Calculation {
        group_id: request.group_id,
        source,
    })?;
    log::info!(
        "scored venue {} for group {}: {}",
        result.venue_id(),
        result.group_id(),
        result.viability_score().value()
    );

    match config.store.as_deref() {
        Some(store_path) => {
            let stored = persist(store_path, &result)?;
            match config.format {
                OutputFormat::Json => output::write_json(writer, &stored),
                OutputFormat::Summary => {
                    output::write_line(writer, &output::stored_summary(&stored))
                }
            }
        }
        None => match config.format {
            OutputFormat::Json => output::write_json(writer, &result),
            OutputFormat::Summary => {
                output::write_line(writer, &output::calculation_summary(&result))
            }
        },
    }
}

/// Load and validate a calculation request.
pub(crate) fn load_calculation_request(
    path: &Utf8Path,
    origin_as_unset: bool,
) -> Result<CalculationRequest, CliError> {
    let mut request: CalculationRequest = fs::load_request(path)?;
    if origin_as_unset {
        for member in &mut request.members {
            member.address = member.address.origin_as_unset();
        }
        request.venue.address = request.venue.address.origin_as_unset();
    }
    request.validate().map_err(|source| CliError::InvalidRequest {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(request)
}

#[cfg(feature = "store-sqlite")]
fn persist(
    store_path: &Utf8Path,
    result: &CalculationResult,
) -> Result<mesa_core::StoredCalculation, CliError> {
    use mesa_core::{CalculationStore, SqliteCalculationStore};

    fs::ensure_parent_dir(store_path).map_err(|source| CliError::PrepareStoreDirectory {
        path: store_path.to_path_buf(),
        source,
    })?;
    let mut store = SqliteCalculationStore::open(store_path.as_std_path())?;
    let stored = store.save(result)?;
    log::info!(
        "saved calculation {} for group {} to {store_path}",
        stored.id,
        result.group_id()
    );
    Ok(stored)
}

#[cfg(not(feature = "store-sqlite"))]
fn persist(
    _store_path: &Utf8Path,
    _result: &CalculationResult,
) -> Result<mesa_core::StoredCalculation, CliError> {
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "--store",
    })
}
