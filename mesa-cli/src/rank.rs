//! Rank command implementation for the Mesa CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use mesa_core::{RankingRequest, VenueRanking, rank_venues};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::output::{self, OutputFormat};
use crate::{ARG_FORMAT, ARG_ORIGIN_AS_UNSET, ARG_RANK_REQUEST, CliError, ENV_RANK_REQUEST, fs};

/// CLI arguments for the `rank` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "rank",
    long_about = "Score every candidate venue for one group and print them \
                 best first. The request is a JSON file holding groupId, \
                 members and venues.",
    about = "Rank candidate venues for a group"
)]
#[ortho_config(prefix = "MESA")]
pub(crate) struct RankArgs {
    /// Path to a JSON file containing a ranking request.
    #[arg(value_name = ARG_RANK_REQUEST)]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Output format.
    #[arg(long = ARG_FORMAT, value_enum)]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
    /// Treat addresses at exactly (0, 0) as unknown.
    #[arg(long = ARG_ORIGIN_AS_UNSET)]
    #[serde(default)]
    pub(crate) origin_as_unset: bool,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_rank_with(args, &mut stdout)
}

pub(crate) fn run_rank_with(args: RankArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let request_path = merged.request_path.ok_or(CliError::MissingPositional {
        field: ARG_RANK_REQUEST,
        env: ENV_RANK_REQUEST,
    })?;
    fs::require_existing(&request_path, ARG_RANK_REQUEST)?;

    let request = load_ranking_request(&request_path, merged.origin_as_unset)?;
    let ranking = rank(&request)?;

    match merged.format.unwrap_or_default() {
        OutputFormat::Json => output::write_json(writer, &ranking),
        OutputFormat::Summary => output::write_ranking_summary(writer, &ranking),
    }
}

fn load_ranking_request(
    path: &Utf8Path,
    origin_as_unset: bool,
) -> Result<RankingRequest, CliError> {
    let mut request: RankingRequest = fs::load_request(path)?;
    if origin_as_unset {
        for member in &mut request.members {
            member.address = member.address.origin_as_unset();
        }
        for venue in &mut request.venues {
            venue.address = venue.address.origin_as_unset();
        }
    }
    request.validate().map_err(|source| CliError::InvalidRequest {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(request)
}

fn rank(request: &RankingRequest) -> Result<VenueRanking, CliError> {
    let group_id = request.group_id;
    let ranking = rank_venues(&request.members, &request.venues)
        .map_err(|source| CliError::Calculation { group_id, source })?;
    if !ranking.unlocated.is_empty() {
        log::warn!(
            "{} candidate venues have no location and were not ranked",
            ranking.unlocated.len()
        );
    }
    log::info!(
        "ranked {} venues for group {group_id}",
        ranking.ranked.len()
    );
    Ok(ranking)
}
