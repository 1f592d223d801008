//! Rendering command results as JSON or as a short text summary.

use std::io::Write;

use clap::ValueEnum;
use mesa_core::{CalculationResult, StoredCalculation, VenueRanking, round_km};
use serde::{Deserialize, Serialize};

use crate::CliError;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    /// Pretty-printed JSON with full-precision distances.
    #[default]
    Json,
    /// One line per result with distances rounded to two decimals.
    Summary,
}

pub(crate) fn write_json<T: Serialize + ?Sized>(
    writer: &mut dyn Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    write_line(writer, &payload)
}

pub(crate) fn write_line(writer: &mut dyn Write, line: &str) -> Result<(), CliError> {
    writer
        .write_all(line.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)
}

/// Summarise one calculation, e.g.
/// `group 7 at KFC - San Isidro (#1): score 78, 10.94 km from the group center`.
pub(crate) fn calculation_summary(result: &CalculationResult) -> String {
    let facts = result.facts();
    format!(
        "group {} at {} (#{}): score {}, {} km from the group center, \
         {} km average, {} km spread",
        result.group_id(),
        display_name(result.venue_name()),
        result.venue_id(),
        result.viability_score(),
        round_km(facts.center_to_venue_km()),
        round_km(facts.average_distance_km()),
        round_km(facts.max_spread_km()),
    )
}

pub(crate) fn stored_summary(stored: &StoredCalculation) -> String {
    format!(
        "[{}] {} {}",
        stored.id,
        stored.created_at.to_rfc3339(),
        calculation_summary(&stored.result)
    )
}

pub(crate) fn write_ranking_summary(
    writer: &mut dyn Write,
    ranking: &VenueRanking,
) -> Result<(), CliError> {
    for (position, assessment) in (1_usize..).zip(&ranking.ranked) {
        let line = format!(
            "{position}. {} (#{}): score {}, {} km from the group center",
            display_name(&assessment.venue.name),
            assessment.venue.id,
            assessment.viability_score,
            round_km(assessment.facts.center_to_venue_km()),
        );
        write_line(writer, &line)?;
    }
    for venue_id in &ranking.unlocated {
        write_line(writer, &format!("-. venue #{venue_id} has no location"))?;
    }
    Ok(())
}

fn display_name(name: &str) -> &str {
    if name.is_empty() { "unnamed venue" } else { name }
}
