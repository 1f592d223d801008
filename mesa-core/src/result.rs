//! Immutable calculation snapshots handed to persistence.

use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{DistanceFacts, ViabilityScore};

/// The outcome of scoring one venue for one group.
///
/// Serialized field names are stable: `groupId`, `restaurantId`,
/// `restaurantName`, `centerPoint`, `distance`, `averageDistance`,
/// `maxSpread`, `viabilityScore`, `membersByDistance` and `timestamp`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct CalculationResult {
    group_id: u64,
    #[cfg_attr(feature = "serde", serde(rename = "restaurantId"))]
    venue_id: u64,
    #[cfg_attr(feature = "serde", serde(rename = "restaurantName", default))]
    venue_name: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    facts: DistanceFacts,
    viability_score: ViabilityScore,
    timestamp: DateTime<Utc>,
}

impl CalculationResult {
    /// Attach the venue display name.
    #[must_use]
    pub fn with_venue_name(self, venue_name: impl Into<String>) -> Self {
        Self {
            venue_name: venue_name.into(),
            ..self
        }
    }

    /// Group the calculation was made for.
    #[must_use]
    pub const fn group_id(&self) -> u64 {
        self.group_id
    }

    /// Venue that was scored.
    #[must_use]
    pub const fn venue_id(&self) -> u64 {
        self.venue_id
    }

    /// Venue display name, empty when none was attached.
    #[must_use]
    pub fn venue_name(&self) -> &str {
        &self.venue_name
    }

    /// Distance facts behind the score.
    #[must_use]
    pub const fn facts(&self) -> &DistanceFacts {
        &self.facts
    }

    /// Viability of the venue for the group.
    #[must_use]
    pub const fn viability_score(&self) -> ViabilityScore {
        self.viability_score
    }

    /// When the result was assembled.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Bundle facts and score into a result stamped with the current time.
///
/// # Examples
/// ```
/// use mesa_core::{Address, GeoPoint, Member, Venue, assemble_result, compute_distance_facts, compute_viability_score};
///
/// # fn main() -> Result<(), mesa_core::CalculationError> {
/// let members = [Member::new(1, "Ana", Address::Known(GeoPoint::from_raw(-12.0, -77.0)))];
/// let venue = Venue::new(3, "KFC - Centro Histórico", GeoPoint::from_raw(-12.0469, -77.0289).into());
/// let facts = compute_distance_facts(&members, &venue)?;
/// let score = compute_viability_score(&facts, members.len());
///
/// let result = assemble_result(42, venue.id, facts, score);
/// assert_eq!(result.group_id(), 42);
/// assert_eq!(result.venue_id(), 3);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn assemble_result(
    group_id: u64,
    venue_id: u64,
    facts: DistanceFacts,
    viability_score: ViabilityScore,
) -> CalculationResult {
    assemble_result_at(group_id, venue_id, facts, viability_score, Utc::now())
}

/// Bundle facts and score into a result with an explicit timestamp.
#[must_use]
pub const fn assemble_result_at(
    group_id: u64,
    venue_id: u64,
    facts: DistanceFacts,
    viability_score: ViabilityScore,
    timestamp: DateTime<Utc>,
) -> CalculationResult {
    CalculationResult {
        group_id,
        venue_id,
        venue_name: String::new(),
        facts,
        viability_score,
        timestamp,
    }
}
