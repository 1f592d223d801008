//! Score several candidate venues for one group.
//!
//! Each venue is scored independently, so the order of `venues` never affects
//! an individual assessment.

use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    CalculationError, CalculationRequestError, DistanceFacts, Member, Venue, ViabilityScore,
    compute_distance_facts, compute_viability_score, request::validate_group_size,
};

/// A group and the venues it is choosing between.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct RankingRequest {
    /// Group the ranking is for.
    pub group_id: u64,
    /// Every member of the group.
    pub members: Vec<Member>,
    /// Candidate venues.
    pub venues: Vec<Venue>,
}

impl RankingRequest {
    /// Check the group identifier, group size and venue identifiers.
    ///
    /// # Errors
    /// Returns the first [`CalculationRequestError`] that applies.
    pub fn validate(&self) -> Result<(), CalculationRequestError> {
        if self.group_id == 0 {
            return Err(CalculationRequestError::MissingGroupId);
        }
        if self.venues.iter().any(|venue| venue.id == 0) {
            return Err(CalculationRequestError::MissingVenueId);
        }
        validate_group_size(self.members.len())
    }
}

/// One scored candidate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct VenueAssessment {
    /// The candidate venue.
    pub venue: Venue,
    /// Distance facts for the group at this venue.
    pub facts: DistanceFacts,
    /// Viability of the venue.
    pub viability_score: ViabilityScore,
}

/// Candidates ordered best first, plus the venues that could not be placed.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct VenueRanking {
    /// Scored venues, highest score first.
    pub ranked: Vec<VenueAssessment>,
    /// Identifiers of venues without a known location, in input order.
    pub unlocated: Vec<u64>,
}

impl VenueRanking {
    /// The best candidate, if any venue could be scored.
    #[must_use]
    pub fn best(&self) -> Option<&VenueAssessment> {
        self.ranked.first()
    }
}

/// Score every venue for the group and order them.
///
/// Assessments sort by score (highest first), then by distance from the
/// group center (nearest first), then by venue id.
///
/// # Errors
/// [`CalculationError::InsufficientData`] and
/// [`CalculationError::InvalidCoordinate`] abort the ranking. Venues without a
/// location are collected in [`VenueRanking::unlocated`] instead.
///
/// # Examples
/// ```
/// use mesa_core::{Address, GeoPoint, Member, Venue, rank_venues};
///
/// # fn main() -> Result<(), mesa_core::CalculationError> {
/// let members = [Member::new(1, "Ana", Address::Known(GeoPoint::from_raw(-12.0464, -77.0428)))];
/// let venues = [
///     Venue::new(2, "KFC - Miraflores", GeoPoint::from_raw(-12.1265, -77.0305).into()),
///     Venue::new(3, "KFC - Centro Histórico", GeoPoint::from_raw(-12.0469, -77.0289).into()),
///     Venue::new(4, "Pop-up", Address::Unset),
/// ];
///
/// let ranking = rank_venues(&members, &venues)?;
/// assert_eq!(ranking.best().map(|best| best.venue.id), Some(3));
/// assert_eq!(ranking.unlocated, vec![4]);
/// # Ok(())
/// # }
/// ```
pub fn rank_venues(members: &[Member], venues: &[Venue]) -> Result<VenueRanking, CalculationError> {
    let mut ranking = VenueRanking::default();
    for venue in venues {
        match compute_distance_facts(members, venue) {
            Ok(facts) => {
                let viability_score = compute_viability_score(&facts, members.len());
                ranking.ranked.push(VenueAssessment {
                    venue: venue.clone(),
                    facts,
                    viability_score,
                });
            }
            Err(CalculationError::MissingVenueLocation { venue_id }) => {
                ranking.unlocated.push(venue_id);
            }
            Err(err) => return Err(err),
        }
    }
    ranking.ranked.sort_by(compare_assessments);
    Ok(ranking)
}

fn compare_assessments(left: &VenueAssessment, right: &VenueAssessment) -> Ordering {
    right
        .viability_score
        .cmp(&left.viability_score)
        .then_with(|| {
            left.facts
                .center_to_venue_km()
                .total_cmp(&right.facts.center_to_venue_km())
        })
        .then_with(|| left.venue.id.cmp(&right.venue.id))
}
