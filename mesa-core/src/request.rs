//! Calculation requests and the end-to-end pipeline.

use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    CalculationError, CalculationResult, Member, Venue, assemble_result_at,
    compute_distance_facts, compute_viability_score,
};

/// Largest group a calculation request may describe.
pub const MAX_GROUP_MEMBERS: usize = 8;

/// A group, its members and the venue to score.
///
/// # Examples
/// ```rust
/// use mesa_core::{Address, CalculationRequest, GeoPoint, Member, Venue};
///
/// let request = CalculationRequest {
///     group_id: 7,
///     members: vec![Member::new(1, "Ana", Address::Known(GeoPoint::from_raw(-12.0, -77.0)))],
///     venue: Venue::new(1, "KFC - San Isidro", GeoPoint::from_raw(-12.0904, -77.0396).into()),
/// };
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct CalculationRequest {
    /// Group the calculation belongs to.
    pub group_id: u64,
    /// Every member of the group, located or not.
    pub members: Vec<Member>,
    /// Venue to score.
    pub venue: Venue,
}

/// Reasons a [`CalculationRequest`] is rejected before any computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalculationRequestError {
    /// The group identifier was zero.
    #[error("group id is required")]
    MissingGroupId,
    /// The venue identifier was zero.
    #[error("venue id is required")]
    MissingVenueId,
    /// The group had no members.
    #[error("group must have at least one member")]
    NoMembers,
    /// The group exceeded [`MAX_GROUP_MEMBERS`].
    #[error("group has {count} members; at most {max} are allowed")]
    TooManyMembers {
        /// Members supplied.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
}

impl CalculationRequest {
    /// Check identifiers and group size.
    ///
    /// Coordinates are not inspected here; the engine validates them when it
    /// first uses them.
    ///
    /// # Errors
    /// Returns the first [`CalculationRequestError`] that applies.
    pub const fn validate(&self) -> Result<(), CalculationRequestError> {
        if self.group_id == 0 {
            return Err(CalculationRequestError::MissingGroupId);
        }
        if self.venue.id == 0 {
            return Err(CalculationRequestError::MissingVenueId);
        }
        validate_group_size(self.members.len())
    }

    /// Count members whose address is unset.
    #[must_use]
    pub fn unlocated_members(&self) -> usize {
        self.members
            .iter()
            .filter(|member| !member.address.is_known())
            .count()
    }
}

/// Check that a group has between one and [`MAX_GROUP_MEMBERS`] members.
pub(crate) const fn validate_group_size(count: usize) -> Result<(), CalculationRequestError> {
    if count == 0 {
        return Err(CalculationRequestError::NoMembers);
    }
    if count > MAX_GROUP_MEMBERS {
        return Err(CalculationRequestError::TooManyMembers {
            count,
            max: MAX_GROUP_MEMBERS,
        });
    }
    Ok(())
}

/// Compute facts, score and result for a request, stamped with the current
/// time.
///
/// The request is not validated; call [`CalculationRequest::validate`] first
/// when the input comes from outside.
///
/// # Errors
/// Propagates [`CalculationError`] from
/// [`compute_distance_facts`](crate::compute_distance_facts).
pub fn calculate(request: &CalculationRequest) -> Result<CalculationResult, CalculationError> {
    calculate_at(request, Utc::now())
}

/// Compute facts, score and result for a request at a fixed time.
///
/// # Errors
/// Propagates [`CalculationError`] from
/// [`compute_distance_facts`](crate::compute_distance_facts).
pub fn calculate_at(
    request: &CalculationRequest,
    timestamp: DateTime<Utc>,
) -> Result<CalculationResult, CalculationError> {
    let facts = compute_distance_facts(&request.members, &request.venue)?;
    let score = compute_viability_score(&facts, request.members.len());
    Ok(
        assemble_result_at(request.group_id, request.venue.id, facts, score, timestamp)
            .with_venue_name(request.venue.name.clone()),
    )
}
