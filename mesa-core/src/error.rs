//! Errors raised while aggregating distances for a group.

use thiserror::Error;

use crate::InvalidCoordinate;

/// Errors returned by [`compute_distance_facts`](crate::compute_distance_facts)
/// and the functions built on it.
///
/// Every variant reflects bad input rather than a transient condition, so
/// callers should not retry.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CalculationError {
    /// A member or venue coordinate was non-finite or out of range.
    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinate),
    /// No member has a known address, so there is no group center.
    #[error("at least one member must have a known address")]
    InsufficientData,
    /// The venue has no known address.
    #[error("venue {venue_id} has no known location")]
    MissingVenueLocation {
        /// Identifier of the venue that cannot be located.
        venue_id: u64,
    },
}
