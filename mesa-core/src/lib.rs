//! Core domain types and scoring for the Mesa engine.
//!
//! Given a group of members, some of whom have a known location, and a
//! candidate venue, the engine computes how far the group is from the venue
//! and condenses that into a bounded viability score. Everything here is a
//! pure function of its inputs apart from timestamps and the optional
//! persistence layer.
//!
//! Coordinates are validated when first used rather than when decoded, so a
//! malformed request surfaces as [`CalculationError::InvalidCoordinate`].

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod address;
mod error;
mod facts;
mod geodesy;
mod member;
mod ranking;
mod request;
mod result;
mod store;
mod venue;
mod viability;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use address::Address;
pub use error::CalculationError;
pub use facts::{
    DistanceFacts, MemberDistance, UNKNOWN_DISTANCE_SENTINEL_KM, average_distance_km,
    compute_distance_facts, max_spread_km, rank_members,
};
pub use geodesy::{EARTH_RADIUS_KM, GeoPoint, InvalidCoordinate, centroid, haversine_km, round_km};
pub use member::Member;
pub use ranking::{RankingRequest, VenueAssessment, VenueRanking, rank_venues};
pub use request::{
    CalculationRequest, CalculationRequestError, MAX_GROUP_MEMBERS, calculate, calculate_at,
};
pub use result::{CalculationResult, assemble_result, assemble_result_at};
pub use store::{CalculationStore, StoredCalculation};
#[cfg(feature = "store-sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "store-sqlite")))]
pub use store::{SqliteCalculationStore, SqliteCalculationStoreError};
pub use venue::Venue;
pub use viability::{
    ScoreOutOfRange, ViabilityInputs, ViabilityScore, ViabilityWeights, compute_viability_score,
    score_viability,
};
