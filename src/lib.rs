//! Facade crate for the Mesa venue scoring engine.
//!
//! This crate re-exports the core domain types and exposes the optional
//! SQLite calculation store behind a feature flag.

#![forbid(unsafe_code)]

pub use mesa_core::{
    Address, CalculationError, CalculationRequest, CalculationRequestError, CalculationResult,
    CalculationStore, DistanceFacts, EARTH_RADIUS_KM, GeoPoint, InvalidCoordinate,
    MAX_GROUP_MEMBERS, Member, MemberDistance, RankingRequest, ScoreOutOfRange,
    StoredCalculation, UNKNOWN_DISTANCE_SENTINEL_KM, Venue, VenueAssessment, VenueRanking,
    ViabilityInputs, ViabilityScore, ViabilityWeights, assemble_result, assemble_result_at,
    average_distance_km, calculate, calculate_at, centroid, compute_distance_facts,
    compute_viability_score, haversine_km, max_spread_km, rank_members, rank_venues, round_km,
    score_viability,
};

#[cfg(feature = "store-sqlite")]
pub use mesa_core::{SqliteCalculationStore, SqliteCalculationStoreError};

#[cfg(feature = "test-support")]
pub use mesa_core::test_support;
