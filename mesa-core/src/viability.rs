//! Viability scoring for a group meeting at a venue.
//!
//! The score starts at 100 and applies, in order, a capped distance penalty,
//! a bonus for large groups and a capped spread penalty. The total is clamped
//! once to `0..=100` and rounded half up.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::DistanceFacts;

/// A bounded `0..=100` measure of how well a venue suits a group.
///
/// # Examples
/// ```
/// use mesa_core::ViabilityScore;
///
/// let score = ViabilityScore::try_from(97_u8).expect("within range");
/// assert_eq!(score.value(), 97);
/// assert!(ViabilityScore::try_from(101_u8).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct ViabilityScore(u8);

impl ViabilityScore {
    /// Highest possible score.
    pub const MAX: Self = Self(100);
    /// Lowest possible score.
    pub const MIN: Self = Self(0);

    /// The score as an integer.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// A score above 100 was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("viability score {0} exceeds 100")]
pub struct ScoreOutOfRange(pub u8);

impl TryFrom<u8> for ViabilityScore {
    type Error = ScoreOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::MAX.0 {
            Err(ScoreOutOfRange(value))
        } else {
            Ok(Self(value))
        }
    }
}

impl From<ViabilityScore> for u8 {
    fn from(score: ViabilityScore) -> Self {
        score.0
    }
}

impl std::fmt::Display for ViabilityScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tunable constants applied by [`score_viability`].
///
/// The defaults are the production weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViabilityWeights {
    /// Starting score before penalties and bonuses.
    pub base: f64,
    /// Points deducted per kilometre of average distance.
    pub distance_factor: f64,
    /// Largest distance penalty.
    pub distance_cap: f64,
    /// Group size at which the bonus applies.
    pub large_group_size: usize,
    /// Points added for large groups.
    pub large_group_bonus: f64,
    /// Kilometres of spread per penalty point.
    pub spread_divisor: f64,
    /// Largest spread penalty.
    pub spread_cap: f64,
}

impl Default for ViabilityWeights {
    fn default() -> Self {
        Self {
            base: 100.0,
            distance_factor: 2.0,
            distance_cap: 40.0,
            large_group_size: 5,
            large_group_bonus: 10.0,
            spread_divisor: 10.0,
            spread_cap: 20.0,
        }
    }
}

/// Raw inputs to [`score_viability`].
///
/// `None` and `NaN` distances count as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViabilityInputs {
    /// Mean member-to-venue distance in kilometres.
    pub average_distance_km: Option<f64>,
    /// Largest pairwise member distance in kilometres.
    pub max_spread_km: Option<f64>,
    /// Number of members in the group, located or not.
    pub group_size: usize,
}

impl ViabilityInputs {
    /// Gather inputs from computed facts.
    #[must_use]
    pub const fn from_facts(facts: &DistanceFacts, group_size: usize) -> Self {
        Self {
            average_distance_km: Some(facts.average_distance_km()),
            max_spread_km: Some(facts.max_spread_km()),
            group_size,
        }
    }
}

/// Score a venue from distance facts with the default weights.
///
/// `group_size` counts every member of the group, including those without an
/// address.
///
/// # Examples
/// ```
/// use mesa_core::{Address, GeoPoint, Member, Venue, compute_distance_facts, compute_viability_score};
///
/// # fn main() -> Result<(), mesa_core::CalculationError> {
/// let members = [Member::new(1, "Ana", Address::Known(GeoPoint::from_raw(-12.0, -77.0)))];
/// let venue = Venue::new(1, "KFC - San Isidro", GeoPoint::from_raw(-12.0904, -77.0396).into());
/// let facts = compute_distance_facts(&members, &venue)?;
///
/// assert_eq!(compute_viability_score(&facts, members.len()).value(), 78);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn compute_viability_score(facts: &DistanceFacts, group_size: usize) -> ViabilityScore {
    score_viability(
        &ViabilityInputs::from_facts(facts, group_size),
        &ViabilityWeights::default(),
    )
}

/// Score raw inputs with explicit weights.
///
/// Infallible: missing inputs count as zero and the result is always within
/// `0..=100`.
///
/// # Examples
/// ```
/// use mesa_core::{ViabilityInputs, ViabilityWeights, score_viability};
///
/// let inputs = ViabilityInputs {
///     average_distance_km: Some(5.0),
///     max_spread_km: Some(30.0),
///     group_size: 5,
/// };
/// assert_eq!(score_viability(&inputs, &ViabilityWeights::default()).value(), 97);
/// ```
#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "weighted scoring is floating-point; the clamp bounds the cast to 0..=100"
)]
#[must_use]
pub fn score_viability(inputs: &ViabilityInputs, weights: &ViabilityWeights) -> ViabilityScore {
    let average = present(inputs.average_distance_km);
    let spread = present(inputs.max_spread_km);

    let mut score = weights.base;
    score -= (average * weights.distance_factor).min(weights.distance_cap);
    if inputs.group_size >= weights.large_group_size {
        score += weights.large_group_bonus;
    }
    score -= (spread / weights.spread_divisor).min(weights.spread_cap);

    let clamped = score.clamp(0.0, 100.0);
    // `f64::round` rounds halves away from zero, which is half up once clamped.
    let rounded = if clamped.is_nan() { 0.0 } else { clamped.round() };
    ViabilityScore(rounded as u8)
}

fn present(value: Option<f64>) -> f64 {
    value.filter(|v| !v.is_nan()).unwrap_or(0.0)
}
