//! Distance aggregation for a group and a venue.
//!
//! [`compute_distance_facts`] is the entry point. The helpers it is built
//! from are public so callers can reuse the individual rules:
//!
//! - [`average_distance_km`] tolerates groups with no located members and
//!   reports `0.0`, whereas the centroid step fails with
//!   [`CalculationError::InsufficientData`]. Both behaviours are observable
//!   and kept separate.
//! - [`max_spread_km`] is `0.0` for fewer than two points.
//! - [`rank_members`] keeps every member, placing unknown distances last.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{CalculationError, GeoPoint, InvalidCoordinate, Member, Venue, centroid, haversine_km};

/// Sort key used for members whose distance is unknown, in kilometres.
///
/// It is emitted as `rankDistance` in serialized rankings. Ordering itself
/// places unknown distances after every known one, including known distances
/// beyond the sentinel.
pub const UNKNOWN_DISTANCE_SENTINEL_KM: f64 = 999.0;

/// A member paired with their distance to the venue.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct MemberDistance {
    #[cfg_attr(feature = "serde", serde(flatten))]
    member: Member,
    distance: Option<f64>,
    rank_distance: f64,
}

impl MemberDistance {
    /// Pair a member with a known or unknown distance.
    #[must_use]
    pub fn new(member: Member, distance_km: Option<f64>) -> Self {
        let rank_distance = distance_km.unwrap_or(UNKNOWN_DISTANCE_SENTINEL_KM);
        Self {
            member,
            distance: distance_km,
            rank_distance,
        }
    }

    /// The ranked member.
    #[must_use]
    pub const fn member(&self) -> &Member {
        &self.member
    }

    /// Distance to the venue in kilometres, `None` when the address is unset.
    #[must_use]
    pub const fn distance_km(&self) -> Option<f64> {
        self.distance
    }

    /// Distance used for ordering; [`UNKNOWN_DISTANCE_SENTINEL_KM`] when unknown.
    #[must_use]
    pub const fn rank_distance_km(&self) -> f64 {
        self.rank_distance
    }
}

/// Distance statistics for one group and one venue.
///
/// All distances are great-circle kilometres at full precision.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct DistanceFacts {
    #[cfg_attr(feature = "serde", serde(rename = "centerPoint"))]
    center: GeoPoint,
    #[cfg_attr(feature = "serde", serde(rename = "distance"))]
    center_to_venue: f64,
    #[cfg_attr(feature = "serde", serde(rename = "averageDistance"))]
    average_distance: f64,
    #[cfg_attr(feature = "serde", serde(rename = "maxSpread"))]
    max_spread: f64,
    #[cfg_attr(feature = "serde", serde(rename = "membersByDistance"))]
    ranked_members: Vec<MemberDistance>,
}

impl DistanceFacts {
    /// Planar centroid of the located members.
    #[must_use]
    pub const fn center(&self) -> GeoPoint {
        self.center
    }

    /// Distance from the centroid to the venue.
    #[must_use]
    pub const fn center_to_venue_km(&self) -> f64 {
        self.center_to_venue
    }

    /// Mean member-to-venue distance over located members.
    #[must_use]
    pub const fn average_distance_km(&self) -> f64 {
        self.average_distance
    }

    /// Largest pairwise distance between located members.
    #[must_use]
    pub const fn max_spread_km(&self) -> f64 {
        self.max_spread
    }

    /// Every member ordered by distance to the venue.
    #[must_use]
    pub fn ranked_members(&self) -> &[MemberDistance] {
        &self.ranked_members
    }
}

/// Compute every distance fact for `members` meeting at `venue`.
///
/// # Errors
/// - [`CalculationError::InsufficientData`] when no member has a known
///   address. This is checked before the venue.
/// - [`CalculationError::MissingVenueLocation`] when the venue address is
///   unset.
/// - [`CalculationError::InvalidCoordinate`] for the first out-of-range
///   coordinate encountered.
///
/// # Examples
/// ```
/// use mesa_core::{Address, GeoPoint, Member, Venue, compute_distance_facts};
///
/// # fn main() -> Result<(), mesa_core::CalculationError> {
/// let members = [Member::new(1, "Ana", Address::Known(GeoPoint::from_raw(-12.0, -77.0)))];
/// let venue = Venue::new(1, "KFC - San Isidro", GeoPoint::from_raw(-12.0904, -77.0396).into());
///
/// let facts = compute_distance_facts(&members, &venue)?;
/// assert!((facts.center_to_venue_km() - 10.94).abs() < 0.01);
/// assert_eq!(facts.average_distance_km(), facts.center_to_venue_km());
/// assert_eq!(facts.max_spread_km(), 0.0);
/// # Ok(())
/// # }
/// ```
pub fn compute_distance_facts(
    members: &[Member],
    venue: &Venue,
) -> Result<DistanceFacts, CalculationError> {
    let located = located_points(members)?;
    let center = centroid(&located).ok_or(CalculationError::InsufficientData)?;
    let venue_point = venue
        .address
        .point()
        .ok_or(CalculationError::MissingVenueLocation { venue_id: venue.id })?;
    let center_to_venue = haversine_km(center, venue_point)?;
    let average_distance = average_distance_km(members, venue_point)?;
    let max_spread = max_spread_km(&located)?;
    let ranked_members = rank_members(members, venue_point)?;

    Ok(DistanceFacts {
        center,
        center_to_venue,
        average_distance,
        max_spread,
        ranked_members,
    })
}

/// Mean distance from located members to `venue`.
///
/// Members without an address are excluded from both the sum and the count.
/// Returns `0.0` when no member is located.
///
/// # Errors
/// Returns [`InvalidCoordinate`] when a member or the venue is out of range.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "averaging sums distances and divides by a small member count"
)]
pub fn average_distance_km(members: &[Member], venue: GeoPoint) -> Result<f64, InvalidCoordinate> {
    let mut total = 0.0_f64;
    let mut count = 0_usize;
    for point in members.iter().filter_map(|member| member.address.point()) {
        total += haversine_km(point, venue)?;
        count += 1;
    }
    if count == 0 {
        return Ok(0.0);
    }
    Ok(total / count as f64)
}

/// Largest great-circle distance between any two points.
///
/// Returns `0.0` when fewer than two points are supplied.
///
/// # Errors
/// Returns [`InvalidCoordinate`] when a point is out of range.
pub fn max_spread_km(points: &[GeoPoint]) -> Result<f64, InvalidCoordinate> {
    let mut widest = 0.0_f64;
    for (offset, &first) in points.iter().enumerate() {
        for &second in points.iter().skip(offset + 1) {
            widest = widest.max(haversine_km(first, second)?);
        }
    }
    Ok(widest)
}

/// Order every member by distance to `venue`, nearest first.
///
/// Members without an address get an unknown distance and follow all located
/// members. The sort is stable, so ties keep their input order.
///
/// # Errors
/// Returns [`InvalidCoordinate`] when a member or the venue is out of range.
pub fn rank_members(
    members: &[Member],
    venue: GeoPoint,
) -> Result<Vec<MemberDistance>, InvalidCoordinate> {
    let mut ranked = members
        .iter()
        .map(|member| {
            let distance = member
                .address
                .point()
                .map(|point| haversine_km(point, venue))
                .transpose()?;
            Ok(MemberDistance::new(member.clone(), distance))
        })
        .collect::<Result<Vec<_>, InvalidCoordinate>>()?;

    ranked.sort_by(|left, right| {
        left.distance
            .is_none()
            .cmp(&right.distance.is_none())
            .then_with(|| left.rank_distance.total_cmp(&right.rank_distance))
    });
    Ok(ranked)
}

fn located_points(members: &[Member]) -> Result<Vec<GeoPoint>, InvalidCoordinate> {
    members
        .iter()
        .filter_map(|member| member.address.point())
        .map(GeoPoint::validate)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Address;
    use rstest::{fixture, rstest};

    const TOLERANCE: f64 = 1e-9;

    fn located(id: u64, latitude: f64, longitude: f64) -> Member {
        Member::new(
            id,
            format!("member-{id}"),
            Address::Known(GeoPoint::from_raw(latitude, longitude)),
        )
    }

    #[fixture]
    fn san_isidro() -> Venue {
        Venue::new(
            1,
            "KFC - San Isidro",
            Address::Known(GeoPoint::from_raw(-12.0904, -77.0396)),
        )
    }

    #[rstest]
    fn single_member_average_matches_center_distance(san_isidro: Venue) {
        let facts =
            compute_distance_facts(&[located(1, -12.0, -77.0)], &san_isidro).expect("facts");
        assert!((facts.center_to_venue_km() - 10.9357).abs() < 1e-3);
        assert!((facts.average_distance_km() - facts.center_to_venue_km()).abs() <= TOLERANCE);
        assert_eq!(facts.max_spread_km(), 0.0);
        assert_eq!(facts.ranked_members().len(), 1);
    }

    #[rstest]
    fn center_ignores_members_without_address(san_isidro: Venue) {
        let members = [
            located(1, -12.0, -77.0),
            Member::without_address(2, "Luis"),
            located(3, -12.1, -77.1),
        ];
        let facts = compute_distance_facts(&members, &san_isidro).expect("facts");
        assert!((facts.center().latitude() + 12.05).abs() <= TOLERANCE);
        assert!((facts.center().longitude() + 77.05).abs() <= TOLERANCE);
    }

    #[rstest]
    fn no_located_members_is_insufficient(san_isidro: Venue) {
        let members = [Member::without_address(1, "Luis")];
        let err = compute_distance_facts(&members, &san_isidro).expect_err("no center");
        assert_eq!(err, CalculationError::InsufficientData);
    }

    #[rstest]
    fn empty_group_is_insufficient_even_without_venue_location() {
        let venue = Venue::new(4, "Nowhere", Address::Unset);
        let err = compute_distance_facts(&[], &venue).expect_err("no center");
        assert_eq!(err, CalculationError::InsufficientData);
    }

    #[rstest]
    fn unlocated_venue_is_rejected() {
        let venue = Venue::new(9, "Pop-up", Address::Unset);
        let err = compute_distance_facts(&[located(1, -12.0, -77.0)], &venue)
            .expect_err("venue has no location");
        assert_eq!(err, CalculationError::MissingVenueLocation { venue_id: 9 });
    }

    #[rstest]
    fn invalid_member_coordinate_is_reported(san_isidro: Venue) {
        let err = compute_distance_facts(&[located(1, -95.0, -77.0)], &san_isidro)
            .expect_err("latitude out of range");
        assert_eq!(
            err,
            CalculationError::InvalidCoordinate(InvalidCoordinate {
                latitude: -95.0,
                longitude: -77.0,
            })
        );
    }

    #[rstest]
    fn average_of_nobody_is_zero(san_isidro: Venue) {
        let venue = san_isidro.address.point().expect("venue located");
        let average =
            average_distance_km(&[Member::without_address(1, "Luis")], venue).expect("average");
        assert_eq!(average, 0.0);
    }

    #[rstest]
    fn spread_of_fewer_than_two_points_is_zero() {
        assert_eq!(max_spread_km(&[]).expect("spread"), 0.0);
        assert_eq!(
            max_spread_km(&[GeoPoint::from_raw(-12.0, -77.0)]).expect("spread"),
            0.0
        );
    }

    #[rstest]
    fn spread_is_widest_pair() {
        let a = GeoPoint::from_raw(-12.0, -77.0);
        let b = GeoPoint::from_raw(-12.05, -77.02);
        let c = GeoPoint::from_raw(-12.2, -77.1);
        let expected = haversine_km(a, c).expect("distance");
        let spread = max_spread_km(&[a, b, c]).expect("spread");
        assert!((spread - expected).abs() <= TOLERANCE);
    }

    #[rstest]
    fn ranking_puts_unknown_last(san_isidro: Venue) {
        let venue = san_isidro.address.point().expect("venue located");
        let members = [
            Member::without_address(1, "Luis"),
            located(2, -12.2, -77.1),
            located(3, -12.09, -77.04),
        ];
        let ranked = rank_members(&members, venue).expect("ranking");
        let ids: Vec<u64> = ranked.iter().map(|entry| entry.member().id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        let last = ranked.last().expect("non-empty ranking");
        assert_eq!(last.distance_km(), None);
        assert_eq!(last.rank_distance_km(), UNKNOWN_DISTANCE_SENTINEL_KM);
    }

    #[rstest]
    fn member_at_the_venue_ranks_first(san_isidro: Venue) {
        let venue = san_isidro.address.point().expect("venue located");
        let members = [
            Member::without_address(1, "Luis"),
            located(2, -12.0904, -77.0396),
        ];
        let ranked = rank_members(&members, venue).expect("ranking");
        let first = ranked.first().expect("non-empty ranking");
        assert_eq!(first.member().id, 2);
        assert_eq!(first.distance_km(), Some(0.0));
    }

    #[rstest]
    fn far_members_still_rank_before_unknown() {
        let venue = GeoPoint::from_raw(-12.0904, -77.0396);
        let members = [Member::without_address(1, "Luis"), located(2, 48.8566, 2.3522)];
        let ranked = rank_members(&members, venue).expect("ranking");
        let ids: Vec<u64> = ranked.iter().map(|entry| entry.member().id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn serializes_stable_field_names(san_isidro: Venue) {
        let members = [located(1, -12.0, -77.0), Member::without_address(2, "Luis")];
        let facts = compute_distance_facts(&members, &san_isidro).expect("facts");
        let json = serde_json::to_value(&facts).expect("serialize facts");
        for field in [
            "centerPoint",
            "distance",
            "averageDistance",
            "maxSpread",
            "membersByDistance",
        ] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        let unknown = &json["membersByDistance"][1];
        assert_eq!(unknown["id"], 2);
        assert!(unknown["distance"].is_null());
        assert_eq!(unknown["rankDistance"], 999.0);
    }
}
