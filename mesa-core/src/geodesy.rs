//! Geographic primitives used by the engine.
//!
//! [`GeoPoint`] wraps a WGS84 [`Coord`] with `x = longitude` and
//! `y = latitude`. Points decoded from external data are not validated on
//! construction; [`haversine_km`] and the aggregation functions validate them
//! at first use and report [`InvalidCoordinate`].

use geo::{Centroid, Coord, MultiPoint, Point};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius used for great-circle distances, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Latitude bounds in degrees.
const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
/// Longitude bounds in degrees.
const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// A coordinate pair outside `[-90, 90]` x `[-180, 180]`, or non-finite.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("coordinate ({latitude}, {longitude}) is outside the valid range")]
pub struct InvalidCoordinate {
    /// Offending latitude in degrees.
    pub latitude: f64,
    /// Offending longitude in degrees.
    pub longitude: f64,
}

/// A latitude/longitude pair in degrees.
///
/// # Examples
///
/// ```
/// use mesa_core::GeoPoint;
///
/// # fn main() -> Result<(), mesa_core::InvalidCoordinate> {
/// let san_isidro = GeoPoint::new(-12.0904, -77.0396)?;
/// assert_eq!(san_isidro.latitude(), -12.0904);
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "WirePoint", into = "WirePoint")
)]
pub struct GeoPoint {
    coord: Coord<f64>,
}

impl GeoPoint {
    /// Validate and construct a point.
    ///
    /// # Errors
    /// Returns [`InvalidCoordinate`] when either value is non-finite or out of
    /// range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        Self::from_raw(latitude, longitude).validate()
    }

    /// Construct a point without range checks.
    ///
    /// Use for decoded input that is validated later by the engine.
    #[must_use]
    pub const fn from_raw(latitude: f64, longitude: f64) -> Self {
        Self {
            coord: Coord {
                x: longitude,
                y: latitude,
            },
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.coord.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.coord.x
    }

    /// Report whether both values are finite and in range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude().is_finite()
            && self.longitude().is_finite()
            && LATITUDE_RANGE.contains(&self.latitude())
            && LONGITUDE_RANGE.contains(&self.longitude())
    }

    /// Return the point unchanged when valid.
    ///
    /// # Errors
    /// Returns [`InvalidCoordinate`] carrying the offending values.
    pub fn validate(self) -> Result<Self, InvalidCoordinate> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(InvalidCoordinate {
                latitude: self.latitude(),
                longitude: self.longitude(),
            })
        }
    }
}

impl From<GeoPoint> for Coord<f64> {
    fn from(point: GeoPoint) -> Self {
        point.coord
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(point: GeoPoint) -> Self {
        Self::from(point.coord)
    }
}

/// JSON shape of a [`GeoPoint`].
///
/// Accepts the `lat`/`lng` spelling used by stored calculation payloads.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct WirePoint {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lng")]
    longitude: f64,
}

#[cfg(feature = "serde")]
impl From<WirePoint> for GeoPoint {
    fn from(wire: WirePoint) -> Self {
        Self::from_raw(wire.latitude, wire.longitude)
    }
}

#[cfg(feature = "serde")]
impl From<GeoPoint> for WirePoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            latitude: point.latitude(),
            longitude: point.longitude(),
        }
    }
}

/// Great-circle distance between two points in kilometres.
///
/// Uses the Haversine formula with [`EARTH_RADIUS_KM`]. No rounding is
/// applied; presentation code may call [`round_km`].
///
/// # Errors
/// Returns [`InvalidCoordinate`] for the first point that fails validation.
///
/// # Examples
///
/// ```
/// use mesa_core::{GeoPoint, haversine_km};
///
/// # fn main() -> Result<(), mesa_core::InvalidCoordinate> {
/// let home = GeoPoint::new(-12.0, -77.0)?;
/// let venue = GeoPoint::new(-12.0904, -77.0396)?;
/// let km = haversine_km(home, venue)?;
/// assert!((km - 10.94).abs() < 0.01);
/// # Ok(())
/// # }
/// ```
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> Result<f64, InvalidCoordinate> {
    let start = from.validate()?;
    let end = to.validate()?;
    Ok(haversine_unchecked(start, end))
}

#[expect(
    clippy::float_arithmetic,
    reason = "the Haversine formula is floating-point trigonometry"
)]
fn haversine_unchecked(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude().to_radians();
    let lat2 = to.latitude().to_radians();
    let delta_lat = (to.latitude() - from.latitude()).to_radians();
    let delta_lon = (to.longitude() - from.longitude()).to_radians();

    let half_lat = (delta_lat / 2.0).sin();
    let half_lon = (delta_lon / 2.0).sin();
    // Rounding can push `a` marginally past 1 for antipodal points.
    let a = (half_lat * half_lat + lat1.cos() * lat2.cos() * half_lon * half_lon).clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Arithmetic mean of latitudes and longitudes.
///
/// This is a planar mean of angular coordinates, not a geodesic centroid. It
/// is accurate enough for metropolitan groups spanning a few hundred
/// kilometres and degrades near the antimeridian and the poles.
///
/// Returns `None` for an empty slice rather than a point at `(0, 0)`.
///
/// # Examples
///
/// ```
/// use mesa_core::{GeoPoint, centroid};
///
/// let points = [GeoPoint::from_raw(-12.0, -77.0), GeoPoint::from_raw(-12.1, -77.1)];
/// let center = centroid(&points).expect("non-empty input");
/// assert!((center.latitude() + 12.05).abs() < 1e-9);
/// assert!(centroid(&[]).is_none());
/// ```
#[must_use]
pub fn centroid(points: &[GeoPoint]) -> Option<GeoPoint> {
    let multi: MultiPoint<f64> = points.iter().copied().map(Point::from).collect();
    multi
        .centroid()
        .map(|center| GeoPoint::from_raw(center.y(), center.x()))
}

/// Round a distance to two decimal places for display.
///
/// Aggregates keep full precision; only presentation layers round.
#[expect(
    clippy::float_arithmetic,
    reason = "rounding to hundredths scales by 100"
)]
#[must_use]
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}
