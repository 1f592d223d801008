//! Optional locations for group members and venues.

use std::num::FpCategory;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::GeoPoint;

/// Where a member lives or a venue sits, if known.
///
/// `Unset` is distinct from a point at `(0, 0)`. A `Known` point on the
/// equator at the prime meridian is a real location as far as the engine is
/// concerned. In JSON, `null` or a missing field decodes to `Unset`.
///
/// # Examples
///
/// ```
/// use mesa_core::{Address, GeoPoint};
///
/// let home = Address::Known(GeoPoint::from_raw(-12.0, -77.0));
/// assert!(home.is_known());
/// assert_eq!(Address::from_defaulted(0.0, 0.0), Address::Unset);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "Option<GeoPoint>", into = "Option<GeoPoint>")
)]
pub enum Address {
    /// A concrete coordinate.
    Known(GeoPoint),
    /// No address has been recorded.
    #[default]
    Unset,
}

impl Address {
    /// Interpret coordinates from a source that fills missing addresses with
    /// zeroes.
    ///
    /// Exactly `(0, 0)` becomes [`Address::Unset`]; anything else is kept as
    /// given, including invalid values, which fail later at first use.
    #[must_use]
    pub const fn from_defaulted(latitude: f64, longitude: f64) -> Self {
        if is_zero(latitude) && is_zero(longitude) {
            Self::Unset
        } else {
            Self::Known(GeoPoint::from_raw(latitude, longitude))
        }
    }

    /// The recorded point, if any.
    #[must_use]
    pub const fn point(&self) -> Option<GeoPoint> {
        match self {
            Self::Known(point) => Some(*point),
            Self::Unset => None,
        }
    }

    /// Report whether a point has been recorded.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Map a literal `(0, 0)` point to [`Address::Unset`].
    ///
    /// Applies the [`Address::from_defaulted`] rule to an already decoded
    /// address.
    #[must_use]
    pub const fn origin_as_unset(self) -> Self {
        match self {
            Self::Known(point) => Self::from_defaulted(point.latitude(), point.longitude()),
            Self::Unset => Self::Unset,
        }
    }
}

const fn is_zero(value: f64) -> bool {
    matches!(value.classify(), FpCategory::Zero)
}

impl From<Option<GeoPoint>> for Address {
    fn from(point: Option<GeoPoint>) -> Self {
        point.map_or(Self::Unset, Self::Known)
    }
}

impl From<Address> for Option<GeoPoint> {
    fn from(address: Address) -> Self {
        address.point()
    }
}

impl From<GeoPoint> for Address {
    fn from(point: GeoPoint) -> Self {
        Self::Known(point)
    }
}
