use crate::Address;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A candidate place for the group to meet.
///
/// Venues come from an external search collaborator. One without a known
/// address cannot be scored.
///
/// # Examples
/// ```
/// use mesa_core::{Address, GeoPoint, Venue};
///
/// let venue = Venue::new(
///     1,
///     "KFC - San Isidro",
///     Address::Known(GeoPoint::from_raw(-12.0904, -77.0396)),
/// );
/// assert_eq!(venue.name, "KFC - San Isidro");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Venue {
    /// Identifier assigned by the venue source.
    pub id: u64,
    /// Display name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Location, if known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: Address,
}

impl Venue {
    /// Construct a venue.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, address: Address) -> Self {
        Self {
            id,
            name: name.into(),
            address,
        }
    }
}
