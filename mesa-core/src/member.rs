use crate::Address;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A person taking part in a group outing.
///
/// Members without a known address still appear in distance rankings but are
/// left out of the centroid, the average distance and the spread.
///
/// # Examples
/// ```
/// use mesa_core::{Address, GeoPoint, Member};
///
/// let ana = Member::new(1, "Ana", Address::Known(GeoPoint::from_raw(-12.0, -77.0)));
/// let luis = Member::without_address(2, "Luis");
///
/// assert!(ana.address.is_known());
/// assert!(!luis.address.is_known());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Member {
    /// Roster identifier.
    pub id: u64,
    /// Display name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Home location, if recorded.
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: Address,
}

impl Member {
    /// Construct a member with the provided address.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, address: Address) -> Self {
        Self {
            id,
            name: name.into(),
            address,
        }
    }

    /// Construct a member whose address has not been recorded.
    #[must_use]
    pub fn without_address(id: u64, name: impl Into<String>) -> Self {
        Self::new(id, name, Address::Unset)
    }
}
