//! Persistence for calculation results.
//!
//! The `CalculationStore` trait keeps a history of [`CalculationResult`]
//! snapshots. Results are immutable once saved; the store only assigns an
//! identifier and a creation time.

use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::CalculationResult;

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteCalculationStore, SqliteCalculationStoreError};

/// A calculation result together with its persistence metadata.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct StoredCalculation {
    /// Store-assigned identifier, starting at 1.
    pub id: u64,
    /// When the store accepted the result.
    pub created_at: DateTime<Utc>,
    /// The saved result.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub result: CalculationResult,
}

/// Append-mostly storage for calculation results.
///
/// # Examples
///
/// ```rust
/// use chrono::Utc;
/// use mesa_core::{CalculationResult, CalculationStore, StoredCalculation};
///
/// #[derive(Default)]
/// struct VecStore {
///     rows: Vec<StoredCalculation>,
/// }
///
/// impl CalculationStore for VecStore {
///     type Error = std::convert::Infallible;
///
///     fn save(&mut self, result: &CalculationResult) -> Result<StoredCalculation, Self::Error> {
///         let stored = StoredCalculation {
///             id: self.rows.len() as u64 + 1,
///             created_at: Utc::now(),
///             result: result.clone(),
///         };
///         self.rows.push(stored.clone());
///         Ok(stored)
///     }
///
///     fn get(&self, id: u64) -> Result<Option<StoredCalculation>, Self::Error> {
///         Ok(self.rows.iter().find(|row| row.id == id).cloned())
///     }
///
///     fn list_for_group(&self, group_id: u64) -> Result<Vec<StoredCalculation>, Self::Error> {
///         Ok(self
///             .rows
///             .iter()
///             .filter(|row| row.result.group_id() == group_id)
///             .cloned()
///             .collect())
///     }
///
///     fn delete(&mut self, id: u64) -> Result<bool, Self::Error> {
///         let before = self.rows.len();
///         self.rows.retain(|row| row.id != id);
///         Ok(self.rows.len() != before)
///     }
/// }
///
/// let store = VecStore::default();
/// assert!(store.get(1).expect("infallible").is_none());
/// ```
pub trait CalculationStore {
    /// Error raised by the backing storage.
    type Error;

    /// Persist a result and return it with its assigned identifier.
    ///
    /// # Errors
    /// Returns the backend error when the write fails.
    fn save(&mut self, result: &CalculationResult) -> Result<StoredCalculation, Self::Error>;

    /// Fetch a stored calculation by identifier.
    ///
    /// # Errors
    /// Returns the backend error when the read fails.
    fn get(&self, id: u64) -> Result<Option<StoredCalculation>, Self::Error>;

    /// List every calculation for a group, oldest first.
    ///
    /// # Errors
    /// Returns the backend error when the read fails.
    fn list_for_group(&self, group_id: u64) -> Result<Vec<StoredCalculation>, Self::Error>;

    /// Remove a stored calculation. Returns `false` when nothing matched.
    ///
    /// # Errors
    /// Returns the backend error when the write fails.
    fn delete(&mut self, id: u64) -> Result<bool, Self::Error>;
}
