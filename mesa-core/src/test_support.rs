//! Test-only, in-memory `CalculationStore` implementation used by unit and
//! behaviour tests.

use std::convert::Infallible;

use chrono::Utc;

use crate::{CalculationResult, CalculationStore, StoredCalculation};

/// In-memory `CalculationStore` that never fails.
///
/// Identifiers are assigned sequentially from 1 and never reused.
#[derive(Debug)]
pub struct MemoryCalculationStore {
    rows: Vec<StoredCalculation>,
    next_id: u64,
}

impl Default for MemoryCalculationStore {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

impl MemoryCalculationStore {
    /// Number of stored calculations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store holds no calculations.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl CalculationStore for MemoryCalculationStore {
    type Error = Infallible;

    fn save(&mut self, result: &CalculationResult) -> Result<StoredCalculation, Self::Error> {
        let stored = StoredCalculation {
            id: self.next_id,
            created_at: Utc::now(),
            result: result.clone(),
        };
        self.next_id = self.next_id.saturating_add(1);
        self.rows.push(stored.clone());
        Ok(stored)
    }

    fn get(&self, id: u64) -> Result<Option<StoredCalculation>, Self::Error> {
        Ok(self.rows.iter().find(|row| row.id == id).cloned())
    }

    fn list_for_group(&self, group_id: u64) -> Result<Vec<StoredCalculation>, Self::Error> {
        Ok(self
            .rows
            .iter()
            .filter(|row| row.result.group_id() == group_id)
            .cloned()
            .collect())
    }

    fn delete(&mut self, id: u64) -> Result<bool, Self::Error> {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        Ok(self.rows.len() != before)
    }
}
