//! SQLite-backed store for calculation history.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use thiserror::Error;

use crate::CalculationResult;

use super::{CalculationStore, StoredCalculation};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS calculations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    group_id INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    payload TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS calculations_by_group ON calculations (group_id, id);
";

/// Error raised when reading or writing persisted calculations.
#[derive(Debug, Error)]
pub enum SqliteCalculationStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating the `calculations` table failed.
    #[error("failed to create calculation schema: {source}")]
    CreateSchema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A result could not be encoded as JSON.
    #[error("failed to encode calculation for group {group_id}: {source}")]
    EncodePayload {
        /// Group the result belongs to.
        group_id: u64,
        /// JSON encoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// A stored payload was not a valid calculation result.
    #[error("failed to decode stored calculation {id}: {source}")]
    InvalidPayload {
        /// Identifier of the row whose payload failed to parse.
        id: u64,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// A stored creation time was not RFC 3339.
    #[error("stored calculation {id} has an invalid creation time: {source}")]
    InvalidTimestamp {
        /// Identifier of the affected row.
        id: u64,
        /// Timestamp parsing failure.
        #[source]
        source: chrono::ParseError,
    },
    /// SQLite assigned a row identifier outside the `u64` range.
    #[error("SQLite returned row id {rowid}, which is not a valid calculation id")]
    InvalidRowId {
        /// The raw row identifier.
        rowid: i64,
    },
    /// Generic SQLite error when reading or writing rows.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Calculation history stored in a single SQLite table.
///
/// Each row keeps the full result as JSON next to its group id, so history
/// queries do not need to decode unrelated groups.
#[derive(Debug)]
pub struct SqliteCalculationStore {
    connection: Connection,
}

impl SqliteCalculationStore {
    /// Open (or create) a store at `path` and ensure the schema exists.
    ///
    /// # Errors
    /// Returns [`SqliteCalculationStoreError::OpenDatabase`] when the file
    /// cannot be opened and [`SqliteCalculationStoreError::CreateSchema`] when
    /// the table cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SqliteCalculationStoreError> {
        let database_path = path.as_ref();
        let connection = Connection::open(database_path).map_err(|source| {
            SqliteCalculationStoreError::OpenDatabase {
                path: database_path.to_path_buf(),
                source,
            }
        })?;
        log::debug!("opened calculation store at {}", database_path.display());
        Self::with_connection(connection)
    }

    /// Open a store that lives only as long as the returned value.
    ///
    /// # Errors
    /// Fails like [`SqliteCalculationStore::open`].
    pub fn open_in_memory() -> Result<Self, SqliteCalculationStoreError> {
        let connection = Connection::open_in_memory().map_err(|source| {
            SqliteCalculationStoreError::OpenDatabase {
                path: PathBuf::from(":memory:"),
                source,
            }
        })?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> Result<Self, SqliteCalculationStoreError> {
        connection
            .execute_batch(SCHEMA)
            .map_err(|source| SqliteCalculationStoreError::CreateSchema { source })?;
        Ok(Self { connection })
    }
}

impl CalculationStore for SqliteCalculationStore {
    type Error = SqliteCalculationStoreError;

    fn save(&mut self, result: &CalculationResult) -> Result<StoredCalculation, Self::Error> {
        let group_id = result.group_id();
        let payload = serde_json::to_string(result)
            .map_err(|source| SqliteCalculationStoreError::EncodePayload { group_id, source })?;
        let created_at = Utc::now();
        self.connection.execute(
            "INSERT INTO calculations (group_id, created_at, payload) VALUES (?1, ?2, ?3)",
            params![group_id, created_at.to_rfc3339(), payload],
        )?;
        let rowid = self.connection.last_insert_rowid();
        let id =
            u64::try_from(rowid).map_err(|_| SqliteCalculationStoreError::InvalidRowId { rowid })?;
        log::debug!("saved calculation {id} for group {group_id}");
        Ok(StoredCalculation {
            id,
            created_at,
            result: result.clone(),
        })
    }

    fn get(&self, id: u64) -> Result<Option<StoredCalculation>, Self::Error> {
        let row = self
            .connection
            .query_row(
                "SELECT id, created_at, payload FROM calculations WHERE id = ?1",
                params![id],
                read_row,
            )
            .optional()?;
        row.as_ref().map(decode_row).transpose()
    }

    fn list_for_group(&self, group_id: u64) -> Result<Vec<StoredCalculation>, Self::Error> {
        let mut statement = self.connection.prepare(
            "SELECT id, created_at, payload FROM calculations WHERE group_id = ?1 ORDER BY id",
        )?;
        let rows = statement.query_map(params![group_id], read_row)?;
        let mut stored = Vec::new();
        for row in rows {
            stored.push(decode_row(&row?)?);
        }
        Ok(stored)
    }

    fn delete(&mut self, id: u64) -> Result<bool, Self::Error> {
        let removed = self
            .connection
            .execute("DELETE FROM calculations WHERE id = ?1", params![id])?;
        if removed > 0 {
            log::debug!("deleted calculation {id}");
        }
        Ok(removed > 0)
    }
}

struct RawRow {
    id: u64,
    created_at: String,
    payload: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        id: row.get(0)?,
        created_at: row.get(1)?,
        payload: row.get(2)?,
    })
}

fn decode_row(raw: &RawRow) -> Result<StoredCalculation, SqliteCalculationStoreError> {
    let id = raw.id;
    let created_at = DateTime::parse_from_rfc3339(&raw.created_at)
        .map_err(|source| SqliteCalculationStoreError::InvalidTimestamp { id, source })?
        .with_timezone(&Utc);
    let result = serde_json::from_str(&raw.payload)
        .map_err(|source| SqliteCalculationStoreError::InvalidPayload { id, source })?;
    Ok(StoredCalculation {
        id,
        created_at,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Address, CalculationRequest, GeoPoint, Member, Venue, calculate};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    fn result_for(group_id: u64) -> CalculationResult {
        let request = CalculationRequest {
            group_id,
            members: vec![
                Member::new(1, "Ana", Address::Known(GeoPoint::from_raw(-12.0, -77.0))),
                Member::without_address(2, "Luis"),
            ],
            venue: Venue::new(
                2,
                "KFC - Miraflores",
                Address::Known(GeoPoint::from_raw(-12.1265, -77.0305)),
            ),
        };
        calculate(&request).expect("calculation")
    }

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    #[rstest]
    fn saved_calculations_survive_reopening(temp_dir: TempDir) {
        let path = temp_dir.path().join("history.db");
        let result = result_for(7);
        let saved = {
            let mut store = SqliteCalculationStore::open(&path).expect("open store");
            store.save(&result).expect("save")
        };

        let store = SqliteCalculationStore::open(&path).expect("reopen store");
        let found = store.get(saved.id).expect("get").expect("stored row");
        assert_eq!(found.id, saved.id);
        assert_eq!(found.result.group_id(), 7);
        assert_eq!(found.result.venue_name(), "KFC - Miraflores");
        assert_eq!(found.result.viability_score(), saved.result.viability_score());
        assert_eq!(found.result.facts().ranked_members().len(), 2);
        assert_eq!(found.result, result);
        assert_eq!(found, saved);
    }

    #[rstest]
    fn history_is_scoped_to_a_group() {
        let mut store = SqliteCalculationStore::open_in_memory().expect("open store");
        store.save(&result_for(1)).expect("save");
        store.save(&result_for(2)).expect("save");
        store.save(&result_for(1)).expect("save");

        let ids: Vec<u64> = store
            .list_for_group(1)
            .expect("list")
            .iter()
            .map(|row| row.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(store.list_for_group(99).expect("list").is_empty());
    }

    #[rstest]
    fn delete_removes_only_the_matching_row() {
        let mut store = SqliteCalculationStore::open_in_memory().expect("open store");
        let first = store.save(&result_for(1)).expect("save");
        let second = store.save(&result_for(1)).expect("save");

        assert!(store.delete(first.id).expect("delete"));
        assert!(!store.delete(first.id).expect("delete"));
        assert!(store.get(first.id).expect("get").is_none());
        assert!(store.get(second.id).expect("get").is_some());
    }

    #[rstest]
    fn corrupt_payload_is_reported(temp_dir: TempDir) {
        let path = temp_dir.path().join("history.db");
        let mut store = SqliteCalculationStore::open(&path).expect("open store");
        let saved = store.save(&result_for(1)).expect("save");
        store
            .connection
            .execute(
                "UPDATE calculations SET payload = 'not json' WHERE id = ?1",
                params![saved.id],
            )
            .expect("corrupt row");

        let error = store.get(saved.id).expect_err("corrupt payload should fail");
        assert!(matches!(
            error,
            SqliteCalculationStoreError::InvalidPayload { id, .. } if id == saved.id
        ));
    }

    #[rstest]
    fn missing_parent_directory_is_reported(temp_dir: TempDir) {
        let path = temp_dir.path().join("absent").join("history.db");
        let error = SqliteCalculationStore::open(&path).expect_err("missing directory");
        assert!(matches!(
            error,
            SqliteCalculationStoreError::OpenDatabase { .. }
                | SqliteCalculationStoreError::CreateSchema { .. }
        ));
    }
}
