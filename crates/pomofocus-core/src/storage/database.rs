//! SQLite-backed persistence.
//!
//! Provides:
//! - The dataset, stored as JSON in a key-value table
//! - Host state (persisted timer engine, active target) in the same table
//! - An append-only log of completed phases for daily statistics

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{data_dir, migrations, DataStore};
use crate::error::StorageError;
use crate::model::Dataset;
use crate::timer::TimerMode;

/// Key under which the dataset JSON is stored.
pub const DATASET_KEY: &str = "dataset";

/// One completed phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub id: i64,
    pub mode: TimerMode,
    pub duration_secs: u64,
    pub project_id: Option<String>,
    pub subtask_id: Option<String>,
    pub completed_at: DateTime<Utc>,
}

/// Aggregated phase history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTotals {
    pub work_phases: u64,
    pub work_secs: u64,
    pub break_phases: u64,
    pub break_secs: u64,
}

/// SQLite database for dataset storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data dir>/pomofocus.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        Self::open_at(&data_dir()?.join("pomofocus.db"))
    }

    /// Open (or create) the database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        migrations::migrate(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        migrations::migrate(&db.conn)?;
        Ok(db)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Read a JSON value from the kv store.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.kv_get(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Write a JSON value to the kv store.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.kv_set(key, &json)?;
        Ok(())
    }

    /// Append a completed phase to the history.
    pub fn record_phase(
        &self,
        mode: TimerMode,
        duration_secs: u64,
        project_id: Option<&str>,
        subtask_id: Option<&str>,
        completed_at: DateTime<Utc>,
    ) -> Result<i64, rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO phase_log (mode, duration_secs, project_id, subtask_id, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                mode.as_str(),
                i64::try_from(duration_secs).unwrap_or(i64::MAX),
                project_id,
                subtask_id,
                completed_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Phases completed at or after `since`, oldest first.
    pub fn phases_since(&self, since: DateTime<Utc>) -> Result<Vec<PhaseRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, mode, duration_secs, project_id, subtask_id, completed_at
             FROM phase_log
             WHERE completed_at >= ?1
             ORDER BY completed_at, id",
        )?;
        let rows = stmt.query_map(params![since.to_rfc3339()], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, mode, duration_secs, project_id, subtask_id, completed_at) = row?;
            let Ok(mode) = TimerMode::from_str(&mode) else {
                tracing::warn!(id, mode = %mode, "skipping phase_log row with unknown mode");
                continue;
            };
            let completed_at = DateTime::parse_from_rfc3339(&completed_at)
                .map_err(|e| StorageError::Rejected(format!("phase_log row {id}: {e}")))?
                .with_timezone(&Utc);
            records.push(PhaseRecord {
                id,
                mode,
                duration_secs: u64::try_from(duration_secs).unwrap_or(0),
                project_id,
                subtask_id,
                completed_at,
            });
        }
        Ok(records)
    }

    /// Totals of phases completed at or after `since`.
    pub fn phase_totals_since(&self, since: DateTime<Utc>) -> Result<PhaseTotals, StorageError> {
        let totals = self
            .phases_since(since)?
            .into_iter()
            .fold(PhaseTotals::default(), |mut acc, record| {
                if record.mode.is_break() {
                    acc.break_phases += 1;
                    acc.break_secs += record.duration_secs;
                } else {
                    acc.work_phases += 1;
                    acc.work_secs += record.duration_secs;
                }
                acc
            });
        Ok(totals)
    }
}

impl DataStore for Database {
    fn load(&self) -> Result<Option<Dataset>, StorageError> {
        self.get_json(DATASET_KEY)
    }

    fn save(&self, dataset: &Dataset) -> Result<(), StorageError> {
        self.set_json(DATASET_KEY, dataset)
    }
}
