mod config;
pub mod database;
mod memory;
pub mod migrations;

pub use config::{Config, NotificationsConfig, ReportingConfig, TimerConfig};
pub use database::{Database, PhaseRecord, PhaseTotals, DATASET_KEY};
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StorageError;
use crate::model::Dataset;

/// Load/save contract for the dataset.
///
/// `load` returns `Ok(None)` when nothing has been stored yet.
pub trait DataStore {
    fn load(&self) -> Result<Option<Dataset>, StorageError>;
    fn save(&self, dataset: &Dataset) -> Result<(), StorageError>;
}

impl<S: DataStore + ?Sized> DataStore for &S {
    fn load(&self) -> Result<Option<Dataset>, StorageError> {
        (**self).load()
    }

    fn save(&self, dataset: &Dataset) -> Result<(), StorageError> {
        (**self).save(dataset)
    }
}

/// Returns the data directory.
///
/// `POMOFOCUS_DATA_DIR` wins when set. Otherwise `~/.config/pomofocus/`,
/// or `~/.config/pomofocus-dev/` with `POMOFOCUS_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("POMOFOCUS_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOFOCUS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomofocus-dev")
            } else {
                base_dir.join("pomofocus")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
