use std::cell::{Cell, RefCell};

use super::DataStore;
use crate::error::StorageError;
use crate::model::Dataset;

/// In-process store. Useful for embedding hosts that persist elsewhere,
/// and for exercising save failures.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: RefCell<Option<Dataset>>,
    saves: Cell<usize>,
    fail_saves: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with `dataset`.
    pub fn with_dataset(dataset: Dataset) -> Self {
        Self {
            saved: RefCell::new(Some(dataset)),
            ..Self::default()
        }
    }

    /// Make every following `save` fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn snapshot(&self) -> Option<Dataset> {
        self.saved.borrow().clone()
    }
}

impl DataStore for MemoryStore {
    fn load(&self) -> Result<Option<Dataset>, StorageError> {
        Ok(self.saved.borrow().clone())
    }

    fn save(&self, dataset: &Dataset) -> Result<(), StorageError> {
        if self.fail_saves.get() {
            return Err(StorageError::Rejected("memory store is read-only".into()));
        }
        *self.saved.borrow_mut() = Some(dataset.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
