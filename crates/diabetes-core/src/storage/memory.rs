//! In-memory log store.

use super::{FIRST_LOG_ID, LogStore, StoreError};
use crate::patient::MeasurementUpdate;
use crate::record::{LogId, NewPrediction, PredictionRecord};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
struct Inner {
    records: BTreeMap<LogId, PredictionRecord>,
    next_id: u64,
}

/// Log store kept entirely in process memory.
#[derive(Debug)]
pub struct MemoryLogStore {
    inner: Mutex<Inner>,
}

impl Default for MemoryLogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLogStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                records: BTreeMap::new(),
                next_id: FIRST_LOG_ID,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl LogStore for MemoryLogStore {
    fn insert(&self, new: NewPrediction) -> Result<PredictionRecord, StoreError> {
        let mut inner = self.lock()?;
        let id = LogId(inner.next_id);
        inner.next_id = inner.next_id.checked_add(1).ok_or(StoreError::IdExhausted)?;

        let record = new.into_record(id);
        inner.records.insert(id, record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<PredictionRecord>, StoreError> {
        Ok(self.lock()?.records.values().cloned().collect())
    }

    fn get(&self, id: LogId) -> Result<Option<PredictionRecord>, StoreError> {
        Ok(self.lock()?.records.get(&id).cloned())
    }

    fn update(
        &self,
        id: LogId,
        update: &MeasurementUpdate,
    ) -> Result<PredictionRecord, StoreError> {
        let mut inner = self.lock()?;
        let record = inner
            .records
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        record.apply_update(update);
        Ok(record.clone())
    }

    fn delete(&self, id: LogId) -> Result<(), StoreError> {
        self.lock()?
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_contract() {
        crate::storage::tests::exercise_store(&MemoryLogStore::new());
    }
}
