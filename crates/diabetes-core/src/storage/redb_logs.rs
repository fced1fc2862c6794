//! redb-backed log store.
//!
//! Layout:
//! - `prediction_logs`: u64 id -> postcard-encoded `PredictionRecord`
//! - `meta`: `"next_id"` -> next id to hand out
//!
//! Every trait call is a single transaction, committed before it returns.

use super::{FIRST_LOG_ID, LogStore, StoreError};
use crate::patient::MeasurementUpdate;
use crate::record::{LogId, NewPrediction, PredictionRecord};
use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
};
use std::path::Path;

const LOGS: TableDefinition<u64, &[u8]> = TableDefinition::new("prediction_logs");
const META: TableDefinition<&str, u64> = TableDefinition::new("meta");
const NEXT_ID_KEY: &str = "next_id";

fn encode(record: &PredictionRecord) -> Result<Vec<u8>, StoreError> {
    Ok(postcard::to_allocvec(record)?)
}

fn decode(key: u64, bytes: &[u8]) -> Result<PredictionRecord, StoreError> {
    let record: PredictionRecord = postcard::from_bytes(bytes)?;
    if record.id.0 != key {
        return Err(StoreError::Corrupt {
            id: LogId(key),
            reason: "row id does not match its key",
        });
    }
    Ok(record)
}

/// Prediction log table stored in a redb file.
pub struct RedbLogStore {
    db: Database,
}

impl std::fmt::Debug for RedbLogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbLogStore").finish_non_exhaustive()
    }
}

impl RedbLogStore {
    /// Open the database at `path`, creating the file and tables if needed.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = Self {
            db: Database::create(path)?,
        };
        store.ensure_tables()?;
        Ok(store)
    }

    /// Open an existing database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = Self {
            db: Database::open(path)?,
        };
        store.ensure_tables()?;
        Ok(store)
    }

    fn ensure_tables(&self) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            txn.open_table(LOGS)?;
            let mut meta = txn.open_table(META)?;
            let missing = meta.get(NEXT_ID_KEY)?.is_none();
            if missing {
                meta.insert(NEXT_ID_KEY, FIRST_LOG_ID)?;
            }
        }
        txn.commit()?;
        Ok(())
    }
}

impl LogStore for RedbLogStore {
    fn insert(&self, new: NewPrediction) -> Result<PredictionRecord, StoreError> {
        let txn = self.db.begin_write()?;
        let record = {
            let mut meta = txn.open_table(META)?;
            let next = meta
                .get(NEXT_ID_KEY)?
                .map(|guard| guard.value())
                .unwrap_or(FIRST_LOG_ID);
            let following = next.checked_add(1).ok_or(StoreError::IdExhausted)?;
            meta.insert(NEXT_ID_KEY, following)?;

            let record = new.into_record(LogId(next));
            let bytes = encode(&record)?;
            let mut logs = txn.open_table(LOGS)?;
            logs.insert(next, bytes.as_slice())?;
            record
        };
        txn.commit()?;
        Ok(record)
    }

    fn list(&self) -> Result<Vec<PredictionRecord>, StoreError> {
        let txn = self.db.begin_read()?;
        let logs = txn.open_table(LOGS)?;

        let mut records = Vec::new();
        for entry in logs.iter()? {
            let (key, value) = entry?;
            records.push(decode(key.value(), value.value())?);
        }
        Ok(records)
    }

    fn get(&self, id: LogId) -> Result<Option<PredictionRecord>, StoreError> {
        let txn = self.db.begin_read()?;
        let logs = txn.open_table(LOGS)?;
        logs.get(id.0)?
            .map(|guard| decode(id.0, guard.value()))
            .transpose()
    }

    fn update(
        &self,
        id: LogId,
        update: &MeasurementUpdate,
    ) -> Result<PredictionRecord, StoreError> {
        let txn = self.db.begin_write()?;
        let updated = {
            let mut logs = txn.open_table(LOGS)?;
            let existing = logs.get(id.0)?.map(|guard| guard.value().to_vec());
            match existing {
                Some(bytes) => {
                    let mut record = decode(id.0, &bytes)?;
                    record.apply_update(update);
                    let bytes = encode(&record)?;
                    logs.insert(id.0, bytes.as_slice())?;
                    Some(record)
                }
                None => None,
            }
        };

        match updated {
            Some(record) => {
                txn.commit()?;
                Ok(record)
            }
            None => {
                txn.abort()?;
                Err(StoreError::NotFound(id))
            }
        }
    }

    fn delete(&self, id: LogId) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        let removed = {
            let mut logs = txn.open_table(LOGS)?;
            logs.remove(id.0)?.is_some()
        };

        if removed {
            txn.commit()?;
            Ok(())
        } else {
            txn.abort()?;
            Err(StoreError::NotFound(id))
        }
    }

    fn len(&self) -> Result<usize, StoreError> {
        let txn = self.db.begin_read()?;
        let logs = txn.open_table(LOGS)?;
        Ok(logs.len()? as usize)
    }
}

// =============================================================================
// TESTS
// =============================================================================
