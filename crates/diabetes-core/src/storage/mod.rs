//! # Storage Module
//!
//! Persistence for prediction logs behind the `LogStore` trait.
//!
//! Implementations:
//! - `MemoryLogStore`: BTreeMap behind a mutex (tests, `--in-memory`)
//! - `RedbLogStore`: redb embedded database, one transaction per call
//!
//! Ids start at 1 and are never reused, even after a delete.

mod memory;
mod redb_logs;

pub use memory::MemoryLogStore;
pub use redb_logs::RedbLogStore;

use crate::patient::MeasurementUpdate;
use crate::record::{LogId, NewPrediction, PredictionRecord};
use thiserror::Error;

/// First id handed out by an empty store.
pub const FIRST_LOG_ID: u64 = 1;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors raised by a log store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with this id.
    #[error("log {0} not found")]
    NotFound(LogId),

    /// The embedded database failed.
    #[error("database error: {0}")]
    Database(#[from] redb::Error),

    /// A row could not be encoded or decoded.
    #[error("record encoding error: {0}")]
    Codec(#[from] postcard::Error),

    /// A row decoded but holds an impossible value.
    #[error("stored log {id} is corrupt: {reason}")]
    Corrupt { id: LogId, reason: &'static str },

    /// Another thread panicked while holding the store lock.
    #[error("log store lock poisoned")]
    Poisoned,

    /// The id counter reached u64::MAX.
    #[error("log id space exhausted")]
    IdExhausted,
}

macro_rules! impl_from_redb {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for StoreError {
                fn from(err: $source) -> Self {
                    Self::Database(redb::Error::from(err))
                }
            }
        )*
    };
}

impl_from_redb!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

// =============================================================================
// LOGSTORE TRAIT
// =============================================================================

/// CRUD operations on the prediction log table.
pub trait LogStore: Send + Sync {
    /// Store a new prediction and return it with its assigned id.
    fn insert(&self, new: NewPrediction) -> Result<PredictionRecord, StoreError>;

    /// All records in ascending id order.
    fn list(&self) -> Result<Vec<PredictionRecord>, StoreError>;

    /// Fetch one record.
    fn get(&self, id: LogId) -> Result<Option<PredictionRecord>, StoreError>;

    /// Replace the measurement fields of a record.
    ///
    /// Fails with `StoreError::NotFound` if the id is absent.
    fn update(&self, id: LogId, update: &MeasurementUpdate)
    -> Result<PredictionRecord, StoreError>;

    /// Remove a record permanently.
    ///
    /// Fails with `StoreError::NotFound` if the id is absent.
    fn delete(&self, id: LogId) -> Result<(), StoreError>;

    /// Number of stored records.
    fn len(&self) -> Result<usize, StoreError>;

    /// Check if the store holds no records.
    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

// =============================================================================
// TESTS
// =============================================================================
