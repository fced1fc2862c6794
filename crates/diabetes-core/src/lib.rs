//! # Diabetes Core
//!
//! Domain logic for the diabetes risk service.
//!
//! This crate owns everything that does not need a network or a runtime:
//! - Patient input and the fixed eight-feature vector
//! - Scaler / classifier seams plus their JSON artifact formats
//! - The `PredictionRecord` entity
//! - The `LogStore` storage seam (in-memory and redb)
//!
//! The HTTP server and CLI live in `apps/diabetes-api`.

pub mod model;
pub mod patient;
pub mod record;
pub mod response;
pub mod storage;

pub use model::{
    ArtifactError, Classifier, InferenceError, LogisticRegression, Outcome, Predictor, Scaler,
    StandardScaler,
};
pub use patient::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector, Gender, MeasurementUpdate, PatientData};
pub use record::{LogId, NewPrediction, PredictionRecord};
pub use response::{PredictionSummary, STATUS_ERROR, STATUS_SUCCESS};
pub use storage::{FIRST_LOG_ID, LogStore, MemoryLogStore, RedbLogStore, StoreError};
