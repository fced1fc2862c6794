//! # Prediction Service
//!
//! Ties the loaded [`Predictor`] to a [`LogStore`]. Built once at startup
//! and shared by every request handler.
//!
//! All methods are blocking (inference + storage); the HTTP layer runs
//! them on the blocking pool.

use diabetes_core::{
    InferenceError, LogId, LogStore, MeasurementUpdate, NewPrediction, PatientData,
    PredictionRecord, Predictor, StoreError,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced by the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Inference(#[from] InferenceError),

    #[error("log {0} not found")]
    NotFound(LogId),

    #[error("{0}")]
    Store(StoreError),

    /// The blocking task running the operation died.
    #[error("worker task failed: {0}")]
    Worker(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Prediction + log CRUD operations.
pub struct PredictionService {
    predictor: Predictor,
    store: Arc<dyn LogStore>,
}

impl std::fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionService")
            .field("predictor", &self.predictor)
            .finish_non_exhaustive()
    }
}

impl PredictionService {
    /// Create a service from its injected dependencies.
    pub fn new(predictor: Predictor, store: Arc<dyn LogStore>) -> Self {
        Self { predictor, store }
    }

    /// Score one patient and store the result.
    ///
    /// The gender rule is applied before scoring, so the classifier and the
    /// stored row see the same pregnancy count.
    pub fn predict(&self, patient: &PatientData) -> Result<PredictionRecord, ServiceError> {
        let features = patient.features();
        let outcome = self.predictor.predict(&features)?;
        let record = self.store.insert(NewPrediction::now(patient, outcome))?;

        info!(
            log_id = %record.id,
            gender = %record.gender,
            prediction = outcome.label(),
            "prediction stored"
        );
        Ok(record)
    }

    /// Every stored log, in storage order.
    pub fn list_logs(&self) -> Result<Vec<PredictionRecord>, ServiceError> {
        let records = self.store.list()?;
        debug!(count = records.len(), "listed prediction logs");
        Ok(records)
    }

    /// One stored log.
    pub fn get_log(&self, id: LogId) -> Result<PredictionRecord, ServiceError> {
        self.store.get(id)?.ok_or(ServiceError::NotFound(id))
    }

    /// Replace the measurements of a stored log.
    ///
    /// The stored prediction is kept as computed at creation time.
    pub fn update_log(
        &self,
        id: LogId,
        update: &MeasurementUpdate,
    ) -> Result<PredictionRecord, ServiceError> {
        let record = self.store.update(id, update)?;
        info!(log_id = %id, "prediction log updated");
        Ok(record)
    }

    /// Remove a stored log permanently.
    pub fn delete_log(&self, id: LogId) -> Result<(), ServiceError> {
        self.store.delete(id)?;
        info!(log_id = %id, "prediction log deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use diabetes_core::{
        FEATURE_COUNT, Gender, LogisticRegression, MemoryLogStore, Outcome, StandardScaler,
    };

    fn service() -> PredictionService {
        let scaler = StandardScaler {
            mean: [0.0; FEATURE_COUNT],
            scale: [1.0; FEATURE_COUNT],
        };
        let model = LogisticRegression {
            coefficients: [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            intercept: -140.0,
        };
        PredictionService::new(
            Predictor::new(Arc::new(scaler), Arc::new(model)),
            Arc::new(MemoryLogStore::new()),
        )
    }

    fn patient(gender: Gender, pregnancies: u32, glucose: f64) -> PatientData {
        PatientData {
            gender,
            pregnancies,
            glucose,
            blood_pressure: 70.0,
            skin_thickness: 20.0,
            insulin: 85.0,
            bmi: 28.5,
            diabetes_pedigree: 0.5,
            age: 33,
        }
    }

    #[test]
    fn predict_stores_normalized_record() {
        let service = service();
        let record = service.predict(&patient(Gender::Male, 5, 120.0)).unwrap();

        assert_eq!(record.pregnancies, 0);
        assert_eq!(record.prediction, Outcome::Negative);
        assert_eq!(service.list_logs().unwrap(), vec![record]);
    }

    #[test]
    fn predict_positive_case() {
        let service = service();
        let record = service.predict(&patient(Gender::Female, 3, 190.0)).unwrap();
        assert_eq!(record.prediction, Outcome::Positive);
        assert_eq!(record.pregnancies, 3);
    }

    #[test]
    fn missing_log_maps_to_not_found() {
        let service = service();
        assert!(matches!(
            service.delete_log(LogId(42)),
            Err(ServiceError::NotFound(LogId(42)))
        ));
        assert!(matches!(
            service.get_log(LogId(42)),
            Err(ServiceError::NotFound(_))
        ));
    }
}
