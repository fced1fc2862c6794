//! # Prediction Records
//!
//! The single persisted entity: one row per successful prediction.
//!
//! Lifecycle:
//! - created by a prediction (id assigned by the store)
//! - measurements replaced by an update (prediction is NOT recomputed)
//! - removed permanently by a delete

use crate::model::Outcome;
use crate::patient::{Gender, MeasurementUpdate, PatientData};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogId(pub u64);

impl std::fmt::Display for LogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A prediction waiting for an identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPrediction {
    /// Patient input with the gender rule already applied.
    pub patient: PatientData,
    pub outcome: Outcome,
    pub timestamp: DateTime<Utc>,
}

impl NewPrediction {
    /// Normalize the patient and stamp the current time.
    #[must_use]
    pub fn now(patient: &PatientData, outcome: Outcome) -> Self {
        Self {
            patient: patient.normalized(),
            outcome,
            timestamp: Utc::now(),
        }
    }

    /// Attach the identifier chosen by the store.
    #[must_use]
    pub fn into_record(self, id: LogId) -> PredictionRecord {
        let p = self.patient.normalized();
        PredictionRecord {
            id,
            gender: p.gender,
            pregnancies: i64::from(p.pregnancies),
            glucose: p.glucose,
            blood_pressure: p.blood_pressure,
            skin_thickness: p.skin_thickness,
            insulin: p.insulin,
            bmi: p.bmi,
            diabetes_pedigree: p.diabetes_pedigree,
            age: p.age,
            prediction: self.outcome,
            timestamp: self.timestamp,
        }
    }
}

/// A stored prediction log row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: LogId,
    pub gender: Gender,
    /// Non-negative at creation; an update may store any value.
    pub pregnancies: i64,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    pub bmi: f64,
    pub diabetes_pedigree: f64,
    pub age: i32,
    pub prediction: Outcome,
    pub timestamp: DateTime<Utc>,
}

impl PredictionRecord {
    /// Overwrite the eight measurement fields.
    ///
    /// `id`, `gender`, `prediction` and `timestamp` are left as they were.
    /// The stored prediction is not recomputed from the new values, and the
    /// gender rule is not re-applied: the supplied pregnancies are kept as is.
    pub fn apply_update(&mut self, update: &MeasurementUpdate) {
        self.pregnancies = update.pregnancies;
        self.glucose = update.glucose;
        self.blood_pressure = update.blood_pressure;
        self.skin_thickness = update.skin_thickness;
        self.insulin = update.insulin;
        self.bmi = update.bmi;
        self.diabetes_pedigree = update.diabetes_pedigree;
        self.age = update.age;
    }
}

// =============================================================================
// TESTS
// =============================================================================
