//! # Model Module
//!
//! The scaler and classifier are opaque to the service: it only needs
//! `transform` and `predict`. Both sit behind traits so the server can be
//! handed any implementation at startup.
//!
//! This module contains:
//! - `Scaler` / `Classifier` traits
//! - `Outcome` (binary label)
//! - `Predictor` (one transform + one inference per call)
//! - JSON artifact formats (`StandardScaler`, `LogisticRegression`)
//!
//! Note: reading artifact files stays in the app layer.
//! This module only parses the document text.

mod artifacts;

pub use artifacts::{LogisticRegression, StandardScaler};

use crate::patient::FeatureVector;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// A scaler or classifier artifact could not be built.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The document is not valid JSON for the expected shape.
    #[error("invalid {kind} artifact: {source}")]
    Parse {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A parameter is NaN or infinite.
    #[error("{kind} artifact has a non-finite {field} value")]
    NonFinite {
        kind: &'static str,
        field: &'static str,
    },
}

/// Scaling or inference failed for one feature vector.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// A feature entered or left a stage as NaN/infinite.
    #[error("non-finite value for feature {feature} after {stage}")]
    NonFinite {
        stage: &'static str,
        feature: &'static str,
    },

    /// The decision score overflowed.
    #[error("classifier score is not finite")]
    NonFiniteScore,

    /// The classifier produced a label outside {0, 1}.
    #[error("classifier returned label {0}, expected 0 or 1")]
    InvalidLabel(i64),
}

// =============================================================================
// TRAITS
// =============================================================================

/// A pre-fitted feature transform.
pub trait Scaler: Send + Sync {
    /// Transform raw features into the space the classifier was trained on.
    fn transform(&self, features: &FeatureVector) -> Result<FeatureVector, InferenceError>;
}

/// A pre-trained binary classifier.
pub trait Classifier: Send + Sync {
    /// Predict the label for an already scaled feature vector.
    fn predict(&self, scaled: &FeatureVector) -> Result<Outcome, InferenceError>;
}

// =============================================================================
// OUTCOME
// =============================================================================

/// Binary classifier label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Outcome {
    Negative,
    Positive,
}

impl Outcome {
    /// Numeric label (0 or 1).
    #[must_use]
    pub fn label(self) -> u8 {
        match self {
            Self::Negative => 0,
            Self::Positive => 1,
        }
    }

    /// Human-readable result string.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Negative => "Negative for Diabetes",
            Self::Positive => "Positive for Diabetes",
        }
    }

    /// Map a raw label back to an outcome.
    pub fn from_label(label: i64) -> Result<Self, InferenceError> {
        match label {
            0 => Ok(Self::Negative),
            1 => Ok(Self::Positive),
            other => Err(InferenceError::InvalidLabel(other)),
        }
    }
}

impl From<Outcome> for u8 {
    fn from(outcome: Outcome) -> Self {
        outcome.label()
    }
}

impl TryFrom<u8> for Outcome {
    type Error = InferenceError;

    fn try_from(label: u8) -> Result<Self, Self::Error> {
        Self::from_label(i64::from(label))
    }
}

// =============================================================================
// PREDICTOR
// =============================================================================

/// Scaler + classifier pair, built once at startup.
#[derive(Clone)]
pub struct Predictor {
    scaler: Arc<dyn Scaler>,
    classifier: Arc<dyn Classifier>,
}

impl Predictor {
    /// Create a predictor from already loaded artifacts.
    pub fn new(scaler: Arc<dyn Scaler>, classifier: Arc<dyn Classifier>) -> Self {
        Self { scaler, classifier }
    }

    /// Scale the features and classify them.
    pub fn predict(&self, features: &FeatureVector) -> Result<Outcome, InferenceError> {
        let scaled = self.scaler.transform(features)?;
        self.classifier.predict(&scaled)
    }
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor").finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::patient::{Gender, PatientData};
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Identity scaler that counts calls.
    #[derive(Default)]
    struct CountingScaler(AtomicUsize);

    impl Scaler for CountingScaler {
        fn transform(&self, features: &FeatureVector) -> Result<FeatureVector, InferenceError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(*features)
        }
    }

    /// Positive when the first feature (pregnancies) is non-zero.
    struct PregnancyClassifier;

    impl Classifier for PregnancyClassifier {
        fn predict(&self, scaled: &FeatureVector) -> Result<Outcome, InferenceError> {
            Outcome::from_label(i64::from(scaled.values()[0] > 0.0))
        }
    }

    #[test]
    fn outcome_labels_and_descriptions() {
        assert_eq!(Outcome::Positive.label(), 1);
        assert_eq!(Outcome::Negative.label(), 0);
        assert_eq!(Outcome::Positive.description(), "Positive for Diabetes");
        assert_eq!(Outcome::Negative.description(), "Negative for Diabetes");
    }

    #[test]
    fn outcome_rejects_other_labels() {
        assert!(matches!(
            Outcome::from_label(2),
            Err(InferenceError::InvalidLabel(2))
        ));
        assert!(serde_json::from_str::<Outcome>("3").is_err());
        assert_eq!(serde_json::to_string(&Outcome::Positive).unwrap(), "1");
    }

    #[test]
    fn predictor_runs_one_transform_per_call() {
        let scaler = Arc::new(CountingScaler::default());
        let predictor = Predictor::new(scaler.clone(), Arc::new(PregnancyClassifier));

        let patient = PatientData {
            gender: Gender::Male,
            pregnancies: 4,
            glucose: 100.0,
            blood_pressure: 60.0,
            skin_thickness: 10.0,
            insulin: 50.0,
            bmi: 22.0,
            diabetes_pedigree: 0.2,
            age: 40,
        };

        // Male override means the classifier never sees the 4.
        let outcome = predictor.predict(&patient.features()).unwrap();
        assert_eq!(outcome, Outcome::Negative);
        assert_eq!(scaler.0.load(Ordering::SeqCst), 1);
    }

    proptest! {
        #[test]
        fn description_matches_label(label in 0i64..=1) {
            let outcome = Outcome::from_label(label).unwrap();
            let positive = outcome.description() == "Positive for Diabetes";
            prop_assert_eq!(positive, outcome.label() == 1);
        }
    }
}
