//! JSON artifact formats for the scaler and the classifier.
//!
//! Both documents are produced by the external training process.
//!
//! ```text
//! scaler.json          {"mean": [8 floats], "scale": [8 floats]}
//! diabetes_model.json  {"coefficients": [8 floats], "intercept": float}
//! ```

use super::{ArtifactError, Classifier, InferenceError, Outcome, Scaler};
use crate::patient::{FEATURE_COUNT, FeatureVector};
use serde::{Deserialize, Serialize};

fn check_finite(
    kind: &'static str,
    field: &'static str,
    values: &[f64],
) -> Result<(), ArtifactError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ArtifactError::NonFinite { kind, field })
    }
}

fn check_vector(stage: &'static str, features: &FeatureVector) -> Result<(), InferenceError> {
    match features.named().find(|(_, v)| !v.is_finite()) {
        Some((feature, _)) => Err(InferenceError::NonFinite { stage, feature }),
        None => Ok(()),
    }
}

// =============================================================================
// STANDARD SCALER
// =============================================================================

/// Per-feature standardization: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: [f64; FEATURE_COUNT],
    pub scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    const KIND: &'static str = "scaler";

    /// Parse a scaler document.
    pub fn from_json_str(json: &str) -> Result<Self, ArtifactError> {
        let scaler: Self = serde_json::from_str(json).map_err(|source| ArtifactError::Parse {
            kind: Self::KIND,
            source,
        })?;
        check_finite(Self::KIND, "mean", &scaler.mean)?;
        check_finite(Self::KIND, "scale", &scaler.scale)?;
        Ok(scaler)
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, features: &FeatureVector) -> Result<FeatureVector, InferenceError> {
        check_vector("input", features)?;

        let mut out = [0.0; FEATURE_COUNT];
        for (i, slot) in out.iter_mut().enumerate() {
            // Constant features were fitted with a zero scale.
            let scale = if self.scale[i] == 0.0 {
                1.0
            } else {
                self.scale[i]
            };
            *slot = (features.0[i] - self.mean[i]) / scale;
        }

        let scaled = FeatureVector(out);
        check_vector("scaling", &scaled)?;
        Ok(scaled)
    }
}

// =============================================================================
// LOGISTIC REGRESSION
// =============================================================================

/// Linear classifier: positive when `intercept + coefficients . x > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: [f64; FEATURE_COUNT],
    pub intercept: f64,
}

impl LogisticRegression {
    const KIND: &'static str = "classifier";

    /// Parse a classifier document.
    pub fn from_json_str(json: &str) -> Result<Self, ArtifactError> {
        let model: Self = serde_json::from_str(json).map_err(|source| ArtifactError::Parse {
            kind: Self::KIND,
            source,
        })?;
        check_finite(Self::KIND, "coefficients", &model.coefficients)?;
        check_finite(Self::KIND, "intercept", &[model.intercept])?;
        Ok(model)
    }

    /// Signed distance to the decision boundary.
    #[must_use]
    pub fn decision_function(&self, scaled: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .zip(scaled.values())
            .fold(self.intercept, |acc, (c, x)| acc + c * x)
    }
}

impl Classifier for LogisticRegression {
    fn predict(&self, scaled: &FeatureVector) -> Result<Outcome, InferenceError> {
        check_vector("scaling", scaled)?;

        let score = self.decision_function(scaled);
        if !score.is_finite() {
            return Err(InferenceError::NonFiniteScore);
        }
        Ok(if score > 0.0 {
            Outcome::Positive
        } else {
            Outcome::Negative
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    const SCALER: &str = r#"{
        "mean":  [3.8, 120.9, 69.1, 20.5, 79.8, 32.0, 0.47, 33.2],
        "scale": [3.4, 32.0, 19.4, 16.0, 115.2, 7.9, 0.33, 11.8]
    }"#;

    /// Glucose-only model: positive above 140 with an identity scaler.
    fn glucose_model() -> LogisticRegression {
        LogisticRegression {
            coefficients: [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            intercept: -140.0,
        }
    }

    #[test]
    fn scaler_parses_and_transforms() {
        let scaler = StandardScaler::from_json_str(SCALER).unwrap();
        let features = FeatureVector([3.8, 152.9, 69.1, 20.5, 79.8, 32.0, 0.47, 33.2]);
        let scaled = scaler.transform(&features).unwrap();

        assert!(scaled.values()[0].abs() < 1e-9);
        assert!((scaled.values()[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_scale_treated_as_one() {
        let scaler = StandardScaler {
            mean: [1.0; FEATURE_COUNT],
            scale: [0.0; FEATURE_COUNT],
        };
        let scaled = scaler.transform(&FeatureVector([3.0; FEATURE_COUNT])).unwrap();
        assert_eq!(scaled.values(), &[2.0; FEATURE_COUNT]);
    }

    #[test]
    fn scaler_wrong_dimension_rejected() {
        let err = StandardScaler::from_json_str(r#"{"mean":[1,2],"scale":[1,2]}"#).unwrap_err();
        assert!(matches!(err, ArtifactError::Parse { kind: "scaler", .. }));
    }

    #[test]
    fn scaler_rejects_overflowing_input() {
        let scaler = StandardScaler {
            mean: [0.0; FEATURE_COUNT],
            scale: [1e-300; FEATURE_COUNT],
        };
        let err = scaler
            .transform(&FeatureVector([1e300; FEATURE_COUNT]))
            .unwrap_err();
        assert!(matches!(
            err,
            InferenceError::NonFinite {
                stage: "scaling",
                feature: "pregnancies"
            }
        ));
    }

    #[test]
    fn classifier_parses() {
        let json = r#"{"coefficients":[0.4,1.1,-0.2,0.0,-0.1,0.7,0.3,0.2],"intercept":-0.8}"#;
        let model = LogisticRegression::from_json_str(json).unwrap();
        assert_eq!(model.intercept, -0.8);
    }

    #[test]
    fn classifier_missing_intercept_rejected() {
        let json = r#"{"coefficients":[0,0,0,0,0,0,0,0]}"#;
        assert!(LogisticRegression::from_json_str(json).is_err());
    }

    #[test]
    fn classifier_thresholds_at_zero() {
        let model = glucose_model();
        let high = FeatureVector([0.0, 180.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let low = FeatureVector([0.0, 90.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let boundary = FeatureVector([0.0, 140.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);

        assert_eq!(model.predict(&high).unwrap(), Outcome::Positive);
        assert_eq!(model.predict(&low).unwrap(), Outcome::Negative);
        assert_eq!(model.predict(&boundary).unwrap(), Outcome::Negative);
    }
}
