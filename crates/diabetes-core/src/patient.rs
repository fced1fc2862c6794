//! # Patient Input
//!
//! The measurements a caller submits for scoring, and the fixed-order
//! feature vector handed to the scaler.
//!
//! Rules applied here:
//! - `gender` is one of "male" / "female" (lowercase, exact)
//! - `pregnancies` on a prediction is unsigned, so a negative count never
//!   deserializes
//! - a male patient always has `pregnancies == 0`, both in the stored
//!   record and in the vector the classifier sees
//! - no bounds on the remaining measurements (negative values pass through)
//! - a [`MeasurementUpdate`] is unbounded, pregnancies included

use serde::{Deserialize, Serialize};

// =============================================================================
// FEATURE VECTOR
// =============================================================================

/// Number of features the scaler and classifier expect.
pub const FEATURE_COUNT: usize = 8;

/// Feature names, in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "pregnancies",
    "glucose",
    "blood_pressure",
    "skin_thickness",
    "insulin",
    "bmi",
    "diabetes_pedigree",
    "age",
];

/// Ordered feature vector fed to the scaler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Borrow the raw values.
    #[must_use]
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Pair each value with its feature name.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

// =============================================================================
// GENDER
// =============================================================================

/// Patient gender as accepted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Lowercase name as stored.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    /// Pregnancy count this gender is allowed to carry.
    #[must_use]
    pub fn effective_pregnancies(self, pregnancies: u32) -> u32 {
        match self {
            Self::Male => 0,
            Self::Female => pregnancies,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// PATIENT DATA
// =============================================================================

/// A patient record submitted for prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientData {
    pub gender: Gender,
    pub pregnancies: u32,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    pub bmi: f64,
    pub diabetes_pedigree: f64,
    pub age: i32,
}

impl PatientData {
    /// Copy of this record with the gender rule applied.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            pregnancies: self.gender.effective_pregnancies(self.pregnancies),
            ..self.clone()
        }
    }

    /// Feature vector in scaler order, built from the normalized record.
    #[must_use]
    pub fn features(&self) -> FeatureVector {
        let p = self.normalized();
        FeatureVector([
            f64::from(p.pregnancies),
            p.glucose,
            p.blood_pressure,
            p.skin_thickness,
            p.insulin,
            p.bmi,
            p.diabetes_pedigree,
            f64::from(p.age),
        ])
    }
}

// =============================================================================
// MEASUREMENT UPDATE
// =============================================================================

/// Replacement values for the eight measurement fields of a stored log.
///
/// Gender, prediction and timestamp are not part of an update. Values are
/// stored as given: no sign check and no gender rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementUpdate {
    pub pregnancies: i64,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    pub bmi: f64,
    pub diabetes_pedigree: f64,
    pub age: i32,
}

// =============================================================================
// TESTS
// =============================================================================
