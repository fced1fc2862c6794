//! # Response Module
//!
//! Payloads shared by the HTTP envelope and the CLI output.
//!
//! Every HTTP response carries a `status` field; the constants here are
//! the only two values it takes.

use crate::model::Outcome;
use crate::record::LogId;
use serde::{Deserialize, Serialize};

/// Envelope status for successful calls.
pub const STATUS_SUCCESS: &str = "success";

/// Envelope status for failed calls.
pub const STATUS_ERROR: &str = "error";

/// The `data` payload returned by a prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionSummary {
    /// Numeric label (0 or 1).
    pub prediction: u8,
    /// "Positive for Diabetes" / "Negative for Diabetes".
    pub result: String,
    /// Identifier of the stored log row.
    pub log_id: LogId,
}

impl PredictionSummary {
    /// Build the summary for a stored prediction.
    #[must_use]
    pub fn new(outcome: Outcome, log_id: LogId) -> Self {
        Self {
            prediction: outcome.label(),
            result: outcome.description().to_string(),
            log_id,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_result_follows_label() {
        let positive = PredictionSummary::new(Outcome::Positive, LogId(1));
        assert_eq!(positive.prediction, 1);
        assert_eq!(positive.result, "Positive for Diabetes");

        let negative = PredictionSummary::new(Outcome::Negative, LogId(2));
        assert_eq!(negative.prediction, 0);
        assert_eq!(negative.result, "Negative for Diabetes");
        assert_eq!(negative.log_id, LogId(2));
    }
}
