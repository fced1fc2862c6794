//! Request/response envelopes for the HTTP API.
//!
//! Request bodies reuse the core types directly (`PatientData`,
//! `MeasurementUpdate`); only the response wrappers live here.

use diabetes_core::{LogId, PredictionSummary, STATUS_ERROR, STATUS_SUCCESS};
use serde::{Deserialize, Serialize};

/// Status + message, used by `/` and `DELETE /logs/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: message.into(),
        }
    }
}

/// Liveness response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Successful prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub status: String,
    pub message: String,
    pub data: PredictionSummary,
}

impl PredictResponse {
    pub fn success(data: PredictionSummary) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: "Prediction successful.".to_string(),
            data,
        }
    }
}

/// Successful update of a stored log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub status: String,
    pub message: String,
    pub updated_log_id: LogId,
}

impl UpdateResponse {
    pub fn success(id: LogId) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: format!("Log {id} updated successfully."),
            updated_log_id: id,
        }
    }
}

/// Error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            detail: detail.into(),
        }
    }
}
