//! HTTP error mapping.

use super::types::ErrorResponse;
use crate::service::ServiceError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

/// Detail text for unknown log ids.
pub const LOG_NOT_FOUND: &str = "Log not found";

/// Everything a handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    /// Body or path did not match the schema.
    Validation { status: StatusCode, detail: String },
    /// Unknown log id.
    NotFound,
    /// Scaling, inference or storage failed during `/predict`.
    Prediction(String),
    /// Any other unexpected failure.
    Internal(String),
    /// Missing or wrong API key.
    Unauthorized,
    /// Rate limit exceeded.
    RateLimited,
}

impl ApiError {
    /// Wrap a failed prediction, keeping the cause text.
    pub fn prediction(err: ServiceError) -> Self {
        Self::Prediction(err.to_string())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation { status, .. } => *status,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Prediction(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Validation { detail, .. } => detail.clone(),
            Self::NotFound => LOG_NOT_FOUND.to_string(),
            Self::Prediction(cause) => format!("Prediction error: {cause}"),
            Self::Internal(cause) => cause.clone(),
            Self::Unauthorized => "Missing or invalid API key".to_string(),
            Self::RateLimited => "Rate limit exceeded".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();

        if status.is_server_error() {
            error!(%status, %detail, "request failed");
        } else {
            warn!(%status, %detail, "request rejected");
        }

        (status, Json(ErrorResponse::new(detail))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(_) => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diabetes_core::LogId;

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::from(ServiceError::NotFound(LogId(9)));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.detail(), "Log not found");
    }

    #[test]
    fn prediction_error_keeps_cause() {
        let err = ApiError::prediction(ServiceError::Worker("boom".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail(), "Prediction error: worker task failed: boom");
    }
}
