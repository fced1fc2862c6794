//! Route handlers.

use super::AppState;
use super::error::ApiError;
use super::types::{HealthResponse, MessageResponse, PredictResponse, UpdateResponse};
use crate::service::{PredictionService, ServiceError};
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use diabetes_core::{
    FIRST_LOG_ID, LogId, MeasurementUpdate, PatientData, PredictionRecord, PredictionSummary,
    STATUS_SUCCESS,
};
use std::sync::Arc;

/// Run a service call on the blocking pool.
async fn run_blocking<T, F>(service: &Arc<PredictionService>, op: F) -> Result<T, ServiceError>
where
    T: Send + 'static,
    F: FnOnce(&PredictionService) -> Result<T, ServiceError> + Send + 'static,
{
    let service = Arc::clone(service);
    tokio::task::spawn_blocking(move || op(&service))
        .await
        .map_err(|e| ServiceError::Worker(e.to_string()))?
}

/// Map a path id onto a log id. Ids below the first one can never exist.
fn log_id(raw: Result<Path<i64>, PathRejection>) -> Result<LogId, ApiError> {
    let Path(raw) = raw?;
    u64::try_from(raw)
        .ok()
        .filter(|&id| id >= FIRST_LOG_ID)
        .map(LogId)
        .ok_or(ApiError::NotFound)
}

/// GET /
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::success(
        "✅ Diabetes Prediction API is running.",
    ))
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: STATUS_SUCCESS.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PatientData>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(patient) = payload?;

    let record = run_blocking(&state.service, move |service| service.predict(&patient))
        .await
        .map_err(ApiError::prediction)?;

    let summary = PredictionSummary::new(record.prediction, record.id);
    Ok(Json(PredictResponse::success(summary)))
}

/// GET /logs
pub async fn list_logs(
    State(state): State<AppState>,
) -> Result<Json<Vec<PredictionRecord>>, ApiError> {
    let records = run_blocking(&state.service, |service| service.list_logs()).await?;
    Ok(Json(records))
}

/// GET /logs/{id}
pub async fn get_log(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<PredictionRecord>, ApiError> {
    let id = log_id(id)?;
    let record = run_blocking(&state.service, move |service| service.get_log(id)).await?;
    Ok(Json(record))
}

/// PUT /logs/{id}
pub async fn update_log(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<MeasurementUpdate>, JsonRejection>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let id = log_id(id)?;
    let Json(update) = payload?;

    let record = run_blocking(&state.service, move |service| {
        service.update_log(id, &update)
    })
    .await?;

    Ok(Json(UpdateResponse::success(record.id)))
}

/// DELETE /logs/{id}
pub async fn delete_log(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = log_id(id)?;

    run_blocking(&state.service, move |service| service.delete_log(id)).await?;

    Ok(Json(MessageResponse::success(format!(
        "Log {id} deleted successfully."
    ))))
}
