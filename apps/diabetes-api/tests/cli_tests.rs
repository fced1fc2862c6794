//! Integration tests for diabetes-api CLI commands.
//!
//! Uses tempfile for testing file-based operations.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use diabetes_api::cli::{CliError, cmd_check, cmd_init, cmd_logs, open_existing, render_logs};
use diabetes_core::{Gender, LogStore, NewPrediction, Outcome, PatientData};
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Create a temporary directory for tests.
fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write an identity scaler and a glucose-only classifier.
fn write_artifacts(dir: &TempDir) -> (PathBuf, PathBuf) {
    let scaler = dir.path().join("scaler.json");
    let model = dir.path().join("diabetes_model.json");
    std::fs::write(
        &scaler,
        r#"{"mean":[0,0,0,0,0,0,0,0],"scale":[1,1,1,1,1,1,1,1]}"#,
    )
    .unwrap();
    std::fs::write(
        &model,
        r#"{"coefficients":[0,1,0,0,0,0,0,0],"intercept":-140}"#,
    )
    .unwrap();
    (scaler, model)
}

fn sample_patient() -> PatientData {
    PatientData {
        gender: Gender::Male,
        pregnancies: 5,
        glucose: 120.0,
        blood_pressure: 70.0,
        skin_thickness: 20.0,
        insulin: 85.0,
        bmi: 28.5,
        diabetes_pedigree: 0.5,
        age: 33,
    }
}

// =============================================================================
// INIT COMMAND TESTS
// =============================================================================

#[test]
fn test_init_creates_database() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("logs.redb");

    assert!(cmd_init(&db_path, false).is_ok());
    assert!(db_path.exists());
}

#[test]
fn test_init_fails_if_exists_without_force() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("logs.redb");

    cmd_init(&db_path, false).unwrap();

    let result = cmd_init(&db_path, false);
    assert!(matches!(result, Err(CliError::AlreadyExists(_))));
}

#[test]
fn test_init_with_force_wipes_logs() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("logs.redb");

    cmd_init(&db_path, false).unwrap();
    {
        let store = open_existing(&db_path).unwrap();
        store
            .insert(NewPrediction::now(&sample_patient(), Outcome::Negative))
            .unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    cmd_init(&db_path, true).unwrap();
    let store = open_existing(&db_path).unwrap();
    assert!(store.is_empty().unwrap());
}

// =============================================================================
// LOGS COMMAND TESTS
// =============================================================================

#[test]
fn test_logs_requires_existing_database() {
    let temp = create_temp_dir();
    let result = cmd_logs(&temp.path().join("absent.redb"), false);
    assert!(matches!(result, Err(CliError::MissingDatabase(_))));
}

#[test]
fn test_logs_on_empty_database() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("logs.redb");
    cmd_init(&db_path, false).unwrap();

    assert!(cmd_logs(&db_path, false).is_ok());
    assert!(cmd_logs(&db_path, true).is_ok());
}

#[test]
fn test_render_logs_text_and_json() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("logs.redb");
    cmd_init(&db_path, false).unwrap();

    let store = open_existing(&db_path).unwrap();
    store
        .insert(NewPrediction::now(&sample_patient(), Outcome::Positive))
        .unwrap();
    let records = store.list().unwrap();

    let text = render_logs(&records, false).unwrap();
    assert!(text.starts_with("#1 "));
    assert!(text.contains("male pregnancies=0"));
    assert!(text.contains("Positive for Diabetes"));

    let json = render_logs(&records, true).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[0]["id"], 1);
    assert_eq!(parsed[0]["prediction"], 1);

    assert_eq!(render_logs(&[], false).unwrap(), "no prediction logs\n");
}

// =============================================================================
// CHECK COMMAND TESTS
// =============================================================================

#[test]
fn test_check_loads_artifacts() {
    let temp = create_temp_dir();
    let (scaler, model) = write_artifacts(&temp);

    let outcome = cmd_check(&scaler, &model, None).unwrap();
    assert_eq!(outcome, None);
}

#[test]
fn test_check_scores_sample() {
    let temp = create_temp_dir();
    let (scaler, model) = write_artifacts(&temp);
    let sample = r#"{"gender":"female","pregnancies":2,"glucose":190,"blood_pressure":70,
        "skin_thickness":20,"insulin":85,"bmi":28.5,"diabetes_pedigree":0.5,"age":33}"#;

    let outcome = cmd_check(&scaler, &model, Some(sample)).unwrap();
    assert_eq!(outcome, Some(Outcome::Positive));
}

#[test]
fn test_check_missing_artifact_fails() {
    let temp = create_temp_dir();
    let (scaler, _) = write_artifacts(&temp);

    let result = cmd_check(&scaler, &temp.path().join("missing.json"), None);
    assert!(matches!(result, Err(CliError::Artifact(_))));
}

#[test]
fn test_check_invalid_sample_fails() {
    let temp = create_temp_dir();
    let (scaler, model) = write_artifacts(&temp);

    let result = cmd_check(&scaler, &model, Some(r#"{"gender":"robot"}"#));
    assert!(matches!(result, Err(CliError::Json(_))));
}
