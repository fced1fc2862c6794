//! Artifact file loading.
//!
//! Reads the scaler and classifier documents from disk and builds the
//! [`Predictor`]. Any failure here is fatal: the server refuses to start
//! rather than failing on the first request.

use diabetes_core::{ArtifactError, LogisticRegression, Predictor, StandardScaler};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// An artifact file could not be turned into a model component.
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ArtifactError,
    },
}

fn read(path: &Path) -> Result<String, ArtifactLoadError> {
    std::fs::read_to_string(path).map_err(|source| ArtifactLoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the scaler document at `path`.
pub fn load_scaler(path: &Path) -> Result<StandardScaler, ArtifactLoadError> {
    StandardScaler::from_json_str(&read(path)?).map_err(|source| ArtifactLoadError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the classifier document at `path`.
pub fn load_classifier(path: &Path) -> Result<LogisticRegression, ArtifactLoadError> {
    LogisticRegression::from_json_str(&read(path)?).map_err(|source| {
        ArtifactLoadError::Invalid {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Load both artifacts and pair them.
pub fn load_predictor(scaler: &Path, model: &Path) -> Result<Predictor, ArtifactLoadError> {
    let scaler_artifact = load_scaler(scaler)?;
    let classifier = load_classifier(model)?;

    info!(
        scaler = %scaler.display(),
        model = %model.display(),
        "model and scaler loaded"
    );

    Ok(Predictor::new(Arc::new(scaler_artifact), Arc::new(classifier)))
}
