//! # CLI
//!
//! clap-derived command line for the `diabetes-api` binary.
//!
//! ```text
//! diabetes-api [--database PATH] serve  [--host H] [--port P] [--scaler F] [--model F]
//!                                       [--api-key K] [--rate-limit N] [--in-memory]
//! diabetes-api [--database PATH] init   [--force]
//! diabetes-api [--database PATH] logs   [--json]
//! diabetes-api                   check  [--scaler F] [--model F] [--sample JSON]
//! ```
//!
//! Each command is a plain `cmd_*` function so it can be tested without
//! spawning the binary.

use crate::api::{self, ServeError};
use crate::artifacts::{self, ArtifactLoadError};
use crate::config::{
    DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_MODEL, DEFAULT_PORT, DEFAULT_SCALER, LogDatabase,
    ServerConfig,
};
use clap::{Args, Parser, Subcommand};
use diabetes_core::{
    InferenceError, LogStore, Outcome, PatientData, PredictionRecord, RedbLogStore, StoreError,
};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

// =============================================================================
// ARGUMENTS
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "diabetes-api", version, about = "Diabetes risk prediction service")]
pub struct Cli {
    /// Prediction log database file
    #[arg(long, global = true, env = "DIABETES_API_DATABASE", default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Create an empty prediction log database
    Init {
        /// Overwrite an existing database
        #[arg(long)]
        force: bool,
    },
    /// Print stored prediction logs
    Logs {
        /// Print JSON instead of one line per log
        #[arg(long)]
        json: bool,
    },
    /// Load the artifacts and optionally score one sample
    Check(CheckArgs),
}

/// Artifact file locations.
#[derive(Debug, Clone, Args)]
pub struct ArtifactArgs {
    /// Scaler artifact (JSON)
    #[arg(long, env = "DIABETES_API_SCALER", default_value = DEFAULT_SCALER)]
    pub scaler: PathBuf,

    /// Classifier artifact (JSON)
    #[arg(long, env = "DIABETES_API_MODEL", default_value = DEFAULT_MODEL)]
    pub model: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[arg(long, env = "DIABETES_API_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, env = "DIABETES_API_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// Bearer token required for PUT/DELETE on /logs/{id}
    #[arg(long, env = "DIABETES_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Maximum /predict requests per second
    #[arg(long, env = "DIABETES_API_RATE_LIMIT")]
    pub rate_limit: Option<NonZeroU32>,

    /// Keep logs in memory instead of the database file
    #[arg(long)]
    pub in_memory: bool,
}

impl ServeArgs {
    /// Build the server configuration.
    #[must_use]
    pub fn into_config(self, database: &Path) -> ServerConfig {
        let database = if self.in_memory {
            LogDatabase::InMemory
        } else {
            LogDatabase::File(database.to_path_buf())
        };

        ServerConfig {
            host: self.host,
            port: self.port,
            database,
            scaler_path: self.artifacts.scaler,
            model_path: self.artifacts.model,
            api_key: None,
            rate_limit: self.rate_limit,
        }
        .with_api_key(self.api_key)
    }
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// Patient record to score, as JSON
    #[arg(long)]
    pub sample: Option<String>,
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Error)]
pub enum CliError {
    #[error("database already exists: {} (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("database not found: {} (run `init` first)", .0.display())]
    MissingDatabase(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Artifact(#[from] ArtifactLoadError),

    #[error("prediction failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Serve(#[from] ServeError),
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Serve(args) => cmd_serve(&cli.database, args).await,
        Commands::Init { force } => cmd_init(&cli.database, force),
        Commands::Logs { json } => cmd_logs(&cli.database, json),
        Commands::Check(args) => {
            let outcome = cmd_check(
                &args.artifacts.scaler,
                &args.artifacts.model,
                args.sample.as_deref(),
            )?;
            match outcome {
                Some(outcome) => println!(
                    "artifacts OK, sample scored {} ({})",
                    outcome.label(),
                    outcome.description()
                ),
                None => println!("artifacts OK"),
            }
            Ok(())
        }
    }
}

/// Run the HTTP server.
pub async fn cmd_serve(database: &Path, args: ServeArgs) -> Result<(), CliError> {
    api::run_server(args.into_config(database)).await?;
    Ok(())
}

/// Create an empty database file.
pub fn cmd_init(database: &Path, force: bool) -> Result<(), CliError> {
    if database.exists() {
        if !force {
            return Err(CliError::AlreadyExists(database.to_path_buf()));
        }
        std::fs::remove_file(database)?;
    }

    RedbLogStore::create(database)?;
    info!(path = %database.display(), "initialized prediction log database");
    Ok(())
}

/// Open an existing database file.
pub fn open_existing(database: &Path) -> Result<RedbLogStore, CliError> {
    if !database.exists() {
        return Err(CliError::MissingDatabase(database.to_path_buf()));
    }
    Ok(RedbLogStore::open(database)?)
}

/// Print every stored log.
pub fn cmd_logs(database: &Path, json: bool) -> Result<(), CliError> {
    let store = open_existing(database)?;
    let records = store.list()?;
    print!("{}", render_logs(&records, json)?);
    Ok(())
}

/// Format logs as pretty JSON or one line each.
pub fn render_logs(records: &[PredictionRecord], json: bool) -> Result<String, CliError> {
    if json {
        let mut out = serde_json::to_string_pretty(records)?;
        out.push('\n');
        return Ok(out);
    }

    if records.is_empty() {
        return Ok("no prediction logs\n".to_string());
    }

    let mut out = String::new();
    for r in records {
        out.push_str(&format!(
            "#{} {} {} pregnancies={} glucose={} blood_pressure={} skin_thickness={} \
             insulin={} bmi={} diabetes_pedigree={} age={} -> {}\n",
            r.id,
            r.timestamp.to_rfc3339(),
            r.gender,
            r.pregnancies,
            r.glucose,
            r.blood_pressure,
            r.skin_thickness,
            r.insulin,
            r.bmi,
            r.diabetes_pedigree,
            r.age,
            r.prediction.description(),
        ));
    }
    Ok(out)
}

/// Load both artifacts; score `sample` if given.
pub fn cmd_check(
    scaler: &Path,
    model: &Path,
    sample: Option<&str>,
) -> Result<Option<Outcome>, CliError> {
    let predictor = artifacts::load_predictor(scaler, model)?;

    let Some(sample) = sample else {
        return Ok(None);
    };
    let patient: PatientData = serde_json::from_str(sample)?;
    Ok(Some(predictor.predict(&patient.features())?))
}
