//! # HTTP API
//!
//! axum router for the diabetes risk service.
//!
//! ```text
//! GET    /            health string
//! GET    /health      liveness + version
//! POST   /predict     score a patient, store the result     [rate limit]
//! GET    /logs        every stored prediction
//! GET    /logs/{id}   one stored prediction
//! PUT    /logs/{id}   replace the measurements of a log     [api key]
//! DELETE /logs/{id}   remove a log                          [api key]
//! ```
//!
//! CORS is fully permissive. Every response body is a JSON envelope with a
//! `status` field, except `/logs` and `/logs/{id}` which return records.

pub mod error;
pub mod guard;
pub mod handlers;
pub mod types;

use crate::artifacts::{self, ArtifactLoadError};
use crate::config::{LogDatabase, ServerConfig};
use crate::service::PredictionService;
use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};
use diabetes_core::{LogStore, MemoryLogStore, RedbLogStore, StoreError};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

// =============================================================================
// STATE
// =============================================================================

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub api_key: Option<Arc<str>>,
    pub limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl AppState {
    /// State with auth and rate limiting disabled.
    pub fn new(service: Arc<PredictionService>) -> Self {
        Self {
            service,
            api_key: None,
            limiter: None,
        }
    }

    /// Require `Authorization: Bearer <key>` on log mutations.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<Arc<str>>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Limit `/predict` to `per_second` requests per second.
    #[must_use]
    pub fn with_rate_limit(mut self, per_second: NonZeroU32) -> Self {
        self.limiter = Some(Arc::new(RateLimiter::direct(Quota::per_second(per_second))));
        self
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the router with all routes and layers.
pub fn create_router(state: AppState) -> Router {
    let api_key = middleware::from_fn_with_state(state.clone(), guard::require_api_key);
    let rate_limit = middleware::from_fn_with_state(state.clone(), guard::rate_limit);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict).route_layer(rate_limit))
        .route("/logs", get(handlers::list_logs))
        .route(
            "/logs/{id}",
            put(handlers::update_log)
                .delete(handlers::delete_log)
                .route_layer(api_key)
                .get(handlers::get_log),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

// =============================================================================
// SERVER
// =============================================================================

/// Startup or serving failure.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Artifact(#[from] ArtifactLoadError),

    #[error("failed to open log database: {0}")]
    Store(#[from] StoreError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn open_store(database: &LogDatabase) -> Result<Arc<dyn LogStore>, StoreError> {
    let store: Arc<dyn LogStore> = match database {
        LogDatabase::File(path) => {
            info!(path = %path.display(), "opening prediction log database");
            Arc::new(RedbLogStore::create(path)?)
        }
        LogDatabase::InMemory => {
            info!("using in-memory prediction log store");
            Arc::new(MemoryLogStore::new())
        }
    };
    Ok(store)
}

/// Load artifacts, open storage, and serve until Ctrl-C.
///
/// Artifact or database failures abort before the listener is bound.
pub async fn run_server(config: ServerConfig) -> Result<(), ServeError> {
    let predictor = artifacts::load_predictor(&config.scaler_path, &config.model_path)?;
    let store = open_store(&config.database)?;
    let service = Arc::new(PredictionService::new(predictor, store));

    let mut state = AppState::new(service);
    if let Some(key) = config.api_key.as_deref() {
        info!("API key required for log updates and deletes");
        state = state.with_api_key(key);
    }
    if let Some(per_second) = config.rate_limit {
        info!(per_second = per_second.get(), "rate limiting /predict");
        state = state.with_rate_limit(per_second);
    }

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!(addr = %listener.local_addr()?, "diabetes API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
