//! Server configuration.
//!
//! Built from the `serve` command line (flags with `DIABETES_API_*` env
//! fallbacks) and handed to [`crate::api::run_server`].

use std::num::NonZeroU32;
use std::path::PathBuf;

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default prediction log database file.
pub const DEFAULT_DATABASE: &str = "diabetes_logs.redb";

/// Default scaler artifact file.
pub const DEFAULT_SCALER: &str = "scaler.json";

/// Default classifier artifact file.
pub const DEFAULT_MODEL: &str = "diabetes_model.json";

/// Where prediction logs are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDatabase {
    /// redb file on disk.
    File(PathBuf),
    /// Process memory only; lost on shutdown.
    InMemory,
}

/// Everything `run_server` needs.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database: LogDatabase,
    pub scaler_path: PathBuf,
    pub model_path: PathBuf,
    /// Bearer token required on PUT/DELETE `/logs/{id}` when set.
    pub api_key: Option<String>,
    /// Requests per second allowed on `/predict` when set.
    pub rate_limit: Option<NonZeroU32>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: LogDatabase::File(PathBuf::from(DEFAULT_DATABASE)),
            scaler_path: PathBuf::from(DEFAULT_SCALER),
            model_path: PathBuf::from(DEFAULT_MODEL),
            api_key: None,
            rate_limit: None,
        }
    }
}

impl ServerConfig {
    /// Drop an empty API key so it never enables auth by accident.
    #[must_use]
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.trim().is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(
            config.database,
            LogDatabase::File(PathBuf::from("diabetes_logs.redb"))
        );
        assert!(config.api_key.is_none());
        assert!(config.rate_limit.is_none());
    }

    #[test]
    fn blank_api_key_disables_auth() {
        let config = ServerConfig::default().with_api_key(Some("  ".to_string()));
        assert!(config.api_key.is_none());

        let config = ServerConfig::default().with_api_key(Some("secret".to_string()));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }
}
