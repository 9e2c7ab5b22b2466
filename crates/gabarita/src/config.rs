//! Application configuration.
//!
//! Settings are resolved in three layers, later ones winning:
//!
//! 1. Built-in defaults.
//! 2. Build-time flags captured with `option_env!` when the crate is
//!    compiled (`GABARITA_API_BASE_URL=... cargo build`).
//! 3. Runtime environment variables with the same names
//!    ([`AppConfig::from_env`]) or a JSON document
//!    ([`AppConfig::from_json`]).

use std::path::PathBuf;

use gabarita_client::ClientConfig;
use gabarita_games::GameRunnerConfig;
use gabarita_session::SessionConfig;
use serde::{Deserialize, Serialize};

use crate::GabaritaError;

pub const ENV_API_BASE_URL: &str = "GABARITA_API_BASE_URL";
pub const ENV_BYPASS_AUTH: &str = "GABARITA_BYPASS_AUTH";
pub const ENV_STORAGE_PATH: &str = "GABARITA_STORAGE_PATH";
pub const ENV_LOG: &str = "GABARITA_LOG";
pub const ENV_GAME_SEED: &str = "GABARITA_GAME_SEED";

const BUILD_API_BASE_URL: Option<&str> = option_env!("GABARITA_API_BASE_URL");
const BUILD_BYPASS_AUTH: Option<&str> = option_env!("GABARITA_BYPASS_AUTH");
const BUILD_STORAGE_PATH: Option<&str> = option_env!("GABARITA_STORAGE_PATH");
const BUILD_LOG: Option<&str> = option_env!("GABARITA_LOG");

/// Everything [`App`](crate::App) needs to start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub session: SessionConfig,
    pub games: GameRunnerConfig,
    /// Session file. `None` keeps the session in memory only.
    pub storage_path: Option<PathBuf>,
    /// Default tracing directive when `RUST_LOG` is unset.
    pub log: String,
    /// Seed for game randomness. `None` seeds from the OS.
    pub game_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut client = ClientConfig::default();
        if let Some(url) = BUILD_API_BASE_URL {
            client.base_url = url.to_string();
        }
        Self {
            client,
            session: SessionConfig {
                bypass_auth: BUILD_BYPASS_AUTH.is_some_and(is_enabled),
            },
            games: GameRunnerConfig::default(),
            storage_path: BUILD_STORAGE_PATH.map(PathBuf::from),
            log: BUILD_LOG.unwrap_or("info").to_string(),
            game_seed: None,
        }
    }
}

impl AppConfig {
    /// Build-time defaults overridden by the process environment.
    ///
    /// # Errors
    /// [`GabaritaError::Config`] when a variable is set but unusable.
    pub fn from_env() -> Result<Self, GabaritaError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build-time defaults overridden by whatever `lookup` returns.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GabaritaError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            let url = url.trim();
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(GabaritaError::Config(format!(
                    "{ENV_API_BASE_URL} must be an http(s) URL, got {url:?}"
                )));
            }
            config.client.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(flag) = lookup(ENV_BYPASS_AUTH) {
            config.session.bypass_auth = is_enabled(&flag);
        }
        if let Some(path) = lookup(ENV_STORAGE_PATH) {
            config.storage_path = (!path.trim().is_empty()).then(|| PathBuf::from(path.trim()));
        }
        if let Some(log) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            config.log = log;
        }
        if let Some(seed) = lookup(ENV_GAME_SEED) {
            let seed = seed.trim().parse().map_err(|e| {
                GabaritaError::Config(format!("{ENV_GAME_SEED} is not a number: {e}"))
            })?;
            config.game_seed = Some(seed);
        }

        if config.session.bypass_auth {
            tracing::warn!("auth bypass is enabled by configuration");
        }
        Ok(config)
    }

    /// Reads a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, GabaritaError> {
        serde_json::from_str(json).map_err(|e| GabaritaError::Config(e.to_string()))
    }
}

fn is_enabled(flag: &str) -> bool {
    matches!(flag.trim().to_ascii_lowercase().as_str(), "true" | "1")
}
