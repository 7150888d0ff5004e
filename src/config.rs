//! Service configuration
//!
//! Every setting resolves with the same priority: environment variable →
//! TOML config file → compiled default. A missing or unreadable config
//! file just means defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5740";
const DEFAULT_DATABASE_FILE: &str = "audiolog.db";
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// On-disk TOML shape; every field optional
#[derive(Debug, Default, Deserialize)]
pub struct TomlConfig {
    pub bind_address: Option<String>,
    pub database_path: Option<PathBuf>,
    /// Per-append store timeout in milliseconds
    pub store_timeout_ms: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_address: String,
    pub database_path: PathBuf,
    /// Upper bound on a single store append before it counts as failed
    pub store_timeout: Duration,
    pub log_level: String,
}

impl ServiceConfig {
    /// Resolve from the process environment and the default config file
    /// location (`~/.config/audiolog/config.toml` or platform equivalent).
    pub fn resolve() -> Self {
        let toml_config = default_config_path()
            .filter(|p| p.exists())
            .and_then(|p| match load_toml_config(&p) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!("Ignoring unreadable config file: {:#}", e);
                    None
                }
            })
            .unwrap_or_default();

        Self::from_sources(&toml_config, |name| std::env::var(name).ok())
    }

    /// Resolution core, parameterized over the env lookup so tests can
    /// script it without mutating the process environment.
    pub fn from_sources(toml_config: &TomlConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let bind_address = env("AUDIOLOG_BIND_ADDRESS")
            .or_else(|| toml_config.bind_address.clone())
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let database_path = env("AUDIOLOG_DATABASE")
            .map(PathBuf::from)
            .or_else(|| toml_config.database_path.clone())
            .unwrap_or_else(default_database_path);

        let store_timeout_ms = env("AUDIOLOG_STORE_TIMEOUT_MS")
            .and_then(|v| match v.parse() {
                Ok(ms) => Some(ms),
                Err(_) => {
                    warn!("AUDIOLOG_STORE_TIMEOUT_MS is not a number, ignoring: {}", v);
                    None
                }
            })
            .or(toml_config.store_timeout_ms)
            .unwrap_or(DEFAULT_STORE_TIMEOUT_MS);

        let log_level =
            env("AUDIOLOG_LOG").unwrap_or_else(|| toml_config.logging.level.clone());

        Self {
            bind_address,
            database_path,
            store_timeout: Duration::from_millis(store_timeout_ms),
            log_level,
        }
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Platform config file location (`~/.config/audiolog/config.toml` on Linux)
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("audiolog").join("config.toml"))
}

/// Platform data directory (`~/.local/share/audiolog/audiolog.db` on Linux)
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("audiolog"))
        .unwrap_or_else(|| PathBuf::from("./audiolog_data"))
        .join(DEFAULT_DATABASE_FILE)
}
