//! Runtime configuration loaded from a JSON file, with built-in defaults.

use std::{
    env, fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::trivia::{DEFAULT_API_URL, DEFAULT_PREFETCH_JITTER};

/// Default location on disk where the game looks for its JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/millionaire.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "MILLIONAIRE_CONFIG_PATH";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STORE_PATH: &str = "millionaire_store.json";
const DEFAULT_LOG_PATH: &str = "millionaire.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    pub request_timeout: Duration,
    /// File backing the question cache and request throttle.
    pub store_path: PathBuf,
    pub log_path: PathBuf,
    pub prefetch_jitter: (Duration, Duration),
}

/// Why the configuration file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found")]
    NotFound,
    #[error("failed to read config: {0}")]
    Read(#[source] io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("prefetch jitter range is inverted: min {min} ms > max {max} ms")]
    InvertedJitter { min: u64, max: u64 },
}

/// A resolved configuration together with how it was obtained.
///
/// Loading happens before the log file is known, so the outcome is kept
/// and reported through [`LoadedConfig::log`] once tracing is installed.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: PathBuf,
    pub problem: Option<ConfigError>,
}

impl LoadedConfig {
    pub fn log(&self) {
        match &self.problem {
            None => info!(path = %self.path.display(), "loaded config"),
            Some(ConfigError::NotFound) => info!(
                path = %self.path.display(),
                "config file not found; using built-in defaults"
            ),
            Some(err) => warn!(
                path = %self.path.display(),
                error = %err,
                "unusable config; falling back to defaults"
            ),
        }
    }
}

impl AppConfig {
    /// Load the configuration from disk, falling back to defaults when the
    /// file is missing or unusable.
    pub fn load() -> LoadedConfig {
        Self::load_from(resolve_config_path())
    }

    pub fn load_from(path: PathBuf) -> LoadedConfig {
        match Self::read(&path) {
            Ok(config) => LoadedConfig {
                config,
                path,
                problem: None,
            },
            Err(err) => LoadedConfig {
                config: Self::default(),
                path,
                problem: Some(err),
            },
        }
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::Read(err),
        })?;
        let raw: RawConfig = serde_json::from_str(&contents).map_err(ConfigError::Parse)?;
        raw.try_into()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            prefetch_jitter: DEFAULT_PREFETCH_JITTER,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
    store_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
    prefetch_jitter_ms: Option<RawJitter>,
}

#[derive(Debug, Deserialize)]
struct RawJitter {
    min: u64,
    max: u64,
}

impl TryFrom<RawConfig> for AppConfig {
    type Error = ConfigError;

    fn try_from(value: RawConfig) -> Result<Self, Self::Error> {
        let prefetch_jitter = match value.prefetch_jitter_ms {
            Some(RawJitter { min, max }) if min > max => {
                return Err(ConfigError::InvertedJitter { min, max });
            }
            Some(RawJitter { min, max }) => {
                (Duration::from_millis(min), Duration::from_millis(max))
            }
            None => DEFAULT_PREFETCH_JITTER,
        };

        Ok(Self {
            api_url: value.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            request_timeout: Duration::from_secs(
                value.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            store_path: value
                .store_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            log_path: value
                .log_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH)),
            prefetch_jitter,
        })
    }
}

fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
