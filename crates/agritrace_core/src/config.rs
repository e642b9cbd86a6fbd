//! Process configuration resolved from the environment.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Every field has a default; resolution only fails on malformed values.

use crate::logging::{default_log_level, normalize_level};
use crate::wallet::bounded::DEFAULT_WALLET_TIMEOUT;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "AGRITRACE_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "AGRITRACE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "AGRITRACE_LOG_DIR";
pub const ENV_WALLET_TIMEOUT_MS: &str = "AGRITRACE_WALLET_TIMEOUT_MS";

const DEFAULT_DB_FILE_NAME: &str = "agritrace.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    InvalidWalletTimeout(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{ENV_LOG_LEVEL}: {message}"),
            Self::InvalidWalletTimeout(raw) => write!(
                f,
                "{ENV_WALLET_TIMEOUT_MS} must be a positive integer of milliseconds, got `{raw}`"
            ),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub wallet_timeout: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            wallet_timeout: DEFAULT_WALLET_TIMEOUT,
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through `lookup`, one call per variable name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.set_log_level(&level)?;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        if let Some(raw) = read(ENV_WALLET_TIMEOUT_MS) {
            config.wallet_timeout = match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => return Err(ConfigError::InvalidWalletTimeout(raw)),
            };
        }
        Ok(config)
    }

    pub fn set_log_level(&mut self, level: &str) -> Result<(), ConfigError> {
        self.log_level = normalize_level(level).map_err(ConfigError::InvalidLogLevel)?;
        Ok(())
    }
}
