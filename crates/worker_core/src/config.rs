//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Load an optional `.env` file, then read `WORKER_*` variables.
//! - Provide defaults for development runs.
//!
//! # Invariants
//! - `log_dir`, when set, is absolute (the logging backend requires it).
//! - Without `log_dir`, logs go to an absolute `logs` directory beside the
//!   database file.
//! - Loading never panics; malformed values become `ConfigError`.

use crate::db::DEFAULT_BUSY_TIMEOUT;
use crate::logging::default_log_level;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DB_PATH_VAR: &str = "WORKER_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "WORKER_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "WORKER_LOG_DIR";
pub const BUSY_TIMEOUT_VAR: &str = "WORKER_DB_BUSY_TIMEOUT_SECS";

const DEFAULT_DB_FILE_NAME: &str = "worker.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { var: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { var, value } => write!(f, "invalid value `{value}` for {var}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub busy_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

impl AppConfig {
    /// Loads `.env` (if present) and resolves settings from the process
    /// environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            info!(
                "event=config_load module=config status=ok dotenv={}",
                path.display()
            );
        }
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolves settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |var| lookup(var).filter(|value: &String| !value.trim().is_empty());

        let db_path = non_empty(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let log_level = non_empty(LOG_LEVEL_VAR)
            .map(|value| value.trim().to_ascii_lowercase())
            .unwrap_or(defaults.log_level);

        let log_dir = match non_empty(LOG_DIR_VAR) {
            Some(value) => {
                let path = PathBuf::from(value.trim());
                if !path.is_absolute() {
                    return Err(ConfigError::InvalidValue {
                        var: LOG_DIR_VAR,
                        value,
                    });
                }
                Some(path)
            }
            None => None,
        };

        let busy_timeout = match non_empty(BUSY_TIMEOUT_VAR) {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidValue {
                    var: BUSY_TIMEOUT_VAR,
                    value,
                })?,
            None => defaults.busy_timeout,
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir,
            busy_timeout,
        })
    }

    /// Absolute log directory: `log_dir` when configured, otherwise `logs`
    /// next to the database file.
    pub fn resolved_log_dir(&self) -> std::io::Result<PathBuf> {
        match &self.log_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.log_dir_beside_db(&std::env::current_dir()?)),
        }
    }

    fn log_dir_beside_db(&self, cwd: &Path) -> PathBuf {
        let db_path = cwd.join(&self.db_path);
        db_path.parent().unwrap_or(cwd).join(DEFAULT_LOG_DIR_NAME)
    }
}
