//! Runtime configuration loaded from environment variables.
//!
//! # Responsibility
//! - Resolve the journal directory, logging options, watcher time and cleanup policy.
//!
//! # Invariants
//! - Every variable is optional; unset values fall back to documented defaults.
//! - Malformed values are rejected rather than silently replaced.

use crate::logging::default_log_level;
use crate::service::lifecycle::CleanupPolicy;
use chrono::NaiveTime;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_NOTES_DIR: &str = "PYNO_NOTES_DIR";
pub const ENV_LOG_LEVEL: &str = "PYNO_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PYNO_LOG_DIR";
pub const ENV_WATCH_AT: &str = "PYNO_WATCH_AT";
pub const ENV_DELETE_BLANK_ORPHANS: &str = "PYNO_DELETE_BLANK_ORPHANS";

const DEFAULT_NOTES_DIR: &str = "~/ll";
const DEFAULT_WATCH_AT: &str = "00:10";

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Journal root holding `YYYY/MM/YYYY-MM-DD.md` files.
    pub notes_dir: PathBuf,
    pub log_level: String,
    /// Rolling log file directory. `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
    /// Local time of day after which the watcher runs the daily job.
    pub watch_at: NaiveTime,
    pub cleanup: CleanupPolicy,
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let notes_dir = expand_tilde(
            lookup(ENV_NOTES_DIR)
                .as_deref()
                .unwrap_or(DEFAULT_NOTES_DIR),
        );
        let log_level = lookup(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());
        let log_dir = lookup(ENV_LOG_DIR)
            .filter(|value| !value.trim().is_empty())
            .map(|value| expand_tilde(&value));
        let watch_at = parse_watch_at(lookup(ENV_WATCH_AT).as_deref().unwrap_or(DEFAULT_WATCH_AT))?;
        let delete_blank_without_predecessor = match lookup(ENV_DELETE_BLANK_ORPHANS) {
            Some(value) => parse_bool(ENV_DELETE_BLANK_ORPHANS, &value)?,
            None => CleanupPolicy::default().delete_blank_without_predecessor,
        };

        Ok(Self {
            notes_dir,
            log_level,
            log_dir,
            watch_at,
            cleanup: CleanupPolicy {
                delete_blank_without_predecessor,
            },
        })
    }
}

/// Configuration error with the offending variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => write!(f, "invalid value for {key}: `{value}`"),
        }
    }
}

impl Error for ConfigError {}

/// Parses an `HH:MM` time of day.
pub fn parse_watch_at(value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| ConfigError::InvalidValue {
        key: ENV_WATCH_AT,
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

/// Expand ~ or ~/ prefix to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"))
    } else if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path))
    } else {
        PathBuf::from(path)
    }
}
