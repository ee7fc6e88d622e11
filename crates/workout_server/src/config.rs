//! Environment-driven server configuration.
//!
//! Values are read once at startup. Unset variables fall back to defaults;
//! values that are set but unparsable fail startup.

use std::{env, path::PathBuf};

use thiserror::Error;
use workout_core::default_log_level;

pub const PORT_VAR: &str = "WORKOUT_PORT";
pub const DB_PATH_VAR: &str = "WORKOUT_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "WORKOUT_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "WORKOUT_LOG_DIR";

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_DB_PATH: &str = "workouts.sqlite3";
const IN_MEMORY_DB: &str = ":memory:";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key} value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub db: DbLocation,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match non_empty(lookup(PORT_VAR)) {
            Some(value) => value.parse::<u16>().map_err(|err| ConfigError::Invalid {
                key: PORT_VAR,
                reason: format!("{err}"),
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let db = match non_empty(lookup(DB_PATH_VAR)).as_deref() {
            Some(IN_MEMORY_DB) => DbLocation::Memory,
            Some(path) => DbLocation::File(PathBuf::from(path)),
            None => DbLocation::File(PathBuf::from(DEFAULT_DB_PATH)),
        };

        let log_level =
            non_empty(lookup(LOG_LEVEL_VAR)).unwrap_or_else(|| default_log_level().to_string());

        Ok(Self {
            port,
            db,
            log_level,
            log_dir: non_empty(lookup(LOG_DIR_VAR)),
        })
    }

    pub fn address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
