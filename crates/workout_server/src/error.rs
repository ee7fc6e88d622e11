use thiserror::Error;
use workout_core::db::DbError;

use crate::config::ConfigError;

/// Failures that stop the server process.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Database setup failed: {0}")]
    Database(#[from] DbError),

    #[error("Server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
