use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for core/domain/storage layers.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Stored data for `{key}` is corrupt: {message}")]
    Corrupt { key: String, message: String },
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, TrackerError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] TrackerError),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        TrackerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Storage(err.to_string())
    }
}

impl TrackerError {
    pub(crate) fn corrupt(key: &str, err: serde_json::Error) -> Self {
        TrackerError::Corrupt {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}
