use std::io;
use std::time::Duration;

use thiserror::Error;

/// Raised when there is nothing to compute statistics over.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyInputError {
    #[error("No valid commands found in the history.")]
    NoCommands,

    #[error("No keywords found in the history.")]
    NoTokens,
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error(transparent)]
    EmptyInput(#[from] EmptyInputError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Could not retrieve shell history: {0}")]
    Unavailable(String),

    #[error("History command timed out after {0:?}")]
    Timeout(Duration),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid value for {name}: {value}")]
    InvalidArgument { name: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, HistoryError>;
