//! Error types for famcal.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FamCalError {
    /// A single import file could not be parsed at all.
    #[error("Could not parse {file}: {reason}")]
    Format { file: String, reason: String },

    /// An import ran to completion but produced zero events.
    #[error("No events found to import")]
    EmptyImport,

    #[error("Invalid event: {0}")]
    Validation(String),

    /// The request never completed (connection refused, timeout, bad body).
    #[error("Network error: {0}")]
    Network(String),

    /// The event store answered with a non-success status.
    #[error("Event store error ({status}): {message}")]
    Persistence { status: u16, message: String },

    #[error("No event with id {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FamCalError {
    fn from(err: reqwest::Error) -> Self {
        FamCalError::Network(err.to_string())
    }
}

pub type FamCalResult<T> = Result<T, FamCalError>;
