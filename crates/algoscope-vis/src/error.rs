//! Error types for algoscope-vis.

use thiserror::Error;

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or driving a run.
///
/// A cancelled run is not an error; see
/// [`RunOutcome::Cancelled`](crate::RunOutcome::Cancelled).
#[derive(Debug, Error)]
pub enum Error {
    /// A run is active and the request would disturb it
    #[error("a run is already in progress")]
    AlreadyRunning,

    /// The algorithm rejected its dataset
    #[error(transparent)]
    Algorithm(#[from] algoscope_algorithms::Error),

    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// The drive task or runner thread failed to finish
    #[error("Join error: {0}")]
    Join(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Error::Join(e.to_string())
    }
}
