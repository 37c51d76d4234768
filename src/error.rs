//! Error types for the posture monitor library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic I/O error with description
    #[error("I/O error: {0}")]
    IoError(String),

    /// Pose source could not be opened or read
    #[error("Pose source error: {0}")]
    SourceError(String),

    /// Pose source never signalled readiness
    #[error("Pose source not ready after {0} ms")]
    StartupTimeout(u64),

    /// A recorded frame could not be decoded
    #[error("Frame parse error: {0}")]
    FrameParse(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
