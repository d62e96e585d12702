//! Error types for logging and settings.

use std::path::PathBuf;
use thiserror::Error;

/// Error raised while initialising logging or saving settings.
#[derive(Debug, Error)]
pub enum CommonError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A global tracing subscriber is already installed.
    #[error("Logging is already initialised")]
    LoggingAlreadyInitialized {
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },

    /// Settings could not be serialized to TOML.
    #[error("Failed to serialize settings")]
    SettingsSerialization {
        #[source]
        source: toml::ser::Error,
    },
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, CommonError>;
