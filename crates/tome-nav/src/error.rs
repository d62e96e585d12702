//! Navigation error types.

use thiserror::Error;

/// Error raised at the history persistence boundary.
///
/// Stack and bridge operations themselves never fail.
#[derive(Debug, Error)]
pub enum NavError {
    /// A stored history snapshot failed shape validation.
    #[error("Malformed history snapshot")]
    MalformedSnapshot {
        #[source]
        source: serde_json::Error,
    },

    /// A history snapshot could not be serialized.
    #[error("Failed to serialize history snapshot")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for navigation operations.
pub type Result<T> = std::result::Result<T, NavError>;
