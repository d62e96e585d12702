//! Model error types.

use thiserror::Error;

/// Error raised while loading record data.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A record set could not be parsed.
    #[error("Failed to parse record set '{set}'")]
    Parse {
        set: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ModelError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Parse { set, source } => format!(
                "The '{}' data could not be read (line {}, column {}).",
                set,
                source.line(),
                source.column()
            ),
        }
    }
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
