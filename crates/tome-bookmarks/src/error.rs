//! Bookmark error types.
//!
//! Collection operations themselves never fail; these errors only come out
//! of the storage boundary and share-code decoding.

use std::path::PathBuf;
use thiserror::Error;

/// Bookmark persistence or share-code error.
#[derive(Debug, Error)]
pub enum BookmarkError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete bookmark save")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored collections are not an object of string arrays.
    #[error("Malformed bookmark data")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },

    /// Collections could not be serialized.
    #[error("Failed to serialize bookmarks")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// A share code is not valid base64.
    #[error("Share code is not valid base64")]
    ShareCodeEncoding {
        #[source]
        source: base64::DecodeError,
    },

    /// A share code does not unescape to UTF-8 text.
    #[error("Share code text is not valid UTF-8")]
    ShareCodeText {
        #[source]
        source: std::str::Utf8Error,
    },

    /// A share code decoded to something other than collections.
    #[error("Share code does not contain bookmark collections")]
    ShareCodeFormat {
        #[source]
        source: serde_json::Error,
    },

    /// The storage backend refused the write.
    #[error("Bookmark storage unavailable: {reason}")]
    Unavailable { reason: String },
}

impl BookmarkError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the bookmark file at {}", operation, path.display()),
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save bookmarks to {}. Please check disk space and permissions.",
                target_path.display()
            ),
            Self::Malformed { .. } => {
                "The saved bookmarks were unreadable and have been reset.".to_string()
            }
            Self::Serialization { .. } => {
                "An error occurred while saving the bookmarks.".to_string()
            }
            Self::ShareCodeEncoding { .. }
            | Self::ShareCodeText { .. }
            | Self::ShareCodeFormat { .. } => {
                "Invalid share code.".to_string()
            }
            Self::Unavailable { reason } => format!("Bookmarks could not be saved: {reason}"),
        }
    }
}

/// Result type alias for bookmark operations.
pub type Result<T> = std::result::Result<T, BookmarkError>;
