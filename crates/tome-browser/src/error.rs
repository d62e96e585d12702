//! Error types for the browser facade.

use std::path::PathBuf;

use thiserror::Error;
use tome_bookmarks::BookmarkError;
use tome_model::ModelError;

/// Errors raised while loading the data directory.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The data directory does not exist.
    #[error("data directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// A required data file is missing.
    #[error("data file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// A data file could not be read.
    #[error("failed to read data file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data file is not a valid record array.
    #[error("failed to parse data file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

impl LoadError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::DirectoryNotFound { path } => {
                format!("The data folder {} does not exist.", path.display())
            }
            Self::FileNotFound { path } => format!("{} is missing.", path.display()),
            Self::FileRead { path, .. } => format!("{} could not be read.", path.display()),
            Self::Parse { source, .. } => source.user_message(),
        }
    }
}

/// Errors surfaced by [`crate::Browser`] boundary operations.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Bookmark(#[from] BookmarkError),
}

impl BrowserError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Load(e) => e.user_message(),
            Self::Bookmark(e) => e.user_message(),
        }
    }
}

/// Result type alias for browser operations.
pub type Result<T> = std::result::Result<T, BrowserError>;
