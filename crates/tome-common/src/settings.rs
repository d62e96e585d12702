//! Application settings - persisted user preferences.
//!
//! Serialized to TOML in the platform config directory. Loading never
//! fails: a missing or unreadable file yields defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::error::{CommonError, Result};
use crate::logging::{LogConfig, LogFormat};

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "Tome";
const APPLICATION: &str = "Tome";

// =============================================================================
// ROOT SETTINGS
// =============================================================================

/// Application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub navigation: NavigationSettings,
    pub bookmarks: BookmarkSettings,
    pub search: SearchSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from the default path.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from a specific path.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed settings");
            Self::default()
        })
    }

    /// Save settings to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CommonError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|source| CommonError::SettingsSerialization { source })?;

        std::fs::write(path, content).map_err(|source| CommonError::Io {
            operation: "write",
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

/// Navigation behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    /// Overlay kinds that a navigation target replaces instead of stacking
    /// on top of.
    pub replaced_overlays: Vec<String>,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            replaced_overlays: vec!["menu".to_string()],
        }
    }
}

/// Bookmark storage and drag behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookmarkSettings {
    /// Directory holding `bookmarks.json`; the platform data directory when
    /// unset.
    pub storage_dir: Option<PathBuf>,

    /// Minimum interval between two drag reorder commits.
    pub drag_throttle_ms: u64,
}

impl Default for BookmarkSettings {
    fn default() -> Self {
        Self {
            storage_dir: None,
            drag_throttle_ms: 50,
        }
    }
}

impl BookmarkSettings {
    pub fn drag_throttle(&self) -> Duration {
        Duration::from_millis(self.drag_throttle_ms)
    }

    /// The configured storage directory, or the platform data directory.
    pub fn resolved_storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(|| {
            directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}

/// Search tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Minimum similarity (0..=1) for a hit.
    pub threshold: f64,
    /// Maximum hits per record set.
    pub limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            limit: 50,
        }
    }
}

/// Logging output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level name (error, warn, info, debug, trace).
    pub level: String,
    pub format: LogFormat,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

impl LoggingSettings {
    /// Build a [`LogConfig`]; unknown level names fall back to `info`.
    pub fn to_log_config(&self) -> LogConfig {
        let level = self.level.parse::<Level>().unwrap_or_else(|_| {
            tracing::warn!(level = %self.level, "unknown log level, using info");
            Level::INFO
        });
        LogConfig::default()
            .with_level(level)
            .with_format(self.format)
            .with_log_file(self.file.clone())
    }
}
