//! Persistence backends for the collection map.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::collection::CollectionMap;
use crate::error::{BookmarkError, Result};

/// File name used by [`FileStorage::in_dir`].
pub const BOOKMARKS_FILE: &str = "bookmarks.json";

/// Load/save contract for the collection map.
///
/// `load` returns `Ok(None)` when nothing has been stored yet and
/// [`BookmarkError::Malformed`] when the stored value fails validation.
pub trait CollectionStorage {
    fn load(&self) -> Result<Option<CollectionMap>>;
    fn save(&mut self, map: &CollectionMap) -> Result<()>;
}

fn parse(json: &str) -> Result<CollectionMap> {
    serde_json::from_str(json).map_err(|source| BookmarkError::Malformed { source })
}

fn serialize(map: &CollectionMap) -> Result<String> {
    serde_json::to_string(map).map_err(|source| BookmarkError::Serialization { source })
}

// =============================================================================
// MEMORY
// =============================================================================

/// Keeps the serialized map in memory.
///
/// Stores the JSON text rather than the map so the validation path is the
/// same as for files. Writes can be switched off to exercise save failures.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    value: Option<String>,
    read_only: bool,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with raw stored text.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Reject (or accept again) every save.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Raw stored text.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl CollectionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<CollectionMap>> {
        self.value.as_deref().map(parse).transpose()
    }

    fn save(&mut self, map: &CollectionMap) -> Result<()> {
        if self.read_only {
            return Err(BookmarkError::Unavailable {
                reason: "storage is read-only".to_string(),
            });
        }
        self.value = Some(serialize(map)?);
        self.saves += 1;
        Ok(())
    }
}

// =============================================================================
// FILE
// =============================================================================

/// Stores the map as a JSON file, written atomically.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at `dir/bookmarks.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(BOOKMARKS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CollectionStorage for FileStorage {
    fn load(&self) -> Result<Option<CollectionMap>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(BookmarkError::Io {
                    operation: "read",
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        parse(&json).map(Some)
    }

    /// Write to a temp file next to the target, then rename over it.
    fn save(&mut self, map: &CollectionMap) -> Result<()> {
        let json = serialize(map)?;
        let temp_path = self.path.with_extension("json.tmp");

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| BookmarkError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = File::create(&temp_path).map_err(|e| BookmarkError::Io {
            operation: "create",
            path: temp_path.clone(),
            source: e,
        })?;
        file.write_all(json.as_bytes())
            .map_err(|e| BookmarkError::Io {
                operation: "write",
                path: temp_path.clone(),
                source: e,
            })?;
        file.sync_all().map_err(|e| BookmarkError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, &self.path).map_err(|e| BookmarkError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: self.path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %self.path.display(), "saved bookmarks");
        Ok(())
    }
}
