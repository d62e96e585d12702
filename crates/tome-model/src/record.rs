//! Records: the immutable leaf units of the corpus.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// RECORD ID
// =============================================================================

/// Unique record identifier, typically the record's source path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for RecordId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RecordId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// =============================================================================
// RECORD
// =============================================================================

/// An immutable content unit with a hierarchical location.
///
/// Keys the core does not interpret (casting time, category, challenge
/// rating, ...) are carried through untouched in [`Record::attributes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique identifier.
    pub id: RecordId,

    /// Display title.
    pub title: String,

    /// Segment names from the root down to the containing node.
    #[serde(default)]
    pub path_parts: Vec<String>,

    /// Location of the full content blob (opaque to the core).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Whether this record is the landing document of its own node.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_overview: bool,

    /// Synthetic directory-like aggregate ("category" record).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_dir: bool,

    /// Domain-specific attributes, preserved verbatim.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Record {
    /// Create a plain document record.
    pub fn new(
        id: impl Into<RecordId>,
        title: impl Into<String>,
        path_parts: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            path_parts: path_parts.into_iter().map(Into::into).collect(),
            path: None,
            is_overview: false,
            is_dir: false,
            attributes: Map::new(),
        }
    }

    /// Create a synthetic category record standing in for a directory.
    pub fn category(
        id: impl Into<RecordId>,
        title: impl Into<String>,
        path_parts: Vec<String>,
        path: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            path_parts,
            path,
            is_overview: false,
            is_dir: true,
            attributes: Map::new(),
        }
    }

    /// Mark the record as its node's overview document.
    #[must_use]
    pub fn with_overview(mut self, is_overview: bool) -> Self {
        self.is_overview = is_overview;
        self
    }

    /// Set the content blob location.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach an opaque attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Whether this record stands for a directory rather than a document.
    pub fn is_category(&self) -> bool {
        self.is_dir
    }

    /// Look up a string attribute.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Whether a non-null attribute with this key is present.
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes
            .get(key)
            .is_some_and(|value| !value.is_null() && value.as_str() != Some(""))
    }

    /// The last id segment without its extension (`a/b/Spells.htm` -> `Spells`).
    pub fn file_stem(&self) -> &str {
        let name = self
            .id
            .as_str()
            .rsplit('/')
            .next()
            .unwrap_or_default();
        match name.rfind('.') {
            Some(dot) if dot > 0 => &name[..dot],
            _ => name,
        }
    }
}
