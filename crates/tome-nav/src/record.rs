//! Snapshots mirrored into the host's history list.

use serde::{Deserialize, Serialize};
use tome_model::{RecordId, Section};

use crate::entry::ViewEntry;
use crate::error::{NavError, Result};
use crate::stack::ViewStack;

/// Navigation state stored with one host history entry.
///
/// Two records are equal when section, path, selection and the serialized
/// stack are all deep-equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "activeTab")]
    pub section: Section,

    #[serde(rename = "currentPath", default)]
    pub path: Vec<String>,

    #[serde(rename = "selectedId", default)]
    pub selected_id: Option<RecordId>,

    #[serde(rename = "detailStack", default)]
    pub stack: Vec<ViewEntry>,
}

impl HistoryRecord {
    /// Capture the current state of a view stack.
    pub fn capture(stack: &ViewStack) -> Self {
        Self {
            section: stack.section(),
            path: stack.path().to_vec(),
            selected_id: stack.selection().map(|record| record.id.clone()),
            stack: stack.entries(),
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|source| NavError::Serialization { source })
    }

    /// Parse and validate a stored snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| NavError::MalformedSnapshot { source })
    }

    /// Validate an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|source| NavError::MalformedSnapshot { source })
    }
}
