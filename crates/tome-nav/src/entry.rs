//! Stack entries: the open views.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tome_model::Record;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Monotonically increasing key of a stack entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of a transient overlay layer (e.g. the compact-layout menu).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayKind(String);

impl OverlayKind {
    /// Kind name of the navigation menu overlay.
    pub const MENU: &'static str = "menu";

    /// Create an overlay kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    /// The navigation menu overlay.
    pub fn menu() -> Self {
        Self::new(Self::MENU)
    }

    /// Kind name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OverlayKind {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// VIEW
// =============================================================================

/// What a stack entry shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum View {
    /// A directory listing.
    #[serde(rename = "dir")]
    Directory { path: Vec<String> },

    /// A single document.
    #[serde(rename = "file")]
    Document { item: Record },

    /// A transient overlay; never a navigable ancestor.
    #[serde(rename = "overlay")]
    Overlay { kind: OverlayKind },
}

impl View {
    /// Directory view.
    pub fn directory(path: Vec<String>) -> Self {
        Self::Directory { path }
    }

    /// Document view.
    pub fn document(item: Record) -> Self {
        Self::Document { item }
    }

    /// Overlay view.
    pub fn overlay(kind: OverlayKind) -> Self {
        Self::Overlay { kind }
    }

    /// Whether this is an overlay of any kind.
    pub fn is_overlay(&self) -> bool {
        matches!(self, Self::Overlay { .. })
    }

    /// Overlay kind, if this is an overlay.
    pub fn overlay_kind(&self) -> Option<&OverlayKind> {
        match self {
            Self::Overlay { kind } => Some(kind),
            _ => None,
        }
    }

    /// Whether both views show the same target (documents compare by id).
    pub fn same_target(&self, other: &View) -> bool {
        match (self, other) {
            (Self::Directory { path: a }, Self::Directory { path: b }) => a == b,
            (Self::Document { item: a }, Self::Document { item: b }) => a.id == b.id,
            (Self::Overlay { kind: a }, Self::Overlay { kind: b }) => a == b,
            _ => false,
        }
    }
}

/// One element of the view stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewEntry {
    pub id: ViewId,
    #[serde(flatten)]
    pub view: View,
}

impl ViewEntry {
    /// Create an entry.
    pub fn new(id: ViewId, view: View) -> Self {
        Self { id, view }
    }
}

// =============================================================================
// OVERLAY POLICY
// =============================================================================

/// Which overlay kinds are replaced, rather than stacked upon, when a real
/// navigation target is pushed on top of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayPolicy {
    pub replaced_on_navigation: BTreeSet<OverlayKind>,
}

impl Default for OverlayPolicy {
    fn default() -> Self {
        Self {
            replaced_on_navigation: BTreeSet::from([OverlayKind::menu()]),
        }
    }
}

impl OverlayPolicy {
    /// A policy that stacks on top of every overlay.
    pub fn stacking() -> Self {
        Self {
            replaced_on_navigation: BTreeSet::new(),
        }
    }

    /// Build a policy from overlay kind names.
    pub fn replacing<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replaced_on_navigation: kinds.into_iter().map(OverlayKind::new).collect(),
        }
    }

    /// Whether navigation replaces an overlay of this kind.
    pub fn replaces(&self, kind: &OverlayKind) -> bool {
        self.replaced_on_navigation.contains(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entries_serialize_with_type_tag() {
        let dir = ViewEntry::new(ViewId(3), View::directory(vec!["Ch1".into()]));
        assert_eq!(
            serde_json::to_value(&dir).unwrap(),
            json!({"id": 3, "type": "dir", "path": ["Ch1"]})
        );

        let menu = ViewEntry::new(ViewId(4), View::overlay(OverlayKind::menu()));
        assert_eq!(
            serde_json::to_value(&menu).unwrap(),
            json!({"id": 4, "type": "overlay", "kind": "menu"})
        );
    }

    #[test]
    fn document_entries_round_trip() {
        let record = Record::new("a.htm", "A", ["Ch1"]).with_attribute("castingTime", "1 action");
        let entry = ViewEntry::new(ViewId(1), View::document(record));
        let json = serde_json::to_string(&entry).unwrap();
        let back: ViewEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn same_target_ignores_document_payload() {
        let a = View::document(Record::new("a", "Old title", ["Ch1"]));
        let b = View::document(Record::new("a", "New title", ["Ch2"]));
        assert!(a.same_target(&b));
        assert!(!a.same_target(&View::directory(vec!["Ch1".into()])));
    }

    #[test]
    fn default_policy_replaces_only_menu() {
        let policy = OverlayPolicy::default();
        assert!(policy.replaces(&OverlayKind::menu()));
        assert!(!policy.replaces(&OverlayKind::new("filters")));
        assert!(!OverlayPolicy::stacking().replaces(&OverlayKind::menu()));
    }
}
