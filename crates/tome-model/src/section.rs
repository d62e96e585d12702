//! Top-level application sections.

use serde::{Deserialize, Serialize};

/// Active section of the browser (the tab bar).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Hierarchical document browser.
    #[default]
    Browse,
    /// Flat spell list.
    Spells,
    /// Global search results.
    Search,
    /// Bookmark collections.
    Bookmarks,
}

impl Section {
    /// Stable key used in persisted state.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Browse => "browse",
            Self::Spells => "spells",
            Self::Search => "search",
            Self::Bookmarks => "bookmarks",
        }
    }

    /// Get all sections in tab order.
    pub const fn all() -> &'static [Section] {
        &[Self::Browse, Self::Spells, Self::Search, Self::Bookmarks]
    }

    /// Whether this is the hierarchical browsing section.
    pub fn is_browse(&self) -> bool {
        matches!(self, Self::Browse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_lowercase_key() {
        for section in Section::all() {
            let json = serde_json::to_string(section).unwrap();
            assert_eq!(json, format!("\"{}\"", section.key()));
        }
    }
}
