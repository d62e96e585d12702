//! Message types for the browser.
//!
//! Every user interaction and host event that changes state is represented
//! as a [`Message`] and applied through [`crate::Browser::update`].

use std::time::Instant;

use tome_bookmarks::{BookmarkCategory, ItemRegion, Point};
use tome_model::{RecordId, Section};
use tome_nav::OverlayKind;

use crate::spells::SpellFilter;

/// Root message enum.
#[derive(Debug, Clone)]
pub enum Message {
    // =========================================================================
    // Navigation
    // =========================================================================
    /// Open a directory; `expand` also expands it in the sidebar.
    OpenDirectory {
        path: Vec<String>,
        push: bool,
        expand: bool,
    },

    /// Open a record by id (documents, spells, `dir:` ids, ...).
    OpenRecord { id: RecordId, push: bool },

    /// Stack an overlay (menu, dialog, ...).
    OpenOverlay(OverlayKind),

    /// The in-app back button.
    Back,

    /// A tab bar click.
    SwitchSection(Section),

    /// Return to the browse root.
    ResetBrowser,

    /// Expand or collapse a sidebar directory.
    ToggleExpand(Vec<String>),

    // =========================================================================
    // Search
    // =========================================================================
    /// The search box changed.
    Search(String),

    /// The spell list filters changed.
    FilterSpells(SpellFilter),

    // =========================================================================
    // Bookmarks
    // =========================================================================
    Bookmark(BookmarkMessage),

    // =========================================================================
    // Data
    // =========================================================================
    /// Reload the data directory and rebuild the index.
    Reload,
}

/// Bookmark panel messages.
#[derive(Debug, Clone)]
pub enum BookmarkMessage {
    Create(String),
    Rename { old: String, new: String },
    Delete(String),
    Toggle { id: RecordId, collection: String },
    Clear(String),
    ClearAll,

    /// A collection tab was dropped onto another.
    MoveCollection { dragged: String, target: String },

    /// Merge the collections of a share code.
    Import(String),

    // =========================================================================
    // Drag reorder within one category of a collection
    // =========================================================================
    DragStarted {
        collection: String,
        category: BookmarkCategory,
        id: RecordId,
    },

    /// Pointer moved; `regions` are the current on-screen item bounds.
    DragMoved {
        point: Point,
        regions: Vec<ItemRegion<RecordId>>,
        at: Instant,
    },

    DragReleased,
}
