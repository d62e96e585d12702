//! Application facade for the Tome reference browser.
//!
//! Loads a data directory into a [`tome_index::Catalog`] and a search index,
//! and ties the view stack, the host history bridge and the bookmark store
//! together behind a single [`Browser::update`] entry point.

mod browser;
mod data;
mod error;
mod message;
mod spells;

pub use browser::Browser;
pub use data::{
    CREATURE_CATEGORY, DOCUMENTS_FILE, DOCUMENTS_SET, FEATS_SET, MASTERIES_SET, MONSTERS_FILE,
    SPELLS_SET, build_search_index, load_catalog,
};
pub use error::{BrowserError, LoadError, Result};
pub use message::{BookmarkMessage, Message};
pub use spells::{ANY, SpellFilter};
