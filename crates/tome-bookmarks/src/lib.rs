//! Bookmark collections for the Tome reference browser.
//!
//! - [`BookmarkStore`] - named collections with create/rename/delete/toggle,
//!   persisted after every mutation through a [`CollectionStorage`]
//! - [`CategoryRules`] - display categories and category-scoped reorders
//! - [`DragSession`] / [`move_item`] - pointer-driven reordering
//! - share codes for exchanging collections

mod category;
mod collection;
mod error;
mod reorder;
mod share;
mod storage;
mod store;

pub use category::{BookmarkCategory, CategoryRules};
pub use collection::{BookmarkCollection, CollectionMap, DEFAULT_COLLECTION};
pub use error::{BookmarkError, Result};
pub use reorder::{
    DEFAULT_THROTTLE, DragSession, DragUpdate, ItemRegion, Point, Rect, hit_test, move_item,
};
pub use share::{decode as decode_share_code, encode as encode_share_code};
pub use storage::{BOOKMARKS_FILE, CollectionStorage, FileStorage, MemoryStorage};
pub use store::BookmarkStore;
