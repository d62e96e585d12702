//! Navigation engine for the Tome reference browser.
//!
//! - [`ViewStack`] - the in-app stack of open views (directory, document,
//!   overlay) on top of the home parameters
//! - [`HistoryRecord`] - the snapshot stored with each host history entry
//! - [`HistoryHost`] - the host's navigable back/forward list
//! - [`HistoryBridge`] - keeps the two in step in both directions

mod bridge;
mod entry;
mod error;
mod host;
mod record;
mod stack;

pub use bridge::{HistoryBridge, NavigationOrigin, SyncOutcome};
pub use entry::{OverlayKind, OverlayPolicy, View, ViewEntry, ViewId};
pub use error::{NavError, Result};
pub use host::{HistoryHost, HostNavigation, MemoryHistory};
pub use record::HistoryRecord;
pub use stack::{HomeView, Transition, ViewStack};
