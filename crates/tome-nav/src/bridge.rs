//! Synchronisation between the view stack and the host history list.
//!
//! # Event flow
//!
//! ```text
//! in-app transition ──> ViewStack ──sync()──> host.push / host.replace
//!
//! host back/forward ──> handle_navigation() ──> ViewStack::restore
//!                                   │
//!                                   └─ restoring = true ──> next sync() skipped
//! ```
//!
//! The bridge holds two pieces of per-instance state:
//!
//! - `restoring`: set while a host-originated navigation is being replayed,
//!   so the replay is not recorded again. It is consumed by the next
//!   [`HistoryBridge::sync`] and cleared unconditionally by
//!   [`HistoryBridge::end_turn`] so it can never stay stuck.
//! - `internal_back`: a one-shot marker set right before the app asks the
//!   host to go back, used to tell gesture/button navigation apart from
//!   in-app back.

use tome_model::ResolveRecord;

use crate::entry::{View, ViewEntry};
use crate::host::{HistoryHost, HostNavigation};
use crate::record::HistoryRecord;
use crate::stack::ViewStack;

/// Who triggered a host navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOrigin {
    /// The app asked the host to go back.
    Internal,
    /// A platform gesture or button.
    External,
}

/// What [`HistoryBridge::sync`] did to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A new host entry was appended.
    Pushed,
    /// The current host entry was overwritten.
    Replaced,
    /// The host already records the current state.
    Unchanged,
    /// The change was the replay of a host navigation.
    SkippedRestore,
}

/// Keeps a [`ViewStack`] and a [`HistoryHost`] consistent.
#[derive(Debug, Default)]
pub struct HistoryBridge {
    restoring: bool,
    internal_back: bool,
    last_origin: Option<NavigationOrigin>,
}

impl HistoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a host navigation replay is in flight.
    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    /// Origin of the most recent host navigation, until the next recorded
    /// in-app transition.
    pub fn last_origin(&self) -> Option<NavigationOrigin> {
        self.last_origin
    }

    /// Record the initial state in the host's current entry.
    pub fn attach<H: HistoryHost + ?Sized>(&mut self, stack: &ViewStack, host: &mut H) {
        host.replace(HistoryRecord::capture(stack));
        tracing::debug!("history bridge attached");
    }

    /// Mirror the current stack state into the host after a transition.
    pub fn sync<H: HistoryHost + ?Sized>(
        &mut self,
        stack: &mut ViewStack,
        host: &mut H,
    ) -> SyncOutcome {
        let replace = stack.take_pending_replace();
        if std::mem::take(&mut self.restoring) {
            tracing::trace!("skipping sync of restored state");
            return SyncOutcome::SkippedRestore;
        }

        let record = HistoryRecord::capture(stack);
        if host.current_entry() == Some(&record) {
            return SyncOutcome::Unchanged;
        }

        self.last_origin = None;
        if replace {
            tracing::debug!(depth = record.stack.len(), "replace history entry");
            host.replace(record);
            SyncOutcome::Replaced
        } else {
            tracing::debug!(depth = record.stack.len(), "push history entry");
            host.push(record);
            SyncOutcome::Pushed
        }
    }

    /// Ask the host to step back, marking the navigation as in-app.
    ///
    /// Returns `false` (and leaves the marker unset) when the host has
    /// nothing to go back to.
    pub fn request_back<H: HistoryHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if !host.can_go_back() {
            return false;
        }
        self.internal_back = true;
        host.go_back();
        true
    }

    /// Replay a host navigation onto the stack.
    ///
    /// Entries without a stored record (ones the app did not create) only
    /// consume the one-shot marker. Stale identifiers degrade: a selection
    /// that no longer resolves becomes "no selection" and document entries
    /// that no longer resolve are dropped.
    pub fn handle_navigation<R: ResolveRecord + ?Sized>(
        &mut self,
        navigation: HostNavigation,
        stack: &mut ViewStack,
        resolver: &R,
    ) -> NavigationOrigin {
        let origin = if std::mem::take(&mut self.internal_back) {
            NavigationOrigin::Internal
        } else {
            NavigationOrigin::External
        };
        self.last_origin = Some(origin);

        let Some(record) = navigation.record else {
            tracing::debug!(?origin, "host navigated to an entry without state");
            return origin;
        };

        self.restoring = true;
        let selection = record.selected_id.as_ref().and_then(|id| {
            let resolved = resolver.resolve(id.as_str());
            if resolved.is_none() {
                tracing::warn!(%id, "stale selection in history entry, clearing it");
            }
            resolved
        });
        let entries = record
            .stack
            .into_iter()
            .filter_map(|entry| refresh_entry(entry, resolver))
            .collect();

        tracing::debug!(?origin, section = ?record.section, "restore history entry");
        stack.restore(record.section, record.path, selection, entries);
        origin
    }

    /// End of an event-loop turn; clears the in-flight flag.
    pub fn end_turn(&mut self) {
        self.restoring = false;
    }
}

/// Swap a stored document for its live record, or drop it when stale.
fn refresh_entry<R: ResolveRecord + ?Sized>(entry: ViewEntry, resolver: &R) -> Option<ViewEntry> {
    match entry.view {
        View::Document { item } => match resolver.resolve(item.id.as_str()) {
            Some(live) => Some(ViewEntry::new(entry.id, View::document(live))),
            None => {
                tracing::warn!(id = %item.id, "stale document in history entry, dropping it");
                None
            }
        },
        view => Some(ViewEntry::new(entry.id, view)),
    }
}
