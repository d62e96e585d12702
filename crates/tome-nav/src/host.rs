//! Host history contract.
//!
//! The host owns a navigable back/forward list (browser history, platform
//! back stack, gesture navigation). The core only relies on "current",
//! "push", "replace" and "step back"; navigation the host performs is
//! delivered as [`HostNavigation`] events that the application drains and
//! feeds into the bridge.

use std::collections::VecDeque;

use crate::record::HistoryRecord;

/// The host navigated to an entry (backward or forward).
#[derive(Debug, Clone, PartialEq)]
pub struct HostNavigation {
    /// State stored with the entry; `None` for entries the app did not create.
    pub record: Option<HistoryRecord>,
}

/// A navigable history list provided by the platform.
pub trait HistoryHost {
    /// State stored with the current entry.
    fn current_entry(&self) -> Option<&HistoryRecord>;

    /// Append an entry after the current one, discarding forward entries.
    fn push(&mut self, record: HistoryRecord);

    /// Overwrite the current entry in place.
    fn replace(&mut self, record: HistoryRecord);

    /// Step back one entry; the resulting navigation is delivered later
    /// through [`HistoryHost::next_navigation`].
    fn go_back(&mut self);

    /// Whether there is an entry to step back to.
    fn can_go_back(&self) -> bool;

    /// Next pending navigation event, if any (the `onNavigate` subscription).
    fn next_navigation(&mut self) -> Option<HostNavigation>;
}

// =============================================================================
// IN-MEMORY HOST
// =============================================================================

/// In-process history list with browser semantics.
///
/// Used for headless embedding and tests; `go_back`/`go_forward` model both
/// app-requested steps and platform gestures.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Option<HistoryRecord>>,
    index: usize,
    pending: VecDeque<HostNavigation>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHistory {
    /// A history list holding one entry without state.
    pub fn new() -> Self {
        Self {
            entries: vec![None],
            index: 0,
            pending: VecDeque::new(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty (never true; kept for API symmetry).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the current entry.
    pub fn index(&self) -> usize {
        self.index
    }

    /// All entries in order.
    pub fn entries(&self) -> &[Option<HistoryRecord>] {
        &self.entries
    }

    /// Whether there is an entry to step forward to.
    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Step forward one entry (forward button / gesture).
    pub fn go_forward(&mut self) {
        if self.can_go_forward() {
            self.index += 1;
            self.emit();
        }
    }

    fn emit(&mut self) {
        self.pending.push_back(HostNavigation {
            record: self.entries[self.index].clone(),
        });
    }
}

impl HistoryHost for MemoryHistory {
    fn current_entry(&self) -> Option<&HistoryRecord> {
        self.entries.get(self.index).and_then(Option::as_ref)
    }

    fn push(&mut self, record: HistoryRecord) {
        self.entries.truncate(self.index + 1);
        self.entries.push(Some(record));
        self.index = self.entries.len() - 1;
    }

    fn replace(&mut self, record: HistoryRecord) {
        self.entries[self.index] = Some(record);
    }

    fn go_back(&mut self) {
        if self.can_go_back() {
            self.index -= 1;
            self.emit();
        }
    }

    fn can_go_back(&self) -> bool {
        self.index > 0
    }

    fn next_navigation(&mut self) -> Option<HostNavigation> {
        self.pending.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tome_model::Section;

    fn record(section: Section) -> HistoryRecord {
        HistoryRecord {
            section,
            ..HistoryRecord::default()
        }
    }

    #[test]
    fn push_discards_forward_entries() {
        let mut host = MemoryHistory::new();
        host.push(record(Section::Spells));
        host.push(record(Section::Search));
        host.go_back();
        host.push(record(Section::Bookmarks));

        assert_eq!(host.len(), 3);
        assert_eq!(host.current_entry().unwrap().section, Section::Bookmarks);
        assert!(!host.can_go_forward());
    }

    #[test]
    fn steps_emit_navigation_events() {
        let mut host = MemoryHistory::new();
        host.push(record(Section::Spells));
        host.go_back();
        host.go_back();
        host.go_forward();

        assert_eq!(host.next_navigation(), Some(HostNavigation { record: None }));
        let forward = host.next_navigation().unwrap();
        assert_eq!(forward.record.unwrap().section, Section::Spells);
        assert!(host.next_navigation().is_none());
    }

    #[test]
    fn replace_overwrites_current_entry() {
        let mut host = MemoryHistory::new();
        host.replace(record(Section::Search));
        assert_eq!(host.len(), 1);
        assert_eq!(host.current_entry().unwrap().section, Section::Search);
    }
}
