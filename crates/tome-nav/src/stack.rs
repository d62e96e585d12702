//! View-state stack.
//!
//! # Architecture
//!
//! The stack holds the currently open views, top = visible. The "home"
//! parameters (section, current path, selected document) are stored once;
//! when the home view is itself presented as a stack entry (after a
//! non-push navigation) it is the *anchor*: the bottom entry is derived from
//! the home parameters instead of being a second copy of them, so the two
//! can never drift apart.
//!
//! ```text
//! entries() = [anchor(home)?] ++ layers
//! ```
//!
//! Operations never fail; invalid requests (popping an empty stack,
//! re-opening the overlay already on top) are no-ops reported as
//! [`Transition::Unchanged`].

use tome_model::{Record, Section};

use crate::entry::{OverlayKind, OverlayPolicy, View, ViewEntry, ViewId};

// =============================================================================
// HOME VIEW
// =============================================================================

/// The implicit view shown beneath the stack.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeView {
    pub section: Section,
    pub path: Vec<String>,
    pub selection: Option<Record>,
}

impl HomeView {
    /// The view the anchor entry presents.
    fn as_view(&self) -> View {
        match &self.selection {
            Some(record) => View::document(record.clone()),
            None => View::directory(self.path.clone()),
        }
    }
}

/// Outcome of a stack operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed.
    Unchanged,
    /// A new entry was stacked on top.
    Pushed,
    /// The top overlay was replaced by a navigation target.
    Replaced,
    /// Home parameters were set and the stack reset to a single entry.
    Reset,
    /// The top entry was removed.
    Popped,
    /// The section changed and the stack was cleared.
    Cleared,
}

impl Transition {
    /// Whether the operation changed anything.
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

// =============================================================================
// VIEW STACK
// =============================================================================

/// Ordered list of open views plus the home parameters.
#[derive(Debug, Clone)]
pub struct ViewStack {
    home: HomeView,
    anchor: Option<ViewId>,
    layers: Vec<ViewEntry>,
    next_id: u64,
    policy: OverlayPolicy,
    pending_replace: bool,
}

impl Default for ViewStack {
    fn default() -> Self {
        Self::new(OverlayPolicy::default())
    }
}

impl ViewStack {
    /// Create an empty stack at the browse root.
    pub fn new(policy: OverlayPolicy) -> Self {
        Self {
            home: HomeView::default(),
            anchor: None,
            layers: Vec::new(),
            next_id: 1,
            policy,
            pending_replace: false,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Home parameters.
    pub fn home(&self) -> &HomeView {
        &self.home
    }

    /// Active section.
    pub fn section(&self) -> Section {
        self.home.section
    }

    /// Current tree path.
    pub fn path(&self) -> &[String] {
        &self.home.path
    }

    /// Selected document.
    pub fn selection(&self) -> Option<&Record> {
        self.home.selection.as_ref()
    }

    /// Overlay policy in effect.
    pub fn policy(&self) -> &OverlayPolicy {
        &self.policy
    }

    /// Replace the overlay policy.
    pub fn set_policy(&mut self, policy: OverlayPolicy) {
        self.policy = policy;
    }

    /// Number of open views.
    pub fn depth(&self) -> usize {
        usize::from(self.anchor.is_some()) + self.layers.len()
    }

    /// Whether no view is open.
    pub fn is_empty(&self) -> bool {
        self.depth() == 0
    }

    /// Open views, bottom first.
    pub fn entries(&self) -> Vec<ViewEntry> {
        self.anchor_entry()
            .into_iter()
            .chain(self.layers.iter().cloned())
            .collect()
    }

    /// The visible view.
    pub fn top(&self) -> Option<ViewEntry> {
        match self.layers.last() {
            Some(entry) => Some(entry.clone()),
            None => self.anchor_entry(),
        }
    }

    /// Whether the back affordance should be offered.
    pub fn can_go_back(&self) -> bool {
        !self.is_empty()
            || self.home.selection.is_some()
            || (self.home.section.is_browse() && !self.home.path.is_empty())
    }

    /// Consume the "last transition replaced an overlay" marker.
    pub fn take_pending_replace(&mut self) -> bool {
        std::mem::take(&mut self.pending_replace)
    }

    fn anchor_entry(&self) -> Option<ViewEntry> {
        self.anchor
            .map(|id| ViewEntry::new(id, self.home.as_view()))
    }

    fn allocate_id(&mut self) -> ViewId {
        let id = ViewId(self.next_id);
        self.next_id += 1;
        id
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Open a directory.
    ///
    /// Without `push` this sets the home parameters (browse section, `path`,
    /// no selection) and resets the stack to that single directory. With
    /// `push` the directory is stacked on top, replacing a top overlay whose
    /// kind the policy marks as replaceable.
    pub fn open_directory(&mut self, path: Vec<String>, push: bool) -> Transition {
        let transition = if push {
            self.push_view(View::directory(path))
        } else {
            self.anchor_view(View::directory(path))
        };
        tracing::debug!(?transition, push, "open directory");
        transition
    }

    /// Open a document; category records degrade to [`Self::open_directory`].
    ///
    /// Without `push` the record becomes the home selection and the stack is
    /// reset to it; the section and path are kept.
    pub fn open_record(&mut self, record: Record, push: bool) -> Transition {
        if record.is_category() {
            return self.open_directory(record.path_parts, push);
        }
        let transition = if push {
            self.push_view(View::document(record))
        } else {
            self.anchor_view(View::document(record))
        };
        tracing::debug!(?transition, push, "open record");
        transition
    }

    /// Stack an overlay unless the same kind is already on top.
    pub fn open_overlay(&mut self, kind: OverlayKind) -> Transition {
        if self
            .layers
            .last()
            .and_then(|entry| entry.view.overlay_kind())
            .is_some_and(|top| *top == kind)
        {
            return Transition::Unchanged;
        }
        let id = self.allocate_id();
        tracing::debug!(%kind, %id, "open overlay");
        self.layers.push(ViewEntry::new(id, View::overlay(kind)));
        Transition::Pushed
    }

    /// Pop the top view.
    ///
    /// Removing the anchor leaves the home parameters as the implicit view,
    /// minus the selection the anchor presented. Once the stack is empty,
    /// back first closes a remaining selection and then walks the browse
    /// path up to the root. It reports [`Transition::Unchanged`] exactly
    /// when [`Self::can_go_back`] is false.
    pub fn go_back(&mut self) -> Transition {
        let transition = if self.layers.pop().is_some() {
            Transition::Popped
        } else if self.anchor.take().is_some() {
            self.home.selection = None;
            Transition::Popped
        } else if self.home.selection.take().is_some() {
            Transition::Popped
        } else if self.home.section.is_browse() && self.home.path.pop().is_some() {
            Transition::Popped
        } else {
            Transition::Unchanged
        };
        tracing::debug!(?transition, depth = self.depth(), "go back");
        transition
    }

    /// Activate a section, clearing the selection and the stack.
    pub fn switch_section(&mut self, section: Section) -> Transition {
        if self.home.section == section && self.home.selection.is_none() && self.is_empty() {
            return Transition::Unchanged;
        }
        self.home.section = section;
        self.home.selection = None;
        self.anchor = None;
        self.layers.clear();
        Transition::Cleared
    }

    /// Return to the browse root with nothing open.
    pub fn reset_browser(&mut self) -> Transition {
        let was_root = self.home.path.is_empty();
        let transition = self.switch_section(Section::Browse);
        self.home.path.clear();
        if was_root { transition } else { Transition::Cleared }
    }

    /// Replace the whole state with a restored snapshot.
    ///
    /// When the first entry presents the restored home view it becomes the
    /// anchor again, so the stack reads back exactly as given.
    pub fn restore(
        &mut self,
        section: Section,
        path: Vec<String>,
        selection: Option<Record>,
        entries: Vec<ViewEntry>,
    ) {
        self.home = HomeView {
            section,
            path,
            selection,
        };
        let mut entries = entries.into_iter().peekable();
        let home_view = self.home.as_view();
        self.anchor = entries
            .next_if(|entry| entry.view == home_view)
            .map(|entry| entry.id);
        self.layers = entries.collect();

        let max_id = self
            .anchor
            .into_iter()
            .chain(self.layers.iter().map(|entry| entry.id))
            .map(|id| id.0)
            .max()
            .unwrap_or(0);
        self.next_id = self.next_id.max(max_id + 1);
        self.pending_replace = false;
    }

    fn anchor_view(&mut self, view: View) -> Transition {
        let target = match view {
            View::Directory { path } => HomeView {
                section: Section::Browse,
                path,
                selection: None,
            },
            View::Document { item } => HomeView {
                section: self.home.section,
                path: self.home.path.clone(),
                selection: Some(item),
            },
            View::Overlay { kind } => return self.open_overlay(kind),
        };
        if self.anchor.is_some() && self.layers.is_empty() && self.home == target {
            return Transition::Unchanged;
        }
        self.home = target;
        self.layers.clear();
        self.anchor = Some(self.allocate_id());
        Transition::Reset
    }

    fn push_view(&mut self, view: View) -> Transition {
        let replaces_overlay = self
            .layers
            .last()
            .and_then(|entry| entry.view.overlay_kind())
            .is_some_and(|kind| self.policy.replaces(kind));

        if replaces_overlay {
            self.layers.pop();
            self.pending_replace = true;
            if self.is_empty() {
                self.anchor_view(view);
            } else if !self.top().is_some_and(|top| top.view.same_target(&view)) {
                let id = self.allocate_id();
                self.layers.push(ViewEntry::new(id, view));
            }
            return Transition::Replaced;
        }

        if self.is_empty() {
            return self.anchor_view(view);
        }
        if self.top().is_some_and(|top| top.view.same_target(&view)) {
            return Transition::Unchanged;
        }
        let id = self.allocate_id();
        self.layers.push(ViewEntry::new(id, view));
        Transition::Pushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    fn views(stack: &ViewStack) -> Vec<View> {
        stack.entries().into_iter().map(|entry| entry.view).collect()
    }

    #[test]
    fn non_push_directory_resets_to_single_entry() {
        let mut stack = ViewStack::default();
        stack.open_record(Record::new("a", "A", ["Ch1"]), false);
        stack.open_overlay(OverlayKind::menu());

        assert_eq!(stack.open_directory(path(&["Ch1", "Sec2"]), false), Transition::Reset);
        assert_eq!(views(&stack), vec![View::directory(path(&["Ch1", "Sec2"]))]);
        assert_eq!(stack.path(), ["Ch1", "Sec2"]);
        assert!(stack.selection().is_none());
        assert_eq!(stack.section(), Section::Browse);
    }

    #[test]
    fn overlay_is_replaced_not_stacked() {
        let mut stack = ViewStack::default();
        stack.open_directory(path(&["Ch1", "Sec2"]), false);
        stack.open_overlay(OverlayKind::menu());
        assert_eq!(stack.depth(), 2);

        assert_eq!(stack.open_directory(path(&["Ch1", "Sec3"]), true), Transition::Replaced);
        assert!(stack.take_pending_replace());
        assert!(!stack.take_pending_replace());
        assert_eq!(
            views(&stack),
            vec![
                View::directory(path(&["Ch1", "Sec2"])),
                View::directory(path(&["Ch1", "Sec3"])),
            ]
        );

        stack.go_back();
        stack.go_back();
        assert!(stack.is_empty());
        assert_eq!(stack.path(), ["Ch1", "Sec2"]);
    }

    #[test]
    fn non_replaceable_overlay_is_stacked_upon() {
        let mut stack = ViewStack::new(OverlayPolicy::stacking());
        stack.open_directory(path(&["Ch1"]), false);
        stack.open_overlay(OverlayKind::menu());
        assert_eq!(stack.open_directory(path(&["Ch2"]), true), Transition::Pushed);
        assert_eq!(stack.depth(), 3);
        assert!(!stack.take_pending_replace());
    }

    #[test]
    fn repeated_overlay_is_idempotent() {
        let mut stack = ViewStack::default();
        stack.open_directory(path(&["Ch1"]), false);
        assert_eq!(stack.open_overlay(OverlayKind::menu()), Transition::Pushed);
        assert_eq!(stack.open_overlay(OverlayKind::menu()), Transition::Unchanged);
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn pushing_same_target_twice_does_not_duplicate() {
        let mut stack = ViewStack::default();
        stack.open_directory(path(&["Ch1"]), false);
        let record = Record::new("a", "A", ["Ch1"]);
        assert_eq!(stack.open_record(record.clone(), true), Transition::Pushed);
        assert_eq!(stack.open_record(record, true), Transition::Unchanged);
        assert_eq!(stack.open_directory(path(&["Ch1"]), false), Transition::Reset);
        assert_eq!(stack.open_directory(path(&["Ch1"]), false), Transition::Unchanged);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn category_record_degrades_to_directory() {
        let mut stack = ViewStack::default();
        let category = Record::category("dir:Ch1/Sec", "Sec", path(&["Ch1", "Sec"]), None);
        stack.open_record(category, false);
        assert_eq!(views(&stack), vec![View::directory(path(&["Ch1", "Sec"]))]);
        assert!(stack.selection().is_none());
    }

    #[test]
    fn non_push_record_keeps_section_and_path() {
        let mut stack = ViewStack::default();
        stack.open_directory(path(&["Ch1"]), false);
        stack.switch_section(Section::Spells);
        let record = Record::new("fireball", "Fireball", ["法术"]);
        stack.open_record(record.clone(), false);

        assert_eq!(stack.section(), Section::Spells);
        assert_eq!(stack.path(), ["Ch1"]);
        assert_eq!(stack.selection(), Some(&record));
        assert_eq!(views(&stack), vec![View::document(record)]);
    }

    #[test]
    fn push_on_empty_stack_anchors_home() {
        let mut stack = ViewStack::default();
        assert_eq!(stack.open_directory(path(&["Ch2"]), true), Transition::Reset);
        assert_eq!(stack.path(), ["Ch2"]);
    }

    #[test]
    fn replacing_lone_overlay_anchors_home() {
        let mut stack = ViewStack::default();
        stack.open_overlay(OverlayKind::menu());
        assert_eq!(stack.open_directory(path(&["Ch3"]), true), Transition::Replaced);
        assert_eq!(views(&stack), vec![View::directory(path(&["Ch3"]))]);
        assert_eq!(stack.path(), ["Ch3"]);
        assert!(stack.take_pending_replace());
    }

    #[test]
    fn go_back_terminates_at_home() {
        let mut stack = ViewStack::default();
        stack.open_directory(path(&["Ch1"]), false);
        stack.open_directory(path(&["Ch1", "A"]), true);
        stack.open_record(Record::new("x", "X", ["Ch1", "A"]), true);
        stack.open_overlay(OverlayKind::new("filters"));

        let depth = stack.depth();
        for _ in 0..depth {
            assert_eq!(stack.go_back(), Transition::Popped);
        }
        assert!(stack.is_empty());
        assert_eq!(stack.path(), ["Ch1"]);
        assert!(stack.can_go_back());

        assert_eq!(stack.go_back(), Transition::Popped);
        assert!(stack.path().is_empty());
        assert!(!stack.can_go_back());
        for _ in 0..3 {
            assert_eq!(stack.go_back(), Transition::Unchanged);
        }
    }

    #[test]
    fn popping_document_anchor_closes_the_selection() {
        let mut stack = ViewStack::default();
        stack.switch_section(Section::Spells);
        stack.open_record(Record::new("fireball", "Fireball", ["法术"]), false);
        assert_eq!(stack.depth(), 1);

        assert_eq!(stack.go_back(), Transition::Popped);
        assert!(stack.is_empty());
        assert!(stack.selection().is_none());
        assert!(!stack.can_go_back());
        assert_eq!(stack.go_back(), Transition::Unchanged);
    }

    #[test]
    fn restored_selection_without_entries_is_closed_by_back() {
        let mut stack = ViewStack::default();
        let record = Record::new("a", "A", ["Ch1"]);
        stack.restore(Section::Browse, path(&["Ch1"]), Some(record), Vec::new());
        assert!(stack.is_empty());
        assert!(stack.can_go_back());

        assert_eq!(stack.go_back(), Transition::Popped);
        assert!(stack.selection().is_none());
        assert_eq!(stack.path(), ["Ch1"]);
        assert_eq!(stack.go_back(), Transition::Popped);
        assert!(stack.path().is_empty());
        assert_eq!(stack.go_back(), Transition::Unchanged);
    }

    #[test]
    fn switch_section_clears_selection_and_stack() {
        let mut stack = ViewStack::default();
        stack.open_record(Record::new("a", "A", ["Ch1"]), false);
        assert_eq!(stack.switch_section(Section::Bookmarks), Transition::Cleared);
        assert!(stack.is_empty());
        assert!(stack.selection().is_none());
        assert_eq!(stack.switch_section(Section::Bookmarks), Transition::Unchanged);
    }

    #[test]
    fn reset_browser_returns_to_root() {
        let mut stack = ViewStack::default();
        stack.open_directory(path(&["Ch1"]), false);
        stack.switch_section(Section::Search);
        assert_eq!(stack.reset_browser(), Transition::Cleared);
        assert_eq!(stack.section(), Section::Browse);
        assert!(stack.path().is_empty());
        assert!(!stack.can_go_back());
        assert_eq!(stack.reset_browser(), Transition::Unchanged);
    }

    #[test]
    fn restore_reproduces_entries_and_keeps_ids_monotonic() {
        let mut stack = ViewStack::default();
        stack.open_directory(path(&["Ch1"]), false);
        stack.open_record(Record::new("x", "X", ["Ch1"]), true);
        let snapshot = stack.entries();
        let home = stack.home().clone();

        let mut restored = ViewStack::default();
        restored.restore(
            home.section,
            home.path.clone(),
            home.selection.clone(),
            snapshot.clone(),
        );
        assert_eq!(restored.entries(), snapshot);
        assert_eq!(restored.home(), &home);

        restored.open_overlay(OverlayKind::menu());
        let top = restored.top().unwrap();
        assert!(snapshot.iter().all(|entry| entry.id < top.id));
    }

    #[test]
    fn can_go_back_reflects_home_state() {
        let mut stack = ViewStack::default();
        assert!(!stack.can_go_back());
        stack.restore(Section::Browse, path(&["Ch1"]), None, Vec::new());
        assert!(stack.can_go_back());
        stack.restore(Section::Spells, path(&["Ch1"]), None, Vec::new());
        assert!(!stack.can_go_back());
    }
}
