//! The application facade.
//!
//! [`Browser`] owns every component and applies [`Message`]s to them. Each
//! in-app transition is followed by a history sync so the host's entry list
//! always mirrors the view stack; host navigations (back/forward gestures,
//! or the app's own back request) are drained at the end of every update
//! and replayed onto the stack.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tome_bookmarks::{
    BookmarkCategory, BookmarkStore, CategoryRules, CollectionStorage, DragSession, DragUpdate,
    FileStorage,
};
use tome_common::Settings;
use tome_index::{Catalog, TreeNode};
use tome_model::{Record, RecordId, RecordSet, ResolveRecord, Section};
use tome_nav::{
    HistoryBridge, HistoryHost, MemoryHistory, NavigationOrigin, OverlayKind, OverlayPolicy,
    Transition, ViewStack,
};
use tome_search::{SearchConfig, SearchIndex, SearchResults};

use crate::data::{SPELLS_SET, build_search_index, load_catalog};
use crate::error::Result;
use crate::message::{BookmarkMessage, Message};
use crate::spells::SpellFilter;

/// A drag in progress inside one display category of a collection.
#[derive(Debug)]
struct ActiveDrag {
    collection: String,
    category: BookmarkCategory,
    session: DragSession<RecordId>,
}

/// The reference browser: data, navigation, history and bookmarks.
pub struct Browser<H, S> {
    data_dir: PathBuf,
    catalog: Catalog,
    search_config: SearchConfig,
    search: SearchIndex,
    query: String,
    results: SearchResults,
    spell_filter: SpellFilter,
    stack: ViewStack,
    bridge: HistoryBridge,
    host: H,
    bookmarks: BookmarkStore<S>,
    rules: CategoryRules,
    expanded: BTreeSet<Vec<String>>,
    drag: Option<ActiveDrag>,
    drag_throttle: Duration,
}

impl Browser<MemoryHistory, FileStorage> {
    /// Open with an in-memory history and bookmarks stored in the
    /// configured storage directory.
    pub fn with_settings(data_dir: impl Into<PathBuf>, settings: &Settings) -> Result<Self> {
        let storage = FileStorage::in_dir(&settings.bookmarks.resolved_storage_dir());
        Self::open(data_dir, MemoryHistory::new(), storage, settings)
    }
}

impl<H: HistoryHost, S: CollectionStorage> Browser<H, S> {
    /// Load the data directory and attach to the host history.
    ///
    /// Only data loading can fail; unreadable bookmarks start empty.
    pub fn open(
        data_dir: impl Into<PathBuf>,
        mut host: H,
        storage: S,
        settings: &Settings,
    ) -> Result<Self> {
        let data_dir = data_dir.into();
        let catalog = load_catalog(&data_dir)?;
        let search_config = SearchConfig {
            threshold: settings.search.threshold,
            limit: settings.search.limit,
        };
        let search = build_search_index(&catalog, search_config);

        let stack = ViewStack::new(OverlayPolicy::replacing(
            settings.navigation.replaced_overlays.iter().cloned(),
        ));
        let mut bridge = HistoryBridge::new();
        bridge.attach(&stack, &mut host);

        tracing::info!(
            data_dir = %data_dir.display(),
            records = catalog.index().record_count(),
            "browser ready"
        );

        Ok(Self {
            data_dir,
            catalog,
            search_config,
            search,
            query: String::new(),
            results: SearchResults::default(),
            spell_filter: SpellFilter::default(),
            stack,
            bridge,
            host,
            bookmarks: BookmarkStore::open(storage),
            rules: CategoryRules::default(),
            expanded: BTreeSet::new(),
            drag: None,
            drag_throttle: settings.bookmarks.drag_throttle(),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn stack(&self) -> &ViewStack {
        &self.stack
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access, for platform-driven navigation.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn bookmarks(&self) -> &BookmarkStore<S> {
        &self.bookmarks
    }

    pub fn category_rules(&self) -> &CategoryRules {
        &self.rules
    }

    /// Whether the back affordance is shown.
    pub fn can_go_back(&self) -> bool {
        self.stack.can_go_back()
    }

    /// Origin of the last host navigation, until the next in-app transition.
    pub fn last_origin(&self) -> Option<NavigationOrigin> {
        self.bridge.last_origin()
    }

    /// Tree node at the current browse path.
    pub fn current_node(&self) -> Option<&TreeNode> {
        self.catalog.index().node(self.stack.path())
    }

    /// The flat spell list, empty when no spell data was loaded.
    pub fn spells(&self) -> &[Record] {
        self.catalog
            .lookup(SPELLS_SET)
            .map(RecordSet::records)
            .unwrap_or_default()
    }

    /// Spells passing the current spell filter, in list order.
    pub fn filtered_spells(&self) -> Vec<&Record> {
        self.spell_filter.apply(self.spells())
    }

    pub fn spell_filter(&self) -> &SpellFilter {
        &self.spell_filter
    }

    /// Documents listed in the current directory view.
    pub fn current_listing(&self) -> Vec<&Record> {
        self.current_node()
            .map(TreeNode::listing)
            .unwrap_or_default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_results(&self) -> &SearchResults {
        &self.results
    }

    pub fn is_expanded(&self, path: &[String]) -> bool {
        self.expanded.contains(path)
    }

    /// Expanded sidebar directories.
    pub fn expanded(&self) -> impl Iterator<Item = &[String]> {
        self.expanded.iter().map(Vec::as_slice)
    }

    /// A collection split into display categories.
    pub fn bookmark_groups(&self, collection: &str) -> Vec<(BookmarkCategory, Vec<RecordId>)> {
        self.bookmarks
            .categorized(collection, &self.rules, &self.catalog)
    }

    /// Whether a bookmark drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Share code for the named collections.
    pub fn export_bookmarks<N: AsRef<str>>(&self, names: &[N]) -> Result<String> {
        Ok(self.bookmarks.export(names)?)
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Apply a message, then replay any navigation the host performed.
    ///
    /// Errors only come from boundary operations (reload, import); the
    /// state is left as it was.
    pub fn update(&mut self, message: Message) -> Result<()> {
        let result = match message {
            Message::OpenDirectory { path, push, expand } => {
                self.open_directory(path, push, expand);
                Ok(())
            }
            Message::OpenRecord { id, push } => {
                self.open_record_id(&id, push);
                Ok(())
            }
            Message::OpenOverlay(kind) => {
                self.open_overlay(kind);
                Ok(())
            }
            Message::Back => {
                self.back();
                Ok(())
            }
            Message::SwitchSection(section) => {
                self.switch_section(section);
                Ok(())
            }
            Message::ResetBrowser => {
                let transition = self.stack.reset_browser();
                self.record(transition);
                Ok(())
            }
            Message::ToggleExpand(path) => {
                self.toggle_expand(path);
                Ok(())
            }
            Message::Search(query) => {
                self.search(query);
                Ok(())
            }
            Message::FilterSpells(filter) => {
                tracing::debug!(?filter, "spell filter");
                self.spell_filter = filter;
                Ok(())
            }
            Message::Bookmark(message) => self.update_bookmarks(message),
            Message::Reload => self.reload(),
        };
        self.handle_host_events();
        result
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Open a directory, optionally expanding it and its ancestors.
    pub fn open_directory(&mut self, path: Vec<String>, push: bool, expand: bool) {
        if expand {
            for depth in 1..=path.len() {
                self.expanded.insert(path[..depth].to_vec());
            }
        }
        let transition = self.stack.open_directory(path, push);
        self.record(transition);
    }

    /// Open a resolved record.
    pub fn open_record(&mut self, record: Record, push: bool) {
        let transition = self.stack.open_record(record, push);
        self.record(transition);
    }

    /// Resolve and open a record by id; unknown ids are ignored.
    pub fn open_record_id(&mut self, id: &RecordId, push: bool) {
        match self.catalog.resolve(id.as_str()) {
            Some(record) => self.open_record(record, push),
            None => tracing::warn!(%id, "cannot open unknown record"),
        }
    }

    pub fn open_overlay(&mut self, kind: OverlayKind) {
        let transition = self.stack.open_overlay(kind);
        self.record(transition);
    }

    pub fn switch_section(&mut self, section: Section) {
        let transition = self.stack.switch_section(section);
        self.record(transition);
    }

    /// In-app back.
    ///
    /// When the host has an entry to return to, the host steps back and its
    /// navigation event drives the stack; otherwise the stack pops locally.
    /// At home this does nothing, so the host never leaves the app.
    pub fn back(&mut self) {
        if !self.stack.can_go_back() {
            tracing::trace!("back at home ignored");
            return;
        }
        if self.bridge.request_back(&mut self.host) {
            self.handle_host_events();
        } else {
            let transition = self.stack.go_back();
            self.record(transition);
        }
    }

    /// Drain pending host navigations and replay them onto the stack.
    ///
    /// Returns the number of navigations handled.
    pub fn handle_host_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(navigation) = self.host.next_navigation() {
            self.bridge
                .handle_navigation(navigation, &mut self.stack, &self.catalog);
            if self.bridge.is_restoring() {
                self.bridge.sync(&mut self.stack, &mut self.host);
            }
            self.bridge.end_turn();
            handled += 1;
        }
        handled
    }

    /// Mirror a completed transition into the host history.
    fn record(&mut self, transition: Transition) {
        let outcome = self.bridge.sync(&mut self.stack, &mut self.host);
        self.bridge.end_turn();
        tracing::trace!(?transition, ?outcome, "transition recorded");
    }

    pub fn toggle_expand(&mut self, path: Vec<String>) {
        if !self.expanded.remove(&path) {
            self.expanded.insert(path);
        }
    }

    // =========================================================================
    // Search
    // =========================================================================

    pub fn search(&mut self, query: String) {
        self.results = self.search.search(&query);
        tracing::debug!(query = %query, hits = self.results.total(), "search");
        self.query = query;
    }

    // =========================================================================
    // Bookmarks
    // =========================================================================

    fn update_bookmarks(&mut self, message: BookmarkMessage) -> Result<()> {
        match message {
            BookmarkMessage::Create(name) => {
                self.bookmarks.create(&name);
            }
            BookmarkMessage::Rename { old, new } => {
                self.bookmarks.rename(&old, &new);
            }
            BookmarkMessage::Delete(name) => {
                self.bookmarks.delete(&name);
            }
            BookmarkMessage::Toggle { id, collection } => {
                self.bookmarks.toggle(id, &collection);
            }
            BookmarkMessage::Clear(name) => {
                self.bookmarks.clear(&name);
            }
            BookmarkMessage::ClearAll => self.bookmarks.clear_all(),
            BookmarkMessage::MoveCollection { dragged, target } => {
                self.bookmarks.move_collection(&dragged, &target);
            }
            BookmarkMessage::Import(code) => {
                self.bookmarks.import(&code)?;
            }
            BookmarkMessage::DragStarted {
                collection,
                category,
                id,
            } => self.start_drag(collection, category, id),
            BookmarkMessage::DragMoved { point, regions, at } => {
                let Some(drag) = self.drag.as_mut() else {
                    return Ok(());
                };
                if let DragUpdate::Committed(order) = drag.session.pointer_moved(point, &regions, at)
                {
                    self.bookmarks.commit_category_order(
                        &drag.collection,
                        drag.category,
                        &order,
                        &self.rules,
                        &self.catalog,
                    );
                }
            }
            BookmarkMessage::DragReleased => {
                if let Some(drag) = self.drag.take() {
                    tracing::debug!(
                        collection = %drag.collection,
                        moved = drag.session.is_moved(),
                        "drag released"
                    );
                }
            }
        }
        Ok(())
    }

    fn start_drag(&mut self, collection: String, category: BookmarkCategory, id: RecordId) {
        let items = self
            .bookmark_groups(&collection)
            .into_iter()
            .find(|(c, _)| *c == category)
            .map(|(_, items)| items);
        let throttle = self.drag_throttle;
        self.drag = items
            .and_then(|items| DragSession::start(items, id))
            .map(|session| ActiveDrag {
                collection,
                category,
                session: session.with_interval(throttle),
            });
        if self.drag.is_none() {
            tracing::warn!("drag started on an item outside its category");
        }
    }

    /// Retry a failed bookmark save.
    pub fn flush_bookmarks(&mut self) -> Result<()> {
        Ok(self.bookmarks.flush()?)
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Reload the data directory and rebuild the catalog and search index.
    ///
    /// On failure the previous data stays in place. Open views keep the
    /// records they were opened with.
    pub fn reload(&mut self) -> Result<()> {
        let catalog = load_catalog(&self.data_dir)?;
        self.search = build_search_index(&catalog, self.search_config);
        self.catalog = catalog;
        self.results = self.search.search(&self.query);

        let index = self.catalog.index();
        self.expanded.retain(|path| index.node(path.as_slice()).is_some());
        tracing::info!(records = index.record_count(), "data reloaded");
        Ok(())
    }
}
