//! The bookmark collection store.
//!
//! Every mutating operation persists the full map when it changed
//! something. A failed save keeps the in-memory state and marks the store
//! dirty; the next mutation or an explicit [`BookmarkStore::flush`] retries.

use tome_model::{RecordId, ResolveRecord};

use crate::category::{BookmarkCategory, CategoryRules};
use crate::collection::{BookmarkCollection, CollectionMap, DEFAULT_COLLECTION};
use crate::error::Result;
use crate::reorder::move_item;
use crate::share;
use crate::storage::CollectionStorage;

/// Named bookmark collections backed by a [`CollectionStorage`].
#[derive(Debug)]
pub struct BookmarkStore<S> {
    map: CollectionMap,
    storage: S,
    dirty: bool,
}

impl<S: CollectionStorage> BookmarkStore<S> {
    /// Load the stored collections.
    ///
    /// Missing data yields the default map; malformed or unreadable data is
    /// discarded with a warning and replaced by the default map.
    pub fn open(storage: S) -> Self {
        let mut map = match storage.load() {
            Ok(Some(map)) => map,
            Ok(None) => CollectionMap::default(),
            Err(e) => {
                tracing::warn!(error = %e, "discarding stored bookmarks");
                CollectionMap::default()
            }
        };
        if map.ensure_default() {
            tracing::warn!("stored bookmarks had no default collection, restored it");
        }
        tracing::info!(collections = map.len(), "bookmarks loaded");
        Self {
            map,
            storage,
            dirty: false,
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn map(&self) -> &CollectionMap {
        &self.map
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Whether the in-memory state has not been saved yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Collection names in display order.
    pub fn names(&self) -> Vec<String> {
        self.map.names()
    }

    pub fn collection(&self, name: &str) -> Option<&BookmarkCollection> {
        self.map.get(name)
    }

    /// Whether any collection holds `id`.
    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.map.contains_item(id)
    }

    /// Names of the collections holding `id`, in display order.
    pub fn collections_containing(&self, id: &str) -> Vec<String> {
        self.map
            .iter()
            .filter(|c| c.contains(id))
            .map(|c| c.name.clone())
            .collect()
    }

    /// A collection split into display categories.
    pub fn categorized<R: ResolveRecord + ?Sized>(
        &self,
        name: &str,
        rules: &CategoryRules,
        resolver: &R,
    ) -> Vec<(BookmarkCategory, Vec<RecordId>)> {
        rules.group(self.map.items(name), resolver)
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Create an empty collection; no-op for empty or taken names.
    pub fn create(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.map.contains(name) {
            return false;
        }
        self.map.insert(name, Vec::new());
        tracing::debug!(name, "created collection");
        self.persist();
        true
    }

    /// Rename a collection, keeping its position.
    ///
    /// Refused for the default collection, a missing old name, or an empty
    /// or taken new name.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        let new = new.trim();
        if old == DEFAULT_COLLECTION || new.is_empty() || self.map.contains(new) {
            return false;
        }
        if !self.map.rename(old, new) {
            return false;
        }
        tracing::debug!(old, new, "renamed collection");
        self.persist();
        true
    }

    /// Delete a collection; refused for the default collection.
    pub fn delete(&mut self, name: &str) -> bool {
        if name == DEFAULT_COLLECTION || self.map.remove(name).is_none() {
            return false;
        }
        tracing::debug!(name, "deleted collection");
        self.persist();
        true
    }

    /// Add `id` to a collection, or remove it when already there.
    ///
    /// A missing collection is created under the trimmed name; an empty
    /// name is refused. Returns whether the collection holds `id` afterwards.
    pub fn toggle(&mut self, id: impl Into<RecordId>, name: &str) -> bool {
        let id = id.into();
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        if !self.map.contains(name) {
            self.map.insert(name, Vec::new());
            tracing::debug!(name, "created collection on toggle");
        }
        let Some(collection) = self.map.get_mut(name) else {
            return false;
        };
        let added = match collection.items.iter().position(|item| *item == id) {
            Some(index) => {
                collection.items.remove(index);
                false
            }
            None => {
                collection.items.push(id);
                true
            }
        };
        self.persist();
        added
    }

    /// Empty a collection.
    pub fn clear(&mut self, name: &str) -> bool {
        match self.map.get_mut(name) {
            Some(collection) if !collection.items.is_empty() => {
                collection.items.clear();
                self.persist();
                true
            }
            _ => false,
        }
    }

    /// Reset to just the empty default collection.
    pub fn clear_all(&mut self) {
        self.map = CollectionMap::default();
        tracing::debug!("cleared all bookmarks");
        self.persist();
    }

    /// Replace the collection order; `names` must be a permutation.
    pub fn set_collection_order(&mut self, names: &[String]) -> bool {
        if !self.map.reorder(names) {
            return false;
        }
        self.persist();
        true
    }

    /// Move collection `dragged` to the position of `target`.
    pub fn move_collection(&mut self, dragged: &str, target: &str) -> bool {
        let names = self.map.names();
        match move_item(&names, &dragged.to_string(), &target.to_string()) {
            Some(order) => self.set_collection_order(&order),
            None => false,
        }
    }

    /// Write back a reordered display category of a collection.
    pub fn commit_category_order<R: ResolveRecord + ?Sized>(
        &mut self,
        name: &str,
        category: BookmarkCategory,
        ordered: &[RecordId],
        rules: &CategoryRules,
        resolver: &R,
    ) -> bool {
        let Some(items) =
            rules.commit_category_order(self.map.items(name), category, ordered, resolver)
        else {
            return false;
        };
        if items.as_slice() == self.map.items(name) {
            return false;
        }
        self.map.insert(name, items);
        self.persist();
        true
    }

    // -------------------------------------------------------------------------
    // Share codes
    // -------------------------------------------------------------------------

    /// Encode the named collections (in display order) as a share code.
    pub fn export<N: AsRef<str>>(&self, names: &[N]) -> Result<String> {
        let mut selected = CollectionMap::empty();
        for collection in self
            .map
            .iter()
            .filter(|c| names.iter().any(|n| n.as_ref() == c.name))
        {
            selected.insert(collection.name.clone(), collection.items.clone());
        }
        share::encode(&selected)
    }

    /// Merge the collections of a share code.
    ///
    /// Existing collections are left untouched; colliding incoming names are
    /// renamed `name_2`, `name_3`, ... Returns the names the imported
    /// collections were stored under.
    pub fn import(&mut self, code: &str) -> Result<Vec<String>> {
        let incoming = share::decode(code)?;
        let mut stored = Vec::with_capacity(incoming.len());
        for collection in &incoming {
            let name = share::unique_name(&self.map, &collection.name);
            self.map.insert(name.clone(), collection.items.clone());
            stored.push(name);
        }
        tracing::info!(count = stored.len(), "imported bookmark collections");
        if !stored.is_empty() {
            self.persist();
        }
        Ok(stored)
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    /// Save now if a previous save failed.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.storage.save(&self.map)?;
        self.dirty = false;
        Ok(())
    }

    fn persist(&mut self) {
        match self.storage.save(&self.map) {
            Ok(()) => self.dirty = false,
            Err(e) => {
                self.dirty = true;
                tracing::warn!(error = %e, "failed to save bookmarks, will retry");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> BookmarkStore<MemoryStorage> {
        BookmarkStore::open(MemoryStorage::new())
    }

    #[test]
    fn toggle_and_protected_default() {
        let mut store = store();
        assert!(store.toggle("spellA", DEFAULT_COLLECTION));
        assert_eq!(store.map().items(DEFAULT_COLLECTION), ["spellA"]);
        assert!(!store.toggle("spellA", DEFAULT_COLLECTION));
        assert!(store.map().items(DEFAULT_COLLECTION).is_empty());
        assert!(!store.delete(DEFAULT_COLLECTION));
        assert!(store.map().contains(DEFAULT_COLLECTION));
    }

    #[test]
    fn toggle_into_missing_collection_uses_the_trimmed_name() {
        let mut store = store();
        assert!(!store.toggle("spellA", "   "));
        assert!(!store.toggle("spellA", ""));
        assert_eq!(store.names(), vec![DEFAULT_COLLECTION]);

        assert!(store.toggle("spellA", "  法术 "));
        assert_eq!(store.names(), vec![DEFAULT_COLLECTION, "法术"]);
        assert_eq!(store.map().items("法术"), ["spellA"]);
        assert!(!store.toggle("spellA", "法术"));
        assert!(store.map().items("法术").is_empty());
    }

    #[test]
    fn create_ignores_empty_and_taken_names() {
        let mut store = store();
        assert!(store.create("法术"));
        assert!(!store.create("法术"));
        assert!(!store.create("   "));
        assert_eq!(store.names(), vec![DEFAULT_COLLECTION, "法术"]);
    }

    #[test]
    fn rename_keeps_position_and_refuses_conflicts() {
        let mut store = store();
        store.create("a");
        store.create("b");
        assert!(store.rename("a", "c"));
        assert_eq!(store.names(), vec![DEFAULT_COLLECTION, "c", "b"]);
        assert!(!store.rename("c", "b"));
        assert!(!store.rename(DEFAULT_COLLECTION, "x"));
        assert!(!store.rename("missing", "x"));
        assert!(!store.rename("b", ""));
    }

    #[test]
    fn toggle_creates_missing_collection() {
        let mut store = store();
        assert!(store.toggle("x", "new"));
        assert_eq!(store.collections_containing("x"), vec!["new"]);
        assert!(store.is_bookmarked("x"));
    }

    #[test]
    fn clear_and_clear_all() {
        let mut store = store();
        store.toggle("x", "a");
        store.toggle("y", DEFAULT_COLLECTION);
        assert!(store.clear("a"));
        assert!(!store.clear("a"));
        assert!(store.map().contains("a"));

        store.clear_all();
        assert_eq!(store.map(), &CollectionMap::default());
        assert!(!store.is_bookmarked("y"));
    }

    #[test]
    fn every_mutation_is_saved() {
        let mut store = store();
        store.create("a");
        store.toggle("x", "a");
        store.move_collection("a", DEFAULT_COLLECTION);
        assert_eq!(store.storage().saves(), 3);
        let saved: CollectionMap =
            serde_json::from_str(store.storage().value().unwrap()).unwrap();
        assert_eq!(&saved, store.map());
        assert_eq!(saved.names(), vec!["a", DEFAULT_COLLECTION]);
    }

    #[test]
    fn failed_save_marks_dirty_until_flushed() {
        let mut store = store();
        store.storage_mut().set_read_only(true);
        store.toggle("x", DEFAULT_COLLECTION);
        assert!(store.is_dirty());
        assert!(store.flush().is_err());

        store.storage_mut().set_read_only(false);
        store.flush().unwrap();
        assert!(!store.is_dirty());
        assert!(store.storage().value().unwrap().contains("\"x\""));
    }

    #[test]
    fn malformed_storage_falls_back_to_default() {
        let store = BookmarkStore::open(MemoryStorage::with_value("{\"默认\": 3}"));
        assert_eq!(store.map(), &CollectionMap::default());

        let store = BookmarkStore::open(MemoryStorage::with_value("{\"x\": [\"a\"]}"));
        assert_eq!(store.names(), vec![DEFAULT_COLLECTION, "x"]);
    }

    #[test]
    fn import_renames_colliding_collections() {
        let mut source = store();
        source.toggle("fireball", "法术");
        source.toggle("rules", DEFAULT_COLLECTION);
        let code = source.export(&["法术", DEFAULT_COLLECTION]).unwrap();

        let mut target = store();
        target.toggle("shield", "法术");
        let stored = target.import(&code).unwrap();

        assert_eq!(stored, vec![format!("{DEFAULT_COLLECTION}_2"), "法术_2".to_string()]);
        assert_eq!(target.map().items("法术"), ["shield"]);
        assert_eq!(target.map().items("法术_2"), ["fireball"]);
        assert!(target.import("zz").is_err());
    }
}
