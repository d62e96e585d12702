//! Named, ordered bookmark collections.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tome_model::RecordId;

/// Name of the collection that always exists and cannot be deleted.
pub const DEFAULT_COLLECTION: &str = "默认";

/// A named, ordered list of record identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkCollection {
    pub name: String,
    pub items: Vec<RecordId>,
}

impl BookmarkCollection {
    /// Create an empty collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Whether the collection holds `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item == id)
    }

    /// Whether this is the protected default collection.
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_COLLECTION
    }
}

// =============================================================================
// COLLECTION MAP
// =============================================================================

/// Collections keyed by name, in display order.
///
/// Persisted as a JSON object (`{"name": ["id", ...], ...}`) whose key order
/// is the display order. Deserialization is the validation step: anything
/// other than an object of string arrays is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionMap {
    collections: Vec<BookmarkCollection>,
}

impl Default for CollectionMap {
    /// Only the empty default collection.
    fn default() -> Self {
        Self {
            collections: vec![BookmarkCollection::new(DEFAULT_COLLECTION)],
        }
    }
}

impl CollectionMap {
    /// A map without any collection, not even the default one.
    pub fn empty() -> Self {
        Self {
            collections: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Collections in display order.
    pub fn iter(&self) -> impl Iterator<Item = &BookmarkCollection> {
        self.collections.iter()
    }

    /// Collection names in display order.
    pub fn names(&self) -> Vec<String> {
        self.collections.iter().map(|c| c.name.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Display index of a collection.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.collections.iter().position(|c| c.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&BookmarkCollection> {
        self.collections.iter().find(|c| c.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut BookmarkCollection> {
        self.collections.iter_mut().find(|c| c.name == name)
    }

    /// Items of a collection, empty when it does not exist.
    pub fn items(&self, name: &str) -> &[RecordId] {
        self.get(name)
            .map(|c| c.items.as_slice())
            .unwrap_or_default()
    }

    /// Insert or overwrite a collection; new names are appended.
    pub fn insert(&mut self, name: impl Into<String>, items: Vec<RecordId>) {
        let name = name.into();
        match self.get_mut(&name) {
            Some(existing) => existing.items = items,
            None => self.collections.push(BookmarkCollection { name, items }),
        }
    }

    /// Remove a collection, returning it.
    pub fn remove(&mut self, name: &str) -> Option<BookmarkCollection> {
        let index = self.position(name)?;
        Some(self.collections.remove(index))
    }

    /// Rename a collection in place, keeping its position.
    pub(crate) fn rename(&mut self, old: &str, new: impl Into<String>) -> bool {
        match self.get_mut(old) {
            Some(collection) => {
                collection.name = new.into();
                true
            }
            None => false,
        }
    }

    /// Reorder collections to match `names`, which must be a permutation of
    /// the current names.
    pub(crate) fn reorder(&mut self, names: &[String]) -> bool {
        let is_permutation = names.len() == self.collections.len()
            && names.iter().all(|name| self.contains(name))
            && names
                .iter()
                .enumerate()
                .all(|(i, name)| !names[..i].contains(name));
        if !is_permutation {
            return false;
        }
        self.collections
            .sort_by_key(|c| names.iter().position(|n| n == &c.name));
        true
    }

    /// Whether any collection holds `id`.
    pub fn contains_item(&self, id: &str) -> bool {
        self.collections.iter().any(|c| c.contains(id))
    }

    /// Make sure the default collection exists (at the front when missing).
    pub(crate) fn ensure_default(&mut self) -> bool {
        if self.contains(DEFAULT_COLLECTION) {
            return false;
        }
        self.collections
            .insert(0, BookmarkCollection::new(DEFAULT_COLLECTION));
        true
    }
}

impl<'a> IntoIterator for &'a CollectionMap {
    type Item = &'a BookmarkCollection;
    type IntoIter = std::slice::Iter<'a, BookmarkCollection>;

    fn into_iter(self) -> Self::IntoIter {
        self.collections.iter()
    }
}

// =============================================================================
// SERDE
// =============================================================================

impl Serialize for CollectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.collections.len()))?;
        for collection in &self.collections {
            map.serialize_entry(&collection.name, &collection.items)?;
        }
        map.end()
    }
}

struct CollectionMapVisitor;

impl<'de> Visitor<'de> for CollectionMapVisitor {
    type Value = CollectionMap;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object mapping collection names to arrays of record ids")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = CollectionMap::empty();
        while let Some((name, items)) = access.next_entry::<String, Vec<RecordId>>()? {
            map.insert(name, items);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for CollectionMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CollectionMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_holds_only_the_default_collection() {
        let map = CollectionMap::default();
        assert_eq!(map.names(), vec![DEFAULT_COLLECTION.to_string()]);
        assert!(map.items(DEFAULT_COLLECTION).is_empty());
    }

    #[test]
    fn json_preserves_key_order() {
        let json = r#"{"zeta":["a"],"默认":[],"alpha":["b","c"]}"#;
        let map: CollectionMap = serde_json::from_str(json).unwrap();
        assert_eq!(map.names(), vec!["zeta", DEFAULT_COLLECTION, "alpha"]);
        assert_eq!(serde_json::to_string(&map).unwrap(), json);
    }

    #[test]
    fn rejects_wrong_shapes() {
        for bad in [
            r#"["a","b"]"#,
            r#"{"默认":"a"}"#,
            r#"{"默认":[1,2]}"#,
            r#"null"#,
            r#"{"默认":[null]}"#,
        ] {
            assert!(serde_json::from_str::<CollectionMap>(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn reorder_requires_a_permutation() {
        let mut map = CollectionMap::default();
        map.insert("a", Vec::new());
        map.insert("b", Vec::new());

        assert!(map.reorder(&["b".into(), DEFAULT_COLLECTION.into(), "a".into()]));
        assert_eq!(map.names(), vec!["b", DEFAULT_COLLECTION, "a"]);

        assert!(!map.reorder(&["a".into(), "b".into()]));
        assert!(!map.reorder(&["a".into(), "b".into(), "c".into()]));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn ensure_default_inserts_at_front() {
        let mut map: CollectionMap = serde_json::from_str(r#"{"x":["1"]}"#).unwrap();
        assert!(map.ensure_default());
        assert_eq!(map.names(), vec![DEFAULT_COLLECTION, "x"]);
        assert!(!map.ensure_default());
    }
}
