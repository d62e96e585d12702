//! Flat record sets and their placement rules.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::record::{Record, RecordId};
use crate::resolve::ResolveRecord;

/// How a flat set's records are placed in the hierarchy when resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// Use the record's own `pathParts`.
    #[default]
    AsIs,

    /// Use the record's own `pathParts`, or this path when it has none.
    Fallback { path: Vec<String> },

    /// Always place under `prefix`, optionally followed by the value of
    /// one of the record's string attributes.
    Under {
        prefix: Vec<String>,
        attribute: Option<String>,
    },
}

impl Placement {
    /// Apply the placement rule to a record.
    pub fn place(&self, record: &mut Record) {
        match self {
            Self::AsIs => {}
            Self::Fallback { path } => {
                if record.path_parts.is_empty() {
                    record.path_parts = path.clone();
                }
            }
            Self::Under { prefix, attribute } => {
                let mut parts = prefix.clone();
                if let Some(value) = attribute.as_deref().and_then(|key| record.attribute_str(key)) {
                    parts.push(value.to_string());
                }
                record.path_parts = parts;
            }
        }
    }
}

/// A named, flat list of records with id lookup.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    name: String,
    records: Vec<Record>,
    placement: Placement,
    by_id: HashMap<RecordId, usize>,
}

impl RecordSet {
    /// Build a set; later duplicates of an id are dropped.
    pub fn new(name: impl Into<String>, records: Vec<Record>, placement: Placement) -> Self {
        let name = name.into();
        let mut by_id = HashMap::with_capacity(records.len());
        let mut kept = Vec::with_capacity(records.len());
        for record in records {
            if by_id.contains_key(&record.id) {
                tracing::warn!(set = %name, id = %record.id, "Dropping duplicate record id");
                continue;
            }
            by_id.insert(record.id.clone(), kept.len());
            kept.push(record);
        }
        Self {
            name,
            records: kept,
            placement,
            by_id,
        }
    }

    /// Parse a set from a JSON array of records.
    pub fn from_json(name: impl Into<String>, json: &str, placement: Placement) -> Result<Self> {
        let name = name.into();
        let records: Vec<Record> =
            serde_json::from_str(json).map_err(|source| ModelError::Parse {
                set: name.clone(),
                source,
            })?;
        Ok(Self::new(name, records, placement))
    }

    /// Set name (e.g. "spells").
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records in their original order, without placement applied.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Take the records back out, e.g. to enrich them before rebuilding.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Placement rule applied on lookup.
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the set holds a record with this id.
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Find a record by id and apply the placement rule to a copy of it.
    pub fn find(&self, id: &str) -> Option<Record> {
        let index = *self.by_id.get(id)?;
        let mut record = self.records[index].clone();
        self.placement.place(&mut record);
        Some(record)
    }
}

impl ResolveRecord for RecordSet {
    fn resolve(&self, id: &str) -> Option<Record> {
        self.find(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feat(id: &str, category: &str) -> Record {
        Record::new(id, id, Vec::<String>::new()).with_attribute("category", category)
    }

    #[test]
    fn fallback_only_fills_missing_paths() {
        let placement = Placement::Fallback {
            path: vec!["法术".to_string()],
        };
        let set = RecordSet::new(
            "spells",
            vec![
                Record::new("s1", "Fireball", Vec::<String>::new()),
                Record::new("s2", "Shield", ["第七章：法术", "A"]),
            ],
            placement,
        );
        assert_eq!(set.find("s1").unwrap().path_parts, vec!["法术"]);
        assert_eq!(set.find("s2").unwrap().path_parts, vec!["第七章：法术", "A"]);
    }

    #[test]
    fn under_appends_attribute_value() {
        let placement = Placement::Under {
            prefix: vec!["第五章：专长".to_string()],
            attribute: Some("category".to_string()),
        };
        let set = RecordSet::new("feats", vec![feat("f1", "起源专长")], placement);
        let resolved = set.find("f1").unwrap();
        assert_eq!(resolved.path_parts, vec!["第五章：专长", "起源专长"]);
        // The stored copy is untouched.
        assert!(set.records()[0].path_parts.is_empty());
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let set = RecordSet::new(
            "docs",
            vec![
                Record::new("a", "First", ["Ch1"]),
                Record::new("a", "Second", ["Ch1"]),
            ],
            Placement::AsIs,
        );
        assert_eq!(set.len(), 1);
        assert_eq!(set.find("a").unwrap().title, "First");
    }

    #[test]
    fn from_json_reports_set_name() {
        let err = RecordSet::from_json("feats", "{not json", Placement::AsIs).unwrap_err();
        assert!(matches!(err, ModelError::Parse { ref set, .. } if set == "feats"));
    }
}
