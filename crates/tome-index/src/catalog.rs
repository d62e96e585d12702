//! Catalog: the record index plus the flat record sets.

use tome_model::{Record, RecordSet, ResolveRecord};

use crate::dir::parse_directory_id;
use crate::tree::RecordIndex;

/// Everything loaded for one data generation.
///
/// Resolution order for stored identifiers: the directory table, then each
/// lookup set in order, then the hierarchical documents.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    index: RecordIndex,
    documents: RecordSet,
    lookups: Vec<RecordSet>,
}

impl Catalog {
    /// Build the catalog; the index is derived from `documents`.
    pub fn new(documents: RecordSet, lookups: Vec<RecordSet>) -> Self {
        let index = RecordIndex::build(documents.records());
        tracing::info!(
            documents = documents.len(),
            lookup_sets = lookups.len(),
            "Catalog built"
        );
        Self {
            index,
            documents,
            lookups,
        }
    }

    /// The hierarchical index.
    pub fn index(&self) -> &RecordIndex {
        &self.index
    }

    /// Hierarchical documents.
    pub fn documents(&self) -> &RecordSet {
        &self.documents
    }

    /// Flat lookup sets in resolution order.
    pub fn lookups(&self) -> &[RecordSet] {
        &self.lookups
    }

    /// Find a lookup set by name.
    pub fn lookup(&self, name: &str) -> Option<&RecordSet> {
        self.lookups.iter().find(|set| set.name() == name)
    }

    /// All sets, lookups first and documents last.
    pub fn sets(&self) -> impl Iterator<Item = &RecordSet> {
        self.lookups.iter().chain(std::iter::once(&self.documents))
    }
}

impl ResolveRecord for Catalog {
    fn resolve(&self, id: &str) -> Option<Record> {
        if let Some(path) = parse_directory_id(id) {
            return self.index.directory_record(&path);
        }
        self.lookups
            .resolve(id)
            .or_else(|| self.documents.resolve(id))
    }
}
