//! Data directory loading.
//!
//! A data directory holds JSON arrays of records:
//!
//! | File                 | Set         | Required | Placement                         |
//! |----------------------|-------------|----------|-----------------------------------|
//! | `data.json`          | `documents` | yes      | as-is                             |
//! | `data-spells.json`   | `spells`    | no       | `法术` when the record has no path |
//! | `data-feats.json`    | `feats`     | no       | `第五章：专长` / `category`        |
//! | `data-masteries.json`| `masteries` | no       | `第六章：装备` / `精通词条`         |
//!
//! An optional `data-monsters.json` holds creature metadata. It is not a
//! record set of its own: its entries are joined onto the stat block
//! documents by content path.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tome_index::Catalog;
use tome_model::{ModelError, Placement, Record, RecordSet};
use tome_search::{SearchConfig, SearchIndex, SearchKey};

use crate::error::LoadError;

pub const DOCUMENTS_FILE: &str = "data.json";
pub const DOCUMENTS_SET: &str = "documents";
pub const SPELLS_SET: &str = "spells";
pub const FEATS_SET: &str = "feats";
pub const MASTERIES_SET: &str = "masteries";
pub const MONSTERS_FILE: &str = "data-monsters.json";

/// Document category of the creature stat blocks.
pub const CREATURE_CATEGORY: &str = "附录 B：生物数据卡";

/// Attributes copied from a creature entry onto its stat block document.
const CREATURE_ATTRIBUTES: &[&str] = &["cr", "subDivision", "alignment", "titleEn"];

/// An optional flat record set stored next to the documents.
struct LookupSource {
    set: &'static str,
    file: &'static str,
    placement: fn() -> Placement,
}

const LOOKUP_SOURCES: &[LookupSource] = &[
    LookupSource {
        set: SPELLS_SET,
        file: "data-spells.json",
        placement: spell_placement,
    },
    LookupSource {
        set: FEATS_SET,
        file: "data-feats.json",
        placement: feat_placement,
    },
    LookupSource {
        set: MASTERIES_SET,
        file: "data-masteries.json",
        placement: mastery_placement,
    },
];

fn spell_placement() -> Placement {
    Placement::Fallback {
        path: vec!["法术".to_string()],
    }
}

fn feat_placement() -> Placement {
    Placement::Under {
        prefix: vec!["第五章：专长".to_string()],
        attribute: Some("category".to_string()),
    }
}

fn mastery_placement() -> Placement {
    Placement::Under {
        prefix: vec!["第六章：装备".to_string(), "精通词条".to_string()],
        attribute: None,
    }
}

/// Load every record set in `dir` and build the catalog.
///
/// `data.json` is required; lookup files that do not exist are skipped.
pub fn load_catalog(dir: &Path) -> Result<Catalog, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut documents = read_set(dir, DOCUMENTS_SET, DOCUMENTS_FILE, Placement::AsIs)?
        .ok_or_else(|| LoadError::FileNotFound {
            path: dir.join(DOCUMENTS_FILE),
        })?;

    match read_creatures(dir)? {
        Some(creatures) => documents = join_creatures(documents, &creatures),
        None => tracing::debug!(file = MONSTERS_FILE, "optional data file absent"),
    }

    let mut lookups = Vec::new();
    for source in LOOKUP_SOURCES {
        match read_set(dir, source.set, source.file, (source.placement)())? {
            Some(set) => lookups.push(set),
            None => tracing::debug!(file = source.file, "optional data file absent"),
        }
    }

    Ok(Catalog::new(documents, lookups))
}

/// Read one record set; `Ok(None)` when the file does not exist.
fn read_set(
    dir: &Path,
    set: &str,
    file: &str,
    placement: Placement,
) -> Result<Option<RecordSet>, LoadError> {
    let path = dir.join(file);
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(LoadError::FileRead { path, source }),
    };
    let records = RecordSet::from_json(set, &json, placement)
        .map_err(|source| LoadError::Parse { path, source })?;
    tracing::info!(set, records = records.len(), "loaded record set");
    Ok(Some(records))
}

// =============================================================================
// CREATURE METADATA
// =============================================================================

/// One entry of the creature metadata file.
#[derive(Debug, Deserialize)]
struct CreatureEntry {
    #[serde(default)]
    path: Option<String>,
    #[serde(flatten)]
    fields: serde_json::Map<String, Value>,
}

fn read_creatures(dir: &Path) -> Result<Option<Vec<CreatureEntry>>, LoadError> {
    let path = dir.join(MONSTERS_FILE);
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(LoadError::FileRead { path, source }),
    };
    let entries: Vec<CreatureEntry> = serde_json::from_str(&json).map_err(|source| {
        LoadError::Parse {
            path: path.clone(),
            source: ModelError::Parse {
                set: "monsters".to_string(),
                source,
            },
        }
    })?;
    tracing::info!(entries = entries.len(), "loaded creature metadata");
    Ok(Some(entries))
}

/// Content paths compare with `.htm` and `.html` treated alike.
fn content_key(path: &str) -> Cow<'_, str> {
    if path.ends_with(".htm") {
        Cow::Owned(format!("{path}l"))
    } else {
        Cow::Borrowed(path)
    }
}

/// Copy creature metadata onto the stat block documents that share its
/// content path. The first entry for a path wins.
fn join_creatures(documents: RecordSet, creatures: &[CreatureEntry]) -> RecordSet {
    let mut by_path: HashMap<Cow<'_, str>, &CreatureEntry> = HashMap::new();
    for creature in creatures {
        if let Some(path) = creature.path.as_deref() {
            by_path.entry(content_key(path)).or_insert(creature);
        }
    }

    let name = documents.name().to_string();
    let placement = documents.placement().clone();
    let mut joined = 0;
    let records: Vec<Record> = documents
        .into_records()
        .into_iter()
        .map(|mut record| {
            let creature = is_stat_block(&record)
                .then(|| record.path.as_deref())
                .flatten()
                .and_then(|path| by_path.get(content_key(path).as_ref()));
            if let Some(creature) = creature {
                for key in CREATURE_ATTRIBUTES {
                    if let Some(value) = creature.fields.get(*key).filter(|v| !v.is_null()) {
                        record.attributes.insert((*key).to_string(), value.clone());
                    }
                }
                joined += 1;
            }
            record
        })
        .collect();

    tracing::debug!(joined, "joined creature metadata");
    RecordSet::new(name, records, placement)
}

fn is_stat_block(record: &Record) -> bool {
    !record.is_overview && record.attribute_str("category") == Some(CREATURE_CATEGORY)
}

// =============================================================================
// SEARCH
// =============================================================================

/// Search keys per set, in priority order.
fn search_keys(set: &str) -> Vec<SearchKey> {
    let title_en = SearchKey::Attribute("titleEn".to_string());
    match set {
        DOCUMENTS_SET => vec![SearchKey::Title, SearchKey::PathParts],
        FEATS_SET => vec![
            SearchKey::Title,
            title_en,
            SearchKey::Attribute("category".to_string()),
        ],
        _ => vec![SearchKey::Title, title_en],
    }
}

/// Build the search index over every set of the catalog, documents first.
pub fn build_search_index(catalog: &Catalog, config: SearchConfig) -> SearchIndex {
    let mut index = SearchIndex::new(config);
    index.add_set(catalog.documents(), &search_keys(DOCUMENTS_SET));
    for set in catalog.lookups() {
        index.add_set(set, &search_keys(set.name()));
    }
    index
}
