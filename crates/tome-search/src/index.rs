//! Search index implementation.

use std::cmp::Ordering;

use rapidfuzz::distance::jaro_winkler::similarity as jaro_similarity;
use serde::{Deserialize, Serialize};
use tome_model::{Record, RecordSet};

/// Score given to a field that contains the query verbatim.
const CONTAINS_SCORE: f64 = 1.0;
/// Slight penalty so prefix/substring hits on later keys rank below title hits.
const SECONDARY_KEY_FACTOR: f64 = 0.98;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Which parts of a record are matched against the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", content = "name", rename_all = "snake_case")]
pub enum SearchKey {
    /// The record title.
    Title,
    /// A string attribute (e.g. `titleEn`, `category`).
    Attribute(String),
    /// Every path segment.
    PathParts,
}

/// Thresholds applied to every query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Minimum similarity (0.0 - 1.0) for a record to be returned.
    pub threshold: f64,
    /// Maximum hits per group.
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            limit: 50,
        }
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// A single scored record.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub record: Record,
    pub score: f64,
}

/// Hits from one record set.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchGroup {
    pub name: String,
    pub hits: Vec<SearchHit>,
}

/// Hits grouped by record set, in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub groups: Vec<SearchGroup>,
}

impl SearchResults {
    /// Hits of the named group.
    pub fn group(&self, name: &str) -> &[SearchHit] {
        self.groups
            .iter()
            .find(|group| group.name == name)
            .map(|group| group.hits.as_slice())
            .unwrap_or_default()
    }

    /// Total number of hits across groups.
    pub fn total(&self) -> usize {
        self.groups.iter().map(|group| group.hits.len()).sum()
    }

    /// Whether no group has any hit.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

// =============================================================================
// INDEX
// =============================================================================

#[derive(Debug, Clone)]
struct Entry {
    record: Record,
    fields: Vec<String>,
}

#[derive(Debug, Clone)]
struct Group {
    name: String,
    entries: Vec<Entry>,
}

/// Fuzzy search over several record sets.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    groups: Vec<Group>,
    config: SearchConfig,
}

impl SearchIndex {
    /// Create an empty index.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            groups: Vec::new(),
            config,
        }
    }

    /// Register a record set, matching the given keys in priority order.
    #[must_use]
    pub fn with_set(mut self, set: &RecordSet, keys: &[SearchKey]) -> Self {
        self.add_set(set, keys);
        self
    }

    /// Register a record set, matching the given keys in priority order.
    pub fn add_set(&mut self, set: &RecordSet, keys: &[SearchKey]) {
        let entries = set
            .records()
            .iter()
            .map(|record| Entry {
                fields: extract_fields(record, keys),
                record: record.clone(),
            })
            .collect();
        self.groups.push(Group {
            name: set.name().to_string(),
            entries,
        });
    }

    /// Active configuration.
    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// Run a query. An empty query yields empty groups.
    pub fn search(&self, query: &str) -> SearchResults {
        let query = normalize_text(query);
        let groups = self
            .groups
            .iter()
            .map(|group| SearchGroup {
                name: group.name.clone(),
                hits: if query.is_empty() {
                    Vec::new()
                } else {
                    self.search_group(group, &query)
                },
            })
            .collect::<Vec<_>>();
        if !query.is_empty() {
            tracing::debug!(
                query = %query,
                hits = groups.iter().map(|g| g.hits.len()).sum::<usize>(),
                "Search completed"
            );
        }
        SearchResults { groups }
    }

    fn search_group(&self, group: &Group, query: &str) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = group
            .entries
            .iter()
            .filter_map(|entry| {
                let score = score_fields(&entry.fields, query);
                (score >= self.config.threshold).then(|| SearchHit {
                    record: entry.record.clone(),
                    score,
                })
            })
            .collect();
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.record.title.cmp(&b.record.title))
        });
        hits.truncate(self.config.limit);
        hits
    }
}

fn extract_fields(record: &Record, keys: &[SearchKey]) -> Vec<String> {
    let mut fields = Vec::new();
    for key in keys {
        match key {
            SearchKey::Title => fields.push(normalize_text(&record.title)),
            SearchKey::Attribute(name) => {
                if let Some(value) = record.attribute_str(name) {
                    fields.push(normalize_text(value));
                }
            }
            SearchKey::PathParts => {
                fields.extend(record.path_parts.iter().map(|part| normalize_text(part)));
            }
        }
    }
    fields.retain(|field| !field.is_empty());
    fields
}

fn score_fields(fields: &[String], query: &str) -> f64 {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let raw = if field.contains(query) {
                CONTAINS_SCORE
            } else {
                jaro_similarity(query.chars(), field.chars())
            };
            if i == 0 { raw } else { raw * SECONDARY_KEY_FACTOR }
        })
        .fold(0.0, f64::max)
}

/// Lowercase and collapse whitespace.
pub fn normalize_text(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
