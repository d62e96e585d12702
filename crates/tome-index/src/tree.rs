//! Record index: a tree keyed by path segment.
//!
//! # Build
//!
//! 1. Every record walks its `pathParts` left to right, creating a node per
//!    unseen prefix, and is attached to the node matching its full path.
//! 2. A pre-order pass resolves each node's overview record: a direct file
//!    flagged `isOverview`, otherwise a file of the *parent* node whose
//!    normalized title or file stem equals the node's normalized name.
//!
//! The index is rebuilt from scratch on every data load and never patched.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use tome_model::Record;

use crate::dir::directory_id;
use crate::normalize::normalize_name;

// =============================================================================
// TREE NODE
// =============================================================================

/// A directory in the hierarchy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeNode {
    path: Vec<String>,
    title: String,
    children: BTreeMap<String, TreeNode>,
    files: Vec<Record>,
    overview: Option<Record>,
}

impl TreeNode {
    fn child_of(parent: &[String], segment: &str) -> Self {
        let mut path = parent.to_vec();
        path.push(segment.to_string());
        Self {
            path,
            title: segment.to_string(),
            ..Self::default()
        }
    }

    /// Path from the root; empty for the root itself.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Last path segment (empty for the root).
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether this is the implicit root node.
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Child nodes keyed by segment name.
    pub fn children(&self) -> &BTreeMap<String, TreeNode> {
        &self.children
    }

    /// Look up a direct child.
    pub fn child(&self, segment: &str) -> Option<&TreeNode> {
        self.children.get(segment)
    }

    /// Records attached directly to this node.
    pub fn files(&self) -> &[Record] {
        &self.files
    }

    /// Attached records excluding the overview document (sidebar listing).
    pub fn listed_files(&self) -> impl Iterator<Item = &Record> {
        self.files.iter().filter(|record| !record.is_overview)
    }

    /// Landing document for this directory, if any.
    pub fn overview(&self) -> Option<&Record> {
        self.overview.as_ref()
    }

    /// Whether the node has child directories.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Directory identifier (`dir:a/b`).
    pub fn id(&self) -> tome_model::RecordId {
        directory_id(&self.path)
    }

    /// Synthetic category record standing in for this directory.
    pub fn as_record(&self) -> Record {
        Record::category(
            self.id(),
            self.title.clone(),
            self.path.clone(),
            self.overview.as_ref().and_then(|record| record.path.clone()),
        )
    }
}

// =============================================================================
// RECORD INDEX
// =============================================================================

/// Navigable hierarchy built from a flat record list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordIndex {
    root: TreeNode,
    record_count: usize,
}

impl RecordIndex {
    /// Build the index from a flat record list.
    pub fn build<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut root = TreeNode::default();
        let mut record_count = 0;

        for record in records {
            if record.path_parts.is_empty() {
                tracing::warn!(id = %record.id, "Record has no path, attaching to root");
            }
            let mut node = &mut root;
            for segment in &record.path_parts {
                let parent_path = node.path.clone();
                node = node
                    .children
                    .entry(segment.clone())
                    .or_insert_with(|| TreeNode::child_of(&parent_path, segment));
            }
            node.files.push(record.clone());
            record_count += 1;
        }

        resolve_overviews(&mut root);

        tracing::debug!(records = record_count, "Built record index");
        Self { root, record_count }
    }

    /// The implicit root node.
    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Number of records attached across the tree.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Find the node at `path`; the empty path is the root.
    pub fn node<S: AsRef<str>>(&self, path: &[S]) -> Option<&TreeNode> {
        path.iter()
            .try_fold(&self.root, |node, segment| node.child(segment.as_ref()))
    }

    /// Synthetic category record for the directory at `path`.
    ///
    /// Returns `None` for the root and for unknown paths.
    pub fn directory_record<S: AsRef<str>>(&self, path: &[S]) -> Option<Record> {
        if path.is_empty() {
            return None;
        }
        self.node(path).map(TreeNode::as_record)
    }

    /// All non-root nodes, parents before children.
    pub fn nodes(&self) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        let mut pending: Vec<&TreeNode> = self.root.children.values().rev().collect();
        while let Some(node) = pending.pop() {
            out.push(node);
            pending.extend(node.children.values().rev());
        }
        out
    }

    /// Indented text outline of the tree.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for node in self.nodes() {
            let depth = node.path.len() - 1;
            let _ = write!(out, "{}{}", "  ".repeat(depth), node.title);
            let _ = write!(out, " ({} files)", node.files.len());
            if let Some(overview) = &node.overview {
                let _ = write!(out, " -> {}", overview.id);
            }
            out.push('\n');
        }
        out
    }
}

/// Top-level nodes only take a flagged overview; the root's files are not
/// searched for a title match.
fn resolve_overviews(parent: &mut TreeNode) {
    let siblings: &[Record] = if parent.is_root() { &[] } else { &parent.files };
    for child in parent.children.values_mut() {
        let normalized = normalize_name(&child.title);
        child.overview = child
            .files
            .iter()
            .find(|record| record.is_overview)
            .or_else(|| {
                siblings.iter().find(|record| {
                    normalize_name(&record.title) == normalized
                        || normalize_name(record.file_stem()) == normalized
                })
            })
            .cloned();
    }
    for child in parent.children.values_mut() {
        resolve_overviews(child);
    }
}
