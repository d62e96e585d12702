//! Hierarchical record index for the Tome reference browser.
//!
//! [`RecordIndex`] turns the flat document list into a tree of
//! [`TreeNode`]s; [`Catalog`] bundles the index with the flat record sets
//! and implements the record resolution contract.

mod catalog;
mod dir;
mod listing;
mod normalize;
mod tree;

pub use catalog::Catalog;
pub use dir::{DIRECTORY_PREFIX, directory_id, parse_directory_id};
pub use listing::{
    CREATURE_APPENDIX_MARKER, UNRATED, challenge_rating, parse_challenge_rating,
};
pub use normalize::normalize_name;
pub use tree::{RecordIndex, TreeNode};
