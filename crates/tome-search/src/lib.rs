//! Fuzzy record search.
//!
//! The browser treats search as a black box mapping a query string to ranked
//! records. Each registered record set is scored independently with
//! Jaro-Winkler similarity over its configured [`SearchKey`]s; a key that
//! contains the query verbatim counts as an exact hit.

mod index;

pub use index::{
    SearchConfig, SearchGroup, SearchHit, SearchIndex, SearchKey, SearchResults, normalize_text,
};
