//! Record resolution contract.

use crate::record::Record;

/// Turns a stored identifier back into a live record.
///
/// Implementations return `None` for identifiers that no longer resolve
/// (stale references); callers degrade to "no selection".
pub trait ResolveRecord {
    /// Resolve an identifier, returning the first match.
    fn resolve(&self, id: &str) -> Option<Record>;
}

impl<T: ResolveRecord + ?Sized> ResolveRecord for &T {
    fn resolve(&self, id: &str) -> Option<Record> {
        (**self).resolve(id)
    }
}

/// Resolves against each source in order, returning the first match.
impl<T: ResolveRecord> ResolveRecord for [T] {
    fn resolve(&self, id: &str) -> Option<Record> {
        self.iter().find_map(|source| source.resolve(id))
    }
}

impl<T: ResolveRecord> ResolveRecord for Vec<T> {
    fn resolve(&self, id: &str) -> Option<Record> {
        self.as_slice().resolve(id)
    }
}
