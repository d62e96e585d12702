//! Directory identifiers (`dir:` + path joined with `/`).

use tome_model::RecordId;

/// Prefix marking a directory identifier.
pub const DIRECTORY_PREFIX: &str = "dir:";

/// Build the identifier of the directory at `path`.
pub fn directory_id<S: AsRef<str>>(path: &[S]) -> RecordId {
    let joined = path
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/");
    RecordId::new(format!("{DIRECTORY_PREFIX}{joined}"))
}

/// Split a directory identifier back into its path.
///
/// Returns `None` when `id` is not a directory identifier.
pub fn parse_directory_id(id: &str) -> Option<Vec<String>> {
    let joined = id.strip_prefix(DIRECTORY_PREFIX)?;
    if joined.is_empty() {
        return Some(Vec::new());
    }
    Some(joined.split('/').map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_paths() {
        let id = directory_id(&["第六章：装备", "精通词条"]);
        assert_eq!(id, "dir:第六章：装备/精通词条");
        assert_eq!(
            parse_directory_id(id.as_str()).unwrap(),
            vec!["第六章：装备", "精通词条"]
        );
    }

    #[test]
    fn rejects_plain_ids() {
        assert!(parse_directory_id("chapter1/a.htm").is_none());
        assert_eq!(parse_directory_id("dir:").unwrap(), Vec::<String>::new());
    }
}
