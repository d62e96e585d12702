//! Share codes: collections as percent-encoded JSON wrapped in base64.
//!
//! The percent-encoding set is the one URI components use, so codes are
//! interchangeable with ones made by `btoa(encodeURIComponent(json))`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::collection::CollectionMap;
use crate::error::{BookmarkError, Result};

/// Bytes a URI component leaves unescaped besides ASCII alphanumerics.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Encode collections as a share code.
pub fn encode(map: &CollectionMap) -> Result<String> {
    let json =
        serde_json::to_string(map).map_err(|source| BookmarkError::Serialization { source })?;
    let escaped = utf8_percent_encode(&json, URI_COMPONENT).to_string();
    Ok(STANDARD.encode(escaped))
}

/// Decode and validate a share code; surrounding whitespace is ignored.
pub fn decode(code: &str) -> Result<CollectionMap> {
    let bytes = STANDARD
        .decode(code.trim())
        .map_err(|source| BookmarkError::ShareCodeEncoding { source })?;
    let escaped = String::from_utf8(bytes).map_err(|err| BookmarkError::ShareCodeText {
        source: err.utf8_error(),
    })?;
    let json = percent_decode_str(&escaped)
        .decode_utf8()
        .map_err(|source| BookmarkError::ShareCodeText { source })?;
    serde_json::from_str(&json).map_err(|source| BookmarkError::ShareCodeFormat { source })
}

/// First free name among `name`, `name_2`, `name_3`, ...
pub(crate) fn unique_name(map: &CollectionMap, name: &str) -> String {
    if !map.contains(name) {
        return name.to_string();
    }
    (2..)
        .map(|counter| format!("{name}_{counter}"))
        .find(|candidate| !map.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(text: &str) -> String {
        STANDARD.encode(text)
    }

    #[test]
    fn decode_accepts_padded_codes() {
        let mut map = CollectionMap::empty();
        map.insert("法术", vec!["fireball".into()]);
        let code = encode(&map).unwrap();
        assert_eq!(decode(&format!("  {code}\n")).unwrap(), map);
    }

    #[test]
    fn codes_match_uri_component_encoding() {
        let mut map = CollectionMap::empty();
        map.insert("默认", vec!["a".into()]);
        assert_eq!(
            encode(&map).unwrap(),
            "JTdCJTIyJUU5JUJCJTk4JUU4JUFFJUE0JTIyJTNBJTVCJTIyYSUyMiU1RCU3RA=="
        );
    }

    #[test]
    fn decodes_codes_from_the_web_app() {
        // btoa(encodeURIComponent('{"默认":["spells/fireball.htm"],"法术 列表":["ch1/a(1).htm"]}'))
        let code = "JTdCJTIyJUU5JUJCJTk4JUU4JUFFJUE0JTIyJTNBJTVCJTIyc3BlbGxzJTJGZmlyZWJhbGwuaHRtJTIyJTVEJTJDJTIyJUU2JUIzJTk1JUU2JTlDJUFGJTIwJUU1JTg4JTk3JUU4JUExJUE4JTIyJTNBJTVCJTIyY2gxJTJGYSgxKS5odG0lMjIlNUQlN0Q=";
        let map = decode(code).unwrap();
        assert_eq!(map.names(), vec!["默认", "法术 列表"]);
        assert_eq!(map.items("默认"), ["spells/fireball.htm"]);
        assert_eq!(map.items("法术 列表"), ["ch1/a(1).htm"]);
        assert_eq!(encode(&map).unwrap(), code);
    }

    #[test]
    fn invalid_codes_are_rejected() {
        assert!(matches!(
            decode("not base64!"),
            Err(BookmarkError::ShareCodeEncoding { .. })
        ));
        assert!(matches!(
            decode(&wrap("%E9%BB")),
            Err(BookmarkError::ShareCodeText { .. })
        ));
        assert!(matches!(
            decode(&wrap("%5B%22a%22%5D")),
            Err(BookmarkError::ShareCodeFormat { .. })
        ));
        assert!(decode(&wrap(r#"{"a": [1]}"#)).is_err());
    }

    #[test]
    fn unique_name_appends_counter() {
        let mut map = CollectionMap::default();
        assert_eq!(unique_name(&map, "a"), "a");
        map.insert("a", Vec::new());
        map.insert("a_2", Vec::new());
        assert_eq!(unique_name(&map, "a"), "a_3");
    }
}
