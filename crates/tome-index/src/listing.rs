//! Directory listings.
//!
//! Most directories list their documents in source order. The creature
//! appendix lists them by challenge rating, weakest first.

use std::cmp::Ordering;

use serde_json::Value;
use tome_model::Record;

use crate::tree::TreeNode;

/// Path segment marker of the creature stat block appendix.
pub const CREATURE_APPENDIX_MARKER: &str = "附录 B";

/// Rating given to records with a missing or unreadable challenge rating.
pub const UNRATED: f64 = 999.0;

/// Numeric value of a challenge rating such as `"1/4"`, `"5"` or `"Unknown"`.
///
/// Only the fractions `1/8`, `1/4` and `1/2` are recognised; other values
/// are read as a leading decimal number. Anything else is [`UNRATED`].
pub fn parse_challenge_rating(raw: &str) -> f64 {
    match raw {
        "" | "Unknown" => UNRATED,
        "1/8" => 0.125,
        "1/4" => 0.25,
        "1/2" => 0.5,
        _ => leading_number(raw).unwrap_or(UNRATED),
    }
}

/// Challenge rating stored in a record's `cr` attribute.
pub fn challenge_rating(record: &Record) -> f64 {
    match record.attributes.get("cr") {
        Some(Value::String(raw)) => parse_challenge_rating(raw),
        Some(Value::Number(number)) => number.as_f64().unwrap_or(UNRATED),
        _ => UNRATED,
    }
}

/// The longest decimal prefix of `raw` (`"5 (1,800 XP)"` reads as 5).
fn leading_number(raw: &str) -> Option<f64> {
    let raw = raw.trim_start();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in raw.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            '0'..='9' => {}
            _ => break,
        }
        end = i + c.len_utf8();
    }
    raw[..end].parse().ok().filter(|value: &f64| value.is_finite())
}

fn by_rating_then_title(a: &Record, b: &Record) -> Ordering {
    challenge_rating(a)
        .total_cmp(&challenge_rating(b))
        .then_with(|| a.title.cmp(&b.title))
}

impl TreeNode {
    /// Whether this directory lies inside the creature appendix.
    pub fn is_creature_directory(&self) -> bool {
        self.path()
            .iter()
            .any(|segment| segment.contains(CREATURE_APPENDIX_MARKER))
    }

    /// Documents shown in the directory view, without the overview.
    ///
    /// Inside the creature appendix they are sorted by challenge rating,
    /// then title.
    pub fn listing(&self) -> Vec<&Record> {
        let mut files: Vec<&Record> = self.listed_files().collect();
        if self.is_creature_directory() {
            files.sort_by(|a, b| by_rating_then_title(a, b));
        }
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordIndex;

    const APPENDIX: &str = "附录 B：生物数据卡";

    fn creature(id: &str, title: &str, cr: Value) -> Record {
        Record::new(id, title, [APPENDIX]).with_attribute("cr", cr)
    }

    #[test]
    fn parses_fractions_numbers_and_unknowns() {
        assert_eq!(parse_challenge_rating("1/8"), 0.125);
        assert_eq!(parse_challenge_rating("1/4"), 0.25);
        assert_eq!(parse_challenge_rating("1/2"), 0.5);
        assert_eq!(parse_challenge_rating("0"), 0.0);
        assert_eq!(parse_challenge_rating("17"), 17.0);
        assert_eq!(parse_challenge_rating("5 (1,800 XP)"), 5.0);
        assert_eq!(parse_challenge_rating(""), UNRATED);
        assert_eq!(parse_challenge_rating("Unknown"), UNRATED);
        assert_eq!(parse_challenge_rating("?"), UNRATED);
        assert_eq!(parse_challenge_rating("3/4"), 3.0);
    }

    #[test]
    fn reads_string_and_numeric_attributes() {
        assert_eq!(challenge_rating(&creature("a", "A", Value::from(2))), 2.0);
        assert_eq!(challenge_rating(&creature("a", "A", Value::from("1/2"))), 0.5);
        assert_eq!(challenge_rating(&creature("a", "A", Value::Null)), UNRATED);
        assert_eq!(challenge_rating(&Record::new("a", "A", [APPENDIX])), UNRATED);
    }

    #[test]
    fn creature_listing_sorts_by_rating_then_title() {
        let records = vec![
            Record::new("b/overview.htm", "Overview", [APPENDIX]).with_overview(true),
            creature("b/dragon.htm", "Dragon", Value::from("17")),
            creature("b/rat.htm", "Rat", Value::from("0")),
            creature("b/mystery.htm", "Mystery", Value::from("Unknown")),
            creature("b/goblin.htm", "Goblin", Value::from("1/4")),
            creature("b/bandit.htm", "Bandit", Value::from("1/8")),
            creature("b/cultist.htm", "Cultist", Value::from("1/8")),
        ];
        let index = RecordIndex::build(&records);
        let node = index.node(&[APPENDIX]).unwrap();
        assert!(node.is_creature_directory());

        let titles: Vec<&str> = node.listing().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Rat", "Bandit", "Cultist", "Goblin", "Dragon", "Mystery"]
        );
    }

    #[test]
    fn other_directories_keep_source_order() {
        let records = vec![
            Record::new("ch1/overview.htm", "Overview", ["Ch1"]).with_overview(true),
            Record::new("ch1/z.htm", "Z", ["Ch1"]).with_attribute("cr", "1"),
            Record::new("ch1/a.htm", "A", ["Ch1"]).with_attribute("cr", "5"),
        ];
        let index = RecordIndex::build(&records);
        let node = index.node(&["Ch1"]).unwrap();
        assert!(!node.is_creature_directory());
        let ids: Vec<&str> = node.listing().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["ch1/z.htm", "ch1/a.htm"]);
    }
}
