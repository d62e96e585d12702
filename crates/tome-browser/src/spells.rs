//! Spell list filtering by class, level and title text.

use serde_json::Value;
use tome_model::Record;

/// Select value that leaves a filter unrestricted.
pub const ANY: &str = "全部";

/// Filters of the spell list. The default matches every spell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpellFilter {
    /// Class the spell's `classes` must include.
    pub class: Option<String>,

    /// Required `levelNumeric`; 0 selects cantrips.
    pub level: Option<i64>,

    /// Substring of the title, or case-insensitive substring of the
    /// English title. Empty matches everything.
    pub text: String,
}

impl SpellFilter {
    /// Restrict to one class; [`ANY`] lifts the restriction.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        self.class = (class != ANY).then_some(class);
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: Option<i64>) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Whether every filter accepts the spell.
    pub fn matches(&self, spell: &Record) -> bool {
        self.class_matches(spell) && self.level_matches(spell) && self.text_matches(spell)
    }

    /// The matching spells, in list order.
    pub fn apply<'a>(&self, spells: &'a [Record]) -> Vec<&'a Record> {
        spells.iter().filter(|spell| self.matches(spell)).collect()
    }

    fn class_matches(&self, spell: &Record) -> bool {
        let Some(class) = self.class.as_deref() else {
            return true;
        };
        match spell.attributes.get("classes") {
            Some(Value::Array(classes)) => classes.iter().any(|c| c.as_str() == Some(class)),
            Some(Value::String(classes)) => classes.contains(class),
            _ => false,
        }
    }

    fn level_matches(&self, spell: &Record) -> bool {
        self.level.is_none_or(|level| {
            spell.attributes.get("levelNumeric").and_then(Value::as_i64) == Some(level)
        })
    }

    fn text_matches(&self, spell: &Record) -> bool {
        if self.text.is_empty() || spell.title.contains(&self.text) {
            return true;
        }
        let needle = self.text.to_lowercase();
        spell
            .attribute_str("titleEn")
            .is_some_and(|title| title.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spell(id: &str, title: &str, title_en: &str, level: i64, classes: &[&str]) -> Record {
        Record::new(id, title, Vec::<String>::new())
            .with_attribute("titleEn", title_en)
            .with_attribute("levelNumeric", level)
            .with_attribute("classes", json!(classes))
    }

    fn spells() -> Vec<Record> {
        vec![
            spell("fire-bolt", "火焰箭", "Fire Bolt", 0, &["术士", "法师"]),
            spell("fireball", "火球术", "Fireball", 3, &["术士", "法师"]),
            spell("cure-wounds", "疗伤术", "Cure Wounds", 1, &["牧师", "德鲁伊", "圣武士"]),
        ]
    }

    fn ids(found: &[&Record]) -> Vec<String> {
        found.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn default_matches_everything() {
        assert_eq!(SpellFilter::default().apply(&spells()).len(), 3);
        let any = SpellFilter::default().with_class(ANY);
        assert_eq!(any.class, None);
    }

    #[test]
    fn class_and_level_combine() {
        let spells = spells();
        let wizard = SpellFilter::default().with_class("法师");
        assert_eq!(ids(&wizard.apply(&spells)), vec!["fire-bolt", "fireball"]);

        let cantrips = wizard.with_level(Some(0));
        assert_eq!(ids(&cantrips.apply(&spells)), vec!["fire-bolt"]);

        let first_level = SpellFilter::default().with_level(Some(1));
        assert_eq!(ids(&first_level.apply(&spells)), vec!["cure-wounds"]);
    }

    #[test]
    fn text_matches_title_or_english_title() {
        let spells = spells();
        let by_title = SpellFilter::default().with_text("火");
        assert_eq!(ids(&by_title.apply(&spells)), vec!["fire-bolt", "fireball"]);

        let by_english = SpellFilter::default().with_text("WOUND");
        assert_eq!(ids(&by_english.apply(&spells)), vec!["cure-wounds"]);

        let nothing = SpellFilter::default().with_text("shield");
        assert!(nothing.apply(&spells).is_empty());
    }

    #[test]
    fn spells_without_class_or_level_data_only_pass_open_filters() {
        let bare = Record::new("bare", "无名", Vec::<String>::new());
        assert!(SpellFilter::default().matches(&bare));
        assert!(!SpellFilter::default().with_class("法师").matches(&bare));
        assert!(!SpellFilter::default().with_level(Some(0)).matches(&bare));
        assert!(!SpellFilter::default().with_text("bare").matches(&bare));
    }
}
