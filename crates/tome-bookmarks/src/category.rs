//! Display categories of a collection and category-scoped reorder commits.
//!
//! Storage keeps one flat list per collection; the bookmark panel shows it
//! split into categories. A reorder inside one category is written back by
//! regrouping the whole list in category order with the reordered category
//! spliced in, so the other categories keep their relative order.

use tome_model::{Record, RecordId, ResolveRecord};

/// Display category of a bookmarked record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BookmarkCategory {
    /// Classes, origins, feats and weapon masteries.
    CharacterOptions,
    /// Everything else, directories included.
    General,
    /// Spells.
    Spells,
    /// Identifiers that no longer resolve; kept so commits never lose them.
    Unresolved,
}

impl BookmarkCategory {
    /// All categories in display order.
    pub const fn all() -> &'static [BookmarkCategory] {
        &[
            Self::CharacterOptions,
            Self::General,
            Self::Spells,
            Self::Unresolved,
        ]
    }

    /// Panel heading.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CharacterOptions => "角色选项",
            Self::General => "常规条目",
            Self::Spells => "法术列表",
            Self::Unresolved => "失效条目",
        }
    }
}

/// Rules deciding which category a record belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRules {
    /// Path segments (substring match on the joined path) of character options.
    pub character_markers: Vec<String>,
    /// Path marker of spells.
    pub spell_marker: String,
    /// Attribute whose presence marks a spell.
    pub spell_attribute: String,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            character_markers: ["角色职业", "角色起源", "专长", "精通词条"]
                .into_iter()
                .map(String::from)
                .collect(),
            spell_marker: "法术".to_string(),
            spell_attribute: "castingTime".to_string(),
        }
    }
}

impl CategoryRules {
    /// Classify a resolved record (`None` for stale identifiers).
    pub fn classify(&self, record: Option<&Record>) -> BookmarkCategory {
        let Some(record) = record else {
            return BookmarkCategory::Unresolved;
        };
        let path = record.path_parts.join(" ");
        if !record.is_dir
            && self
                .character_markers
                .iter()
                .any(|marker| path.contains(marker.as_str()))
        {
            BookmarkCategory::CharacterOptions
        } else if !record.is_dir
            && (record.has_attribute(&self.spell_attribute) || path.contains(&self.spell_marker))
        {
            BookmarkCategory::Spells
        } else {
            BookmarkCategory::General
        }
    }

    /// Split a stored list into categories, in display order.
    ///
    /// Empty categories are omitted; ids keep their stored relative order.
    pub fn group<R: ResolveRecord + ?Sized>(
        &self,
        items: &[RecordId],
        resolver: &R,
    ) -> Vec<(BookmarkCategory, Vec<RecordId>)> {
        let classified: Vec<(BookmarkCategory, &RecordId)> = items
            .iter()
            .map(|id| (self.classify(resolver.resolve(id.as_str()).as_ref()), id))
            .collect();

        BookmarkCategory::all()
            .iter()
            .filter_map(|category| {
                let ids: Vec<RecordId> = classified
                    .iter()
                    .filter(|(c, _)| c == category)
                    .map(|(_, id)| (*id).clone())
                    .collect();
                (!ids.is_empty()).then_some((*category, ids))
            })
            .collect()
    }

    /// Rebuild a stored list after one category was reordered.
    ///
    /// Returns `None` when `ordered` is not a permutation of the ids the
    /// list currently holds in `category`.
    pub fn commit_category_order<R: ResolveRecord + ?Sized>(
        &self,
        items: &[RecordId],
        category: BookmarkCategory,
        ordered: &[RecordId],
        resolver: &R,
    ) -> Option<Vec<RecordId>> {
        let mut groups = self.group(items, resolver);
        let current = groups
            .iter_mut()
            .find(|(c, _)| *c == category)
            .map(|(_, ids)| ids)?;

        if !is_permutation(current, ordered) {
            tracing::warn!(?category, "reorder does not match category members, ignoring");
            return None;
        }
        *current = ordered.to_vec();
        Some(groups.into_iter().flat_map(|(_, ids)| ids).collect())
    }
}

fn is_permutation(current: &[RecordId], ordered: &[RecordId]) -> bool {
    if current.len() != ordered.len() {
        return false;
    }
    let mut a: Vec<&RecordId> = current.iter().collect();
    let mut b: Vec<&RecordId> = ordered.iter().collect();
    a.sort();
    b.sort();
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use tome_model::{Placement, RecordSet};

    fn catalog() -> RecordSet {
        RecordSet::new(
            "all",
            vec![
                Record::new("fighter", "战士", ["第三章：角色职业"]),
                Record::new("alert", "警觉", ["第五章：专长", "起源专长"]),
                Record::new("fireball", "火球术", ["法术"]),
                Record::new("shield", "护盾术", Vec::<String>::new())
                    .with_attribute("castingTime", "1 反应"),
                Record::new("rules", "规则", ["第一章"]),
                Record::category(
                    "dir:第五章：专长",
                    "第五章：专长",
                    vec!["第五章：专长".to_string()],
                    None,
                ),
            ],
            Placement::AsIs,
        )
    }

    #[test]
    fn classifies_like_the_bookmark_panel() {
        let rules = CategoryRules::default();
        let set = catalog();
        let category = |id: &str| rules.classify(set.find(id).as_ref());

        assert_eq!(category("fighter"), BookmarkCategory::CharacterOptions);
        assert_eq!(category("alert"), BookmarkCategory::CharacterOptions);
        assert_eq!(category("fireball"), BookmarkCategory::Spells);
        assert_eq!(category("shield"), BookmarkCategory::Spells);
        assert_eq!(category("rules"), BookmarkCategory::General);
        assert_eq!(category("dir:第五章：专长"), BookmarkCategory::General);
        assert_eq!(category("missing"), BookmarkCategory::Unresolved);
    }

    #[test]
    fn group_keeps_display_order_and_skips_empty() {
        let rules = CategoryRules::default();
        let items: Vec<RecordId> = ["fireball", "gone", "rules", "fighter"]
            .into_iter()
            .map(RecordId::from)
            .collect();
        let groups = rules.group(&items, &catalog());
        let categories: Vec<_> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            categories,
            vec![
                BookmarkCategory::CharacterOptions,
                BookmarkCategory::General,
                BookmarkCategory::Spells,
                BookmarkCategory::Unresolved,
            ]
        );
    }

    #[test]
    fn commit_splices_reordered_category() {
        let rules = CategoryRules::default();
        let items: Vec<RecordId> = ["fireball", "rules", "shield", "fighter", "alert"]
            .into_iter()
            .map(RecordId::from)
            .collect();
        let committed = rules
            .commit_category_order(
                &items,
                BookmarkCategory::Spells,
                &["shield".into(), "fireball".into()],
                &catalog(),
            )
            .unwrap();
        let committed: Vec<&str> = committed.iter().map(RecordId::as_str).collect();
        assert_eq!(committed, vec!["fighter", "alert", "rules", "shield", "fireball"]);
    }

    #[test]
    fn commit_rejects_foreign_ids() {
        let rules = CategoryRules::default();
        let items: Vec<RecordId> = vec!["fireball".into(), "shield".into()];
        assert!(
            rules
                .commit_category_order(
                    &items,
                    BookmarkCategory::Spells,
                    &["fireball".into(), "rules".into()],
                    &catalog(),
                )
                .is_none()
        );
        assert!(
            rules
                .commit_category_order(&items, BookmarkCategory::General, &[], &catalog())
                .is_none()
        );
    }
}
