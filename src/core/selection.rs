use crate::core::catalog::KeywordCatalog;
use crate::models::{Category, KeywordId, KeywordSelection, Priority, SelectionRecord};
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors raised at the keyword selection boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Unknown keyword: {0}")]
    UnknownKeyword(KeywordId),

    #[error("Malformed selection: keyword {0} is both required and preferred")]
    MalformedSelection(KeywordId),
}

/// What to do with a record whose keyword is not in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownKeywords {
    /// Fail with `SelectionError::UnknownKeyword` (edits)
    Reject,
    /// Log and drop the record (scoring input)
    Skip,
}

/// One party's selected keywords.
///
/// Keeps at most one entry per keyword, so the required and preferred tiers are
/// always disjoint. Entries stay in selection order. Every edit checks the
/// keyword against the catalog and fails with `UnknownKeyword` without
/// touching the set when it is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeywordSelectionSet {
    entries: Vec<KeywordSelection>,
}

impl KeywordSelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate raw records into a selection set.
    ///
    /// Exact duplicates collapse into one entry; the same keyword listed under
    /// two different tiers is rejected. Records without a priority get
    /// `default_tier`. Categories are taken from the catalog.
    pub fn from_records(
        records: &[SelectionRecord],
        catalog: &KeywordCatalog,
        unknown: UnknownKeywords,
        default_tier: Priority,
    ) -> Result<Self, SelectionError> {
        let mut set = Self::new();

        for record in records {
            let keyword = match catalog.get(record.keyword_id) {
                Some(keyword) => keyword,
                None => match unknown {
                    UnknownKeywords::Reject => {
                        return Err(SelectionError::UnknownKeyword(record.keyword_id))
                    }
                    UnknownKeywords::Skip => {
                        tracing::warn!(
                            "Skipping selection of unknown keyword {}",
                            record.keyword_id
                        );
                        continue;
                    }
                },
            };

            if let Some(category) = &record.category {
                if category != &keyword.category {
                    tracing::debug!(
                        "Keyword {} recorded as {} but the catalog says {}",
                        keyword.id,
                        category,
                        keyword.category
                    );
                }
            }

            let priority = record.priority.unwrap_or(default_tier);
            match set.priority_of(keyword.id) {
                Some(existing) if existing == priority => continue,
                Some(_) => return Err(SelectionError::MalformedSelection(keyword.id)),
                None => set.entries.push(KeywordSelection {
                    keyword_id: keyword.id,
                    category: keyword.category.clone(),
                    priority,
                }),
            }
        }

        Ok(set)
    }

    /// Put a keyword in `tier`, moving it out of the other tier if needed
    pub fn set_priority(
        &mut self,
        catalog: &KeywordCatalog,
        id: KeywordId,
        tier: Priority,
    ) -> Result<(), SelectionError> {
        let keyword = catalog.get(id).ok_or(SelectionError::UnknownKeyword(id))?;

        match self.entries.iter_mut().find(|e| e.keyword_id == id) {
            Some(entry) => entry.priority = tier,
            None => self.entries.push(KeywordSelection {
                keyword_id: id,
                category: keyword.category.clone(),
                priority: tier,
            }),
        }
        Ok(())
    }

    /// Add the keyword at `default_tier` if absent, remove it from both tiers if present.
    /// Returns whether the keyword is now selected.
    pub fn toggle(
        &mut self,
        catalog: &KeywordCatalog,
        id: KeywordId,
        default_tier: Priority,
    ) -> Result<bool, SelectionError> {
        if !catalog.contains(id) {
            return Err(SelectionError::UnknownKeyword(id));
        }

        if self.remove(id) {
            Ok(false)
        } else {
            self.set_priority(catalog, id, default_tier)?;
            Ok(true)
        }
    }

    /// Per-tier toggle: a keyword already in `tier` is removed entirely,
    /// otherwise it is placed in `tier`.
    pub fn toggle_tier(
        &mut self,
        catalog: &KeywordCatalog,
        id: KeywordId,
        tier: Priority,
    ) -> Result<bool, SelectionError> {
        if !catalog.contains(id) {
            return Err(SelectionError::UnknownKeyword(id));
        }

        if self.priority_of(id) == Some(tier) {
            self.remove(id);
            Ok(false)
        } else {
            self.set_priority(catalog, id, tier)?;
            Ok(true)
        }
    }

    /// Discard the current selection and install `records` in one step.
    ///
    /// The new set is fully validated first; on error `self` is unchanged.
    pub fn replace_all(
        &mut self,
        catalog: &KeywordCatalog,
        records: &[SelectionRecord],
        default_tier: Priority,
    ) -> Result<(), SelectionError> {
        let next = Self::from_records(records, catalog, UnknownKeywords::Reject, default_tier)?;
        *self = next;
        Ok(())
    }

    pub fn remove(&mut self, id: KeywordId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.keyword_id != id);
        self.entries.len() != before
    }

    pub fn priority_of(&self, id: KeywordId) -> Option<Priority> {
        self.entries
            .iter()
            .find(|e| e.keyword_id == id)
            .map(|e| e.priority)
    }

    pub fn contains(&self, id: KeywordId) -> bool {
        self.priority_of(id).is_some()
    }

    pub fn required_ids(&self) -> BTreeSet<KeywordId> {
        self.ids_with(Priority::Required)
    }

    pub fn preferred_ids(&self) -> BTreeSet<KeywordId> {
        self.ids_with(Priority::Preferred)
    }

    pub fn all_ids(&self) -> BTreeSet<KeywordId> {
        self.entries.iter().map(|e| e.keyword_id).collect()
    }

    pub fn by_category(&self, category: &Category) -> Vec<&KeywordSelection> {
        self.entries
            .iter()
            .filter(|e| &e.category == category)
            .collect()
    }

    pub fn categories(&self) -> BTreeSet<&Category> {
        self.entries.iter().map(|e| &e.category).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeywordSelection> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the selection is below the recommended size
    pub fn is_sparse(&self, min_recommended: usize) -> bool {
        self.entries.len() < min_recommended
    }

    pub fn to_records(&self) -> Vec<SelectionRecord> {
        self.entries
            .iter()
            .map(|e| SelectionRecord {
                keyword_id: e.keyword_id,
                category: Some(e.category.clone()),
                priority: Some(e.priority),
            })
            .collect()
    }

    fn ids_with(&self, tier: Priority) -> BTreeSet<KeywordId> {
        self.entries
            .iter()
            .filter(|e| e.priority == tier)
            .map(|e| e.keyword_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Keyword, DEFAULT_PRIORITY};

    fn catalog() -> KeywordCatalog {
        KeywordCatalog::from_keywords(
            [
                (1, "Welding", "Skills"),
                (2, "Forklift", "Skills"),
                (3, "Seoul", "Location"),
                (4, "Night shift", "Schedule"),
            ]
            .into_iter()
            .map(|(id, text, category)| Keyword {
                id: KeywordId(id),
                text: text.to_string(),
                category: Category::from(category),
            }),
        )
    }

    #[test]
    fn test_set_priority_moves_between_tiers() {
        let catalog = catalog();
        let mut set = KeywordSelectionSet::new();

        set.set_priority(&catalog, KeywordId(1), Priority::Preferred).unwrap();
        set.set_priority(&catalog, KeywordId(1), Priority::Required).unwrap();

        assert_eq!(set.len(), 1);
        assert!(set.required_ids().contains(&KeywordId(1)));
        assert!(set.preferred_ids().is_empty());
    }

    #[test]
    fn test_set_priority_unknown_keyword_fails() {
        let catalog = catalog();
        let mut set = KeywordSelectionSet::new();

        let err = set.set_priority(&catalog, KeywordId(99), Priority::Required).unwrap_err();
        assert_eq!(err, SelectionError::UnknownKeyword(KeywordId(99)));
        assert!(set.is_empty());
    }

    #[test]
    fn test_toggle_adds_at_default_tier_and_removes() {
        let catalog = catalog();
        let mut set = KeywordSelectionSet::new();

        assert!(set.toggle(&catalog, KeywordId(2), DEFAULT_PRIORITY).unwrap());
        assert_eq!(set.priority_of(KeywordId(2)), Some(DEFAULT_PRIORITY));

        set.set_priority(&catalog, KeywordId(2), Priority::Required).unwrap();
        assert!(!set.toggle(&catalog, KeywordId(2), DEFAULT_PRIORITY).unwrap());
        assert!(set.is_empty());
    }

    #[test]
    fn test_toggle_tier() {
        let catalog = catalog();
        let mut set = KeywordSelectionSet::new();

        assert!(set.toggle_tier(&catalog, KeywordId(3), Priority::Preferred).unwrap());
        assert!(set.toggle_tier(&catalog, KeywordId(3), Priority::Required).unwrap());
        assert_eq!(set.priority_of(KeywordId(3)), Some(Priority::Required));

        assert!(!set.toggle_tier(&catalog, KeywordId(3), Priority::Required).unwrap());
        assert!(!set.contains(KeywordId(3)));
    }

    #[test]
    fn test_from_records_collapses_duplicates() {
        let records = vec![
            SelectionRecord::new(1, Some(Priority::Required)),
            SelectionRecord::new(1, Some(Priority::Required)),
            SelectionRecord::new(2, None),
        ];

        let set = KeywordSelectionSet::from_records(&records, &catalog(), UnknownKeywords::Reject, DEFAULT_PRIORITY).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.priority_of(KeywordId(2)), Some(Priority::Preferred));
    }

    #[test]
    fn test_from_records_uses_given_default_tier() {
        let records = vec![
            SelectionRecord::new(1, None),
            SelectionRecord::new(2, Some(Priority::Preferred)),
        ];

        let set = KeywordSelectionSet::from_records(&records, &catalog(), UnknownKeywords::Reject, Priority::Required)
            .unwrap();
        assert_eq!(set.required_ids(), BTreeSet::from([KeywordId(1)]));
        assert_eq!(set.preferred_ids(), BTreeSet::from([KeywordId(2)]));

        let mut toggled = KeywordSelectionSet::new();
        toggled.toggle(&catalog(), KeywordId(4), Priority::Required).unwrap();
        assert_eq!(toggled.priority_of(KeywordId(4)), Some(Priority::Required));
    }

    #[test]
    fn test_from_records_rejects_conflicting_tiers() {
        let records = vec![
            SelectionRecord::new(1, Some(Priority::Required)),
            SelectionRecord::new(1, Some(Priority::Preferred)),
        ];

        let err = KeywordSelectionSet::from_records(&records, &catalog(), UnknownKeywords::Skip, DEFAULT_PRIORITY).unwrap_err();
        assert_eq!(err, SelectionError::MalformedSelection(KeywordId(1)));
    }

    #[test]
    fn test_from_records_unknown_handling() {
        let records = vec![SelectionRecord::new(1, None), SelectionRecord::new(42, None)];

        let skipped = KeywordSelectionSet::from_records(&records, &catalog(), UnknownKeywords::Skip, DEFAULT_PRIORITY).unwrap();
        assert_eq!(skipped.all_ids(), BTreeSet::from([KeywordId(1)]));

        let rejected = KeywordSelectionSet::from_records(&records, &catalog(), UnknownKeywords::Reject, DEFAULT_PRIORITY);
        assert_eq!(rejected, Err(SelectionError::UnknownKeyword(KeywordId(42))));
    }

    #[test]
    fn test_replace_all_is_all_or_nothing() {
        let catalog = catalog();
        let mut set = KeywordSelectionSet::new();
        set.replace_all(&catalog, &[SelectionRecord::new(1, None), SelectionRecord::new(3, None)], DEFAULT_PRIORITY)
            .unwrap();
        assert_eq!(set.len(), 2);

        let bad = vec![SelectionRecord::new(2, None), SelectionRecord::new(77, None)];
        assert!(set.replace_all(&catalog, &bad, DEFAULT_PRIORITY).is_err());
        assert_eq!(set.all_ids(), BTreeSet::from([KeywordId(1), KeywordId(3)]));

        set.replace_all(&catalog, &[SelectionRecord::new(4, Some(Priority::Required))], DEFAULT_PRIORITY)
            .unwrap();
        assert_eq!(set.all_ids(), BTreeSet::from([KeywordId(4)]));
    }

    #[test]
    fn test_by_category_and_sparse() {
        let catalog = catalog();
        let records = vec![SelectionRecord::new(1, None), SelectionRecord::new(2, None)];
        let set = KeywordSelectionSet::from_records(&records, &catalog, UnknownKeywords::Reject, DEFAULT_PRIORITY).unwrap();

        assert_eq!(set.by_category(&Category::from("Skills")).len(), 2);
        assert!(set.by_category(&Category::from("Location")).is_empty());
        assert!(set.is_sparse(3));
        assert!(!set.is_sparse(2));
    }

    #[test]
    fn test_records_rebuild_the_same_selection() {
        let catalog = catalog();
        let mut set = KeywordSelectionSet::new();
        set.set_priority(&catalog, KeywordId(4), Priority::Required).unwrap();
        set.toggle(&catalog, KeywordId(3), DEFAULT_PRIORITY).unwrap();

        let records = set.to_records();
        assert_eq!(records[0].category, Some(Category::from("Schedule")));

        let copy = KeywordSelectionSet::from_records(&records, &catalog, UnknownKeywords::Reject, DEFAULT_PRIORITY).unwrap();
        assert_eq!(copy, set);
        assert_eq!(copy.categories().len(), 2);
    }
}
