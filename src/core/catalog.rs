use crate::models::{Category, Keyword, KeywordId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Keywords of one category, as shown on the selection pages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordGroup {
    pub category: Category,
    pub keywords: Vec<Keyword>,
}

/// Read-only keyword reference data indexed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Keyword>", into = "Vec<Keyword>")]
pub struct KeywordCatalog {
    keywords: BTreeMap<KeywordId, Keyword>,
}

impl KeywordCatalog {
    /// Build a catalog; a repeated id keeps the last entry
    pub fn from_keywords<I>(keywords: I) -> Self
    where
        I: IntoIterator<Item = Keyword>,
    {
        let mut map = BTreeMap::new();
        for keyword in keywords {
            if let Some(previous) = map.insert(keyword.id, keyword) {
                tracing::warn!("Duplicate keyword id {} in catalog, keeping the later entry", previous.id);
            }
        }
        Self { keywords: map }
    }

    pub fn get(&self, id: KeywordId) -> Option<&Keyword> {
        self.keywords.get(&id)
    }

    pub fn contains(&self, id: KeywordId) -> bool {
        self.keywords.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.values()
    }

    /// Group keywords by category, categories and keyword texts in ascending order
    pub fn grouped(&self) -> Vec<KeywordGroup> {
        let mut groups: BTreeMap<&Category, Vec<Keyword>> = BTreeMap::new();
        for keyword in self.keywords.values() {
            groups.entry(&keyword.category).or_default().push(keyword.clone());
        }

        groups
            .into_iter()
            .map(|(category, mut keywords)| {
                keywords.sort_by(|a, b| a.text.cmp(&b.text));
                KeywordGroup {
                    category: category.clone(),
                    keywords,
                }
            })
            .collect()
    }
}

impl From<Vec<Keyword>> for KeywordCatalog {
    fn from(keywords: Vec<Keyword>) -> Self {
        Self::from_keywords(keywords)
    }
}

impl From<KeywordCatalog> for Vec<Keyword> {
    fn from(catalog: KeywordCatalog) -> Self {
        catalog.keywords.into_values().collect()
    }
}
