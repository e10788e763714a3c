use crate::core::catalog::KeywordCatalog;
use crate::core::selection::KeywordSelectionSet;
use crate::models::{Category, Keyword, PartyKind, PartyProfile, ProfileFields};
use serde::Serialize;
use std::collections::BTreeSet;

/// Category filter value meaning "no filter"
pub const ALL_CATEGORIES: &str = "all";

/// A party as listed in the public directory
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub party_id: String,
    pub kind: PartyKind,
    pub profile: ProfileFields,
    pub keywords: Vec<Keyword>,
}

impl DirectoryEntry {
    /// Resolve the selected keywords against the catalog
    pub fn new(party: PartyProfile, selection: &KeywordSelectionSet, catalog: &KeywordCatalog) -> Self {
        let keywords = selection
            .iter()
            .filter_map(|s| catalog.get(s.keyword_id).cloned())
            .collect();

        Self {
            party_id: party.party_id,
            kind: party.kind,
            profile: party.profile,
            keywords,
        }
    }
}

/// Case-insensitive substring search over the searchable profile fields.
/// An empty term matches every profile.
pub fn matches_search(profile: &ProfileFields, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    [
        &profile.name,
        &profile.email,
        &profile.address,
        &profile.country,
        &profile.description,
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&term))
}

/// Whether any of the entry's keywords is in `category` (`None` or "all" admits everything)
pub fn matches_category(entry: &DirectoryEntry, category: Option<&str>) -> bool {
    match category.map(str::trim) {
        None | Some("") | Some(ALL_CATEGORIES) => true,
        Some(name) => entry.keywords.iter().any(|k| k.category.as_str() == name),
    }
}

/// Apply both directory filters
pub fn filter_directory(
    entries: Vec<DirectoryEntry>,
    search: Option<&str>,
    category: Option<&str>,
) -> Vec<DirectoryEntry> {
    entries
        .into_iter()
        .filter(|e| matches_search(&e.profile, search.unwrap_or_default()))
        .filter(|e| matches_category(e, category))
        .collect()
}

/// Distinct categories used across the directory, sorted
pub fn directory_categories(entries: &[DirectoryEntry]) -> Vec<Category> {
    entries
        .iter()
        .flat_map(|e| e.keywords.iter().map(|k| k.category.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
