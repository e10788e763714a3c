use crate::core::{KeywordCatalog, KeywordSelectionSet, SelectionError, UnknownKeywords};
use crate::models::{Keyword, PartyKind, PartyProfile, PartyRecord, Priority, SelectionRecord};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors that can occur when reading or writing party data
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Party not found: {0}")]
    PartyNotFound(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(#[from] SelectionError),

    #[error("Seed file error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Seed parse error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Data-access collaborator for matching.
///
/// `replace_selections` must behave as one unit of work: callers either see
/// the previous selection or the complete new one.
#[async_trait]
pub trait SelectionStore: Send + Sync {
    async fn catalog(&self) -> Result<KeywordCatalog, StoreError>;

    async fn party(&self, party_id: &str) -> Result<PartyProfile, StoreError>;

    async fn parties_of_kind(&self, kind: PartyKind) -> Result<Vec<PartyProfile>, StoreError>;

    async fn selections(&self, party_id: &str) -> Result<KeywordSelectionSet, StoreError>;

    /// Validate `records` strictly and swap them in for the party's selection.
    /// Records without a priority get the store's default tier.
    async fn replace_selections(
        &self,
        party_id: &str,
        records: &[SelectionRecord],
    ) -> Result<KeywordSelectionSet, StoreError>;
}

/// Initial store contents, read from a JSON file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    #[serde(default)]
    pub parties: Vec<PartyRecord>,
}

impl SeedData {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Debug, Default)]
struct StoreState {
    catalog: KeywordCatalog,
    default_priority: Priority,
    parties: BTreeMap<String, PartyProfile>,
    selections: HashMap<String, KeywordSelectionSet>,
}

/// In-process store.
///
/// All state sits behind one `RwLock`, so a replace is a single write and
/// readers never observe a half-applied selection.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new(catalog: KeywordCatalog, default_priority: Priority) -> Self {
        Self {
            state: RwLock::new(StoreState {
                catalog,
                default_priority,
                ..Default::default()
            }),
        }
    }

    /// Build a store from seed data; selections are validated strictly
    pub fn from_seed(seed: SeedData, default_priority: Priority) -> Result<Self, StoreError> {
        let catalog = KeywordCatalog::from_keywords(seed.keywords);
        let mut state = StoreState {
            catalog,
            default_priority,
            ..Default::default()
        };

        for record in seed.parties {
            let (party, records) = record.into_parts();
            let selection =
                KeywordSelectionSet::from_records(
                    &records,
                    &state.catalog,
                    UnknownKeywords::Reject,
                    default_priority,
                )?;
            state.selections.insert(party.party_id.clone(), selection);
            state.parties.insert(party.party_id.clone(), party);
        }

        tracing::info!(
            "Store seeded with {} keywords and {} parties",
            state.catalog.len(),
            state.parties.len()
        );

        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Register or update a party's profile, keeping its selection
    pub async fn upsert_party(&self, party: PartyProfile) {
        let mut state = self.state.write().await;
        state.selections.entry(party.party_id.clone()).or_default();
        state.parties.insert(party.party_id.clone(), party);
    }
}

#[async_trait]
impl SelectionStore for InMemoryStore {
    async fn catalog(&self) -> Result<KeywordCatalog, StoreError> {
        Ok(self.state.read().await.catalog.clone())
    }

    async fn party(&self, party_id: &str) -> Result<PartyProfile, StoreError> {
        self.state
            .read()
            .await
            .parties
            .get(party_id)
            .cloned()
            .ok_or_else(|| StoreError::PartyNotFound(party_id.to_string()))
    }

    async fn parties_of_kind(&self, kind: PartyKind) -> Result<Vec<PartyProfile>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .parties
            .values()
            .filter(|p| p.kind == kind)
            .cloned()
            .collect())
    }

    async fn selections(&self, party_id: &str) -> Result<KeywordSelectionSet, StoreError> {
        let state = self.state.read().await;
        if !state.parties.contains_key(party_id) {
            return Err(StoreError::PartyNotFound(party_id.to_string()));
        }
        Ok(state.selections.get(party_id).cloned().unwrap_or_default())
    }

    async fn replace_selections(
        &self,
        party_id: &str,
        records: &[SelectionRecord],
    ) -> Result<KeywordSelectionSet, StoreError> {
        let mut state = self.state.write().await;
        if !state.parties.contains_key(party_id) {
            return Err(StoreError::PartyNotFound(party_id.to_string()));
        }

        let StoreState {
            catalog,
            default_priority,
            selections,
            ..
        } = &mut *state;
        let selection = selections.entry(party_id.to_string()).or_default();
        selection.replace_all(catalog, records, *default_priority)?;

        tracing::debug!("Replaced selection of {} ({} keywords)", party_id, selection.len());
        Ok(selection.clone())
    }
}
